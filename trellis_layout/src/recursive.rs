// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recursive layout: grid-pack every compound node in a subtree, deepest first.
//!
//! A compound node's size depends on where its children end up, so a parent
//! can only be packed after each of its compound children has been. The
//! scheduler records every compound node's depth below the top node and runs
//! the single-level layout on the deepest waiting node until only the top is
//! left, then runs the top. All runs share one session, so the host sees a
//! single commit carrying the top run's events.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::compound_grid::{CompoundGridLayout, single_target};
use crate::error::{LayoutError, Result};
use crate::host::{LayoutEvents, LayoutHost};
use crate::options::LayoutOptions;
use crate::session::PositionSession;

/// Deepest parent chain the scheduler will follow.
///
/// Anything longer is taken to be a cycle or a malformed tree.
pub const MAX_NESTING: usize = 10;

/// Progress of one compound node through a recursive run.
///
/// States only move forward.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompoundState {
    /// Not laid out yet.
    Waiting,
    /// Single-level layout in progress.
    Running,
    /// Single-level layout finished.
    Done,
}

/// One compound node in a [`Schedule`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledCompound<K> {
    /// The compound node.
    pub node: K,
    /// Parent hops from the node to the top node.
    pub depth: usize,
    /// Current state.
    pub state: CompoundState,
}

/// Bookkeeping for one recursive run.
#[derive(Clone, Debug)]
pub struct Schedule<K> {
    entries: Vec<ScheduledCompound<K>>,
}

impl<K: Copy + Eq + Debug> Schedule<K> {
    /// Collect `top` and every compound descendant with its depth.
    pub fn build<H>(host: &H, top: K) -> Result<Self>
    where
        H: LayoutHost<NodeId = K> + ?Sized,
    {
        let mut entries = Vec::new();
        entries.push(ScheduledCompound {
            node: top,
            depth: 0,
            state: CompoundState::Waiting,
        });
        for node in host.descendants(top) {
            if host.is_compound(node) {
                entries.push(ScheduledCompound {
                    node,
                    depth: depth_below(host, node, top)?,
                    state: CompoundState::Waiting,
                });
            }
        }
        Ok(Self { entries })
    }

    /// All entries, top node first.
    pub fn entries(&self) -> &[ScheduledCompound<K>] {
        &self.entries
    }

    /// Deepest waiting node below the top, earliest discovered among equals.
    pub fn next_waiting(&self) -> Option<K> {
        let mut best: Option<&ScheduledCompound<K>> = None;
        for e in &self.entries {
            if e.depth == 0 || e.state != CompoundState::Waiting {
                continue;
            }
            if best.is_none_or(|b| e.depth > b.depth) {
                best = Some(e);
            }
        }
        best.map(|e| e.node)
    }

    /// State of `node`, if scheduled.
    pub fn state(&self, node: K) -> Option<CompoundState> {
        self.entries.iter().find(|e| e.node == node).map(|e| e.state)
    }

    /// Move `node` one state forward. `Done` stays `Done`.
    pub fn advance(&mut self, node: K) {
        if let Some(e) = self.entries.iter_mut().find(|e| e.node == node) {
            e.state = match e.state {
                CompoundState::Waiting => CompoundState::Running,
                CompoundState::Running | CompoundState::Done => CompoundState::Done,
            };
        }
    }
}

/// Parent hops from `node` up to `top`.
pub fn depth_below<H>(host: &H, node: H::NodeId, top: H::NodeId) -> Result<usize>
where
    H: LayoutHost + ?Sized,
{
    let mut depth = 0;
    let mut current = node;
    while current != top {
        if depth == MAX_NESTING {
            return Err(LayoutError::NestingTooDeep { limit: MAX_NESTING });
        }
        current = host.parent(current).ok_or_else(|| LayoutError::detached(node))?;
        depth += 1;
    }
    Ok(depth)
}

/// Lays out a whole compound subtree with [`CompoundGridLayout`], inside out.
#[derive(Clone, Debug, Default)]
pub struct RecursiveCompoundLayout {
    grid: CompoundGridLayout,
}

impl RecursiveCompoundLayout {
    /// Name the layout is registered under.
    pub const NAME: &'static str = "recursive-compound";

    /// A layout whose single-level runs all use `options`.
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            grid: CompoundGridLayout::new(options),
        }
    }

    /// The options passed to every single-level run.
    pub fn options(&self) -> &LayoutOptions {
        self.grid.options()
    }

    /// Lay out the subtree under the single node in `targets`.
    ///
    /// Returns the compound nodes in the order they were laid out, top last.
    /// `events` go with the top node's run; its `stop` fires once the host has
    /// applied the combined commit. Runs are triggered in one sweep without
    /// waiting on the host between depths.
    pub fn run<H>(
        &self,
        host: &mut H,
        session: &mut PositionSession<H::NodeId>,
        targets: &[H::NodeId],
        events: LayoutEvents<H::NodeId>,
    ) -> Result<Vec<H::NodeId>>
    where
        H: LayoutHost + ?Sized,
    {
        let top = single_target(targets)?;
        let mut schedule = Schedule::build(host, top)?;
        log::debug!(
            target: "trellis::schedule",
            "scheduling {} compound nodes under {top:?}",
            schedule.entries().len()
        );
        session.scope(host, |session, host| {
            let mut order = Vec::with_capacity(schedule.entries().len());
            while let Some(node) = schedule.next_waiting() {
                schedule.advance(node);
                log::trace!(target: "trellis::schedule", "laying out {node:?}");
                self.grid.run(host, session, &[node], LayoutEvents::new())?;
                schedule.advance(node);
                order.push(node);
            }
            schedule.advance(top);
            self.grid.run(host, session, &[top], events)?;
            schedule.advance(top);
            order.push(top);
            log::debug!(target: "trellis::schedule", "laid out {} compound nodes", order.len());
            Ok(order)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::MockHost;
    use alloc::vec;
    use kurbo::{Point, Size};

    /// 1 ─┬─ 2 ── 4 ── 6
    ///    └─ 3 ── 5
    fn tree() -> MockHost {
        let mut h = MockHost::default();
        let s = Size::new(10.0, 10.0);
        h.add(1, Point::ZERO, s, None);
        h.add(2, Point::ZERO, s, Some(1));
        h.add(3, Point::ZERO, s, Some(1));
        h.add(4, Point::ZERO, s, Some(2));
        h.add(5, Point::ZERO, s, Some(3));
        h.add(6, Point::ZERO, s, Some(4));
        h
    }

    #[test]
    fn depths_count_hops_to_top() {
        let h = tree();
        assert_eq!(depth_below(&h, 1, 1), Ok(0));
        assert_eq!(depth_below(&h, 4, 1), Ok(2));
        assert_eq!(depth_below(&h, 4, 2), Ok(1));
        assert_eq!(depth_below(&h, 5, 2), Err(LayoutError::DetachedNode("5".into())));
    }

    #[test]
    fn cyclic_parent_chain_is_rejected() {
        let mut h = MockHost::default();
        h.add(1, Point::ZERO, Size::ZERO, Some(2));
        h.add(2, Point::ZERO, Size::ZERO, Some(1));
        h.add(3, Point::ZERO, Size::ZERO, None);
        assert_eq!(
            depth_below(&h, 1, 3),
            Err(LayoutError::NestingTooDeep { limit: MAX_NESTING })
        );
    }

    #[test]
    fn schedule_picks_deepest_waiting() {
        let h = tree();
        let mut s = Schedule::build(&h, 1).unwrap();
        let depths: Vec<_> = s.entries().iter().map(|e| (e.node, e.depth)).collect();
        assert_eq!(depths, vec![(1, 0), (2, 1), (4, 2), (3, 1)]);
        assert_eq!(s.next_waiting(), Some(4));
        s.advance(4);
        assert_eq!(s.state(4), Some(CompoundState::Running));
        s.advance(4);
        assert_eq!(s.next_waiting(), Some(2));
        s.advance(2);
        s.advance(2);
        assert_eq!(s.next_waiting(), Some(3));
        s.advance(3);
        s.advance(3);
        s.advance(3);
        assert_eq!(s.state(3), Some(CompoundState::Done));
        assert_eq!(s.next_waiting(), None, "top is never returned");
    }

    #[test]
    fn runs_deepest_first_and_commits_once() {
        let mut h = tree();
        let mut session = PositionSession::new();
        let order = RecursiveCompoundLayout::default()
            .run(&mut h, &mut session, &[1], LayoutEvents::new())
            .unwrap();
        assert_eq!(order, vec![4, 2, 3, 1]);
        assert_eq!(h.commits.len(), 1);
        assert_eq!(h.commits[0].0, CompoundGridLayout::NAME);
        assert_eq!(session.depth(), 0);
    }
}
