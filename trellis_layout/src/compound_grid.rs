// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-level layout: pack one compound node's direct children.

use alloc::vec::Vec;

use crate::error::{LayoutError, Result};
use crate::grid::{GridShape, LayoutGrid};
use crate::host::{LayoutEvents, LayoutHost, LayoutRun};
use crate::options::LayoutOptions;
use crate::placement::NodePlacement;
use crate::session::PositionSession;

/// The single target of a layout run.
pub(crate) fn single_target<K: Copy>(targets: &[K]) -> Result<K> {
    match targets {
        [] => Err(LayoutError::NoTarget),
        [node] => Ok(*node),
        _ => Err(LayoutError::MultipleTargets {
            count: targets.len(),
        }),
    }
}

/// Arranges the direct children of one compound node in a grid.
///
/// Children keep their internal arrangement: a compound child moves as a
/// block with all its descendants. Only the target's own children are packed.
#[derive(Clone, Debug, Default)]
pub struct CompoundGridLayout {
    options: LayoutOptions,
}

impl CompoundGridLayout {
    /// Name the layout is registered under.
    pub const NAME: &'static str = "compound-grid";

    /// A layout with the given options.
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// The layout's options.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Pack the children of `node` without moving anything.
    ///
    /// Returns `None` when `node` has no children. With
    /// [`LayoutOptions::alternate_shapes`] set, neighbouring target shapes are
    /// packed too and the most efficient grid wins.
    pub fn pack<H>(
        &self,
        host: &H,
        session: &mut PositionSession<H::NodeId>,
        node: H::NodeId,
    ) -> Result<Option<LayoutGrid<H::NodeId>>>
    where
        H: LayoutHost + ?Sized,
    {
        let children = host.children(node);
        if children.is_empty() {
            return Ok(None);
        }
        let mut placements = Vec::with_capacity(children.len());
        for &c in &children {
            placements.push(NodePlacement::new(c, session.dimensions(host, c)?));
        }

        let o = &self.options;
        let factor = o.spacing_multiplier();
        let shape = GridShape::normalize(o.rows, o.cols, placements.len());
        let mut best = LayoutGrid::with_spacing_factor(node, placements.clone(), shape, factor)?;
        if o.alternate_shapes {
            for alt in shape.neighbours(placements.len()) {
                let grid = LayoutGrid::with_spacing_factor(node, placements.clone(), alt, factor)?;
                if grid.packing_efficiency() > best.packing_efficiency() {
                    best = grid;
                }
            }
            log::debug!(
                target: "trellis::grid",
                "{node:?}: kept {}x{} shape",
                best.shape().rows,
                best.shape().cols
            );
        }
        Ok(Some(best))
    }

    /// Lay out the children of the single node in `targets` and commit.
    ///
    /// The commit covers every descendant of the target, so compound children
    /// moved as blocks reach the host together. Inside an open session the
    /// commit waits for the outermost session to end.
    pub fn run<H>(
        &self,
        host: &mut H,
        session: &mut PositionSession<H::NodeId>,
        targets: &[H::NodeId],
        events: LayoutEvents<H::NodeId>,
    ) -> Result<()>
    where
        H: LayoutHost + ?Sized,
    {
        let node = single_target(targets)?;
        session.set_include_labels(self.options.node_dimensions_include_labels);
        session.scope(host, |session, host| {
            if let Some(grid) = self.pack(host, session, node)? {
                grid.apply(session, host)?;
            }
            let elements = host.descendants(node);
            let run = LayoutRun::new(Self::NAME, self.options.clone()).with_events(events);
            session.commit(host, &elements, run)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::MockHost;
    use alloc::vec;
    use kurbo::{Point, Size};

    fn host() -> MockHost {
        let mut h = MockHost::default();
        h.add(1, Point::new(0.0, 0.0), Size::new(200.0, 200.0), None);
        for (i, x) in [(2, -60.0), (3, -20.0), (4, 20.0), (5, 60.0)] {
            h.add(i, Point::new(x, x), Size::new(10.0, 10.0), Some(1));
        }
        h
    }

    #[test]
    fn rejects_collections_that_are_not_one_node() {
        let mut h = host();
        let mut s = PositionSession::new();
        let layout = CompoundGridLayout::default();
        assert_eq!(
            layout.run(&mut h, &mut s, &[1, 2], LayoutEvents::new()),
            Err(LayoutError::MultipleTargets { count: 2 })
        );
        assert_eq!(
            layout.run(&mut h, &mut s, &[], LayoutEvents::new()),
            Err(LayoutError::NoTarget)
        );
        assert!(h.commits.is_empty());
    }

    #[test]
    fn commits_every_descendant_once() {
        let mut h = host();
        let mut s = PositionSession::new();
        CompoundGridLayout::default()
            .run(&mut h, &mut s, &[1], LayoutEvents::new())
            .unwrap();
        assert_eq!(h.commits.len(), 1);
        let (name, positions) = &h.commits[0];
        assert_eq!(*name, CompoundGridLayout::NAME);
        let ids: Vec<u32> = positions.iter().map(|p| p.0).collect();
        assert_eq!(ids, vec![2, 3, 4, 5]);
        // 2x2 grid of 10-wide squares, 15 apart, centered on the parent.
        assert_eq!(h.nodes[&2].0, Point::new(-12.5, -12.5));
        assert_eq!(h.nodes[&5].0, Point::new(12.5, 12.5));
    }

    #[test]
    fn leaf_target_commits_nothing_but_still_finishes() {
        let mut h = host();
        let mut s = PositionSession::new();
        let stopped = alloc::rc::Rc::new(core::cell::Cell::new(false));
        let flag = stopped.clone();
        CompoundGridLayout::default()
            .run(&mut h, &mut s, &[3], LayoutEvents::new().on_stop(move || flag.set(true)))
            .unwrap();
        assert!(stopped.get());
        assert!(h.commits[0].1.is_empty());
    }

    #[test]
    fn alternate_shapes_never_lose_efficiency() {
        let h = host();
        let mut s = PositionSession::new();
        let plain = CompoundGridLayout::new(LayoutOptions::new().with_cols(3))
            .pack(&h, &mut s, 1)
            .unwrap()
            .unwrap();
        let tuned =
            CompoundGridLayout::new(LayoutOptions::new().with_cols(3).with_alternate_shapes(true))
                .pack(&h, &mut s, 1)
                .unwrap()
                .unwrap();
        assert!(tuned.packing_efficiency() >= plain.packing_efficiency());
        assert_eq!(tuned.shape(), GridShape::new(2, 2));
    }

    #[test]
    fn oversized_column_target_still_packs() {
        let h = host();
        let mut s = PositionSession::new();
        let options = LayoutOptions::new()
            .with_cols(usize::MAX)
            .with_alternate_shapes(true);
        let grid = CompoundGridLayout::new(options)
            .pack(&h, &mut s, 1)
            .unwrap()
            .unwrap();
        assert_eq!(grid.shape().rows, 1);
        assert_eq!(grid.placements().len(), 4);
    }
}
