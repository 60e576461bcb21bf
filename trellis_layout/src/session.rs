// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position session: a re-entrant transaction over host node geometry.
//!
//! Layouts read and write node geometry through a [`PositionSession`] instead
//! of the host. Inside a session, the first read of a node copies its geometry
//! from the host; every later read and write hits the copy. Commits requested
//! while a session is open are coalesced and handed to the host once, when the
//! outermost session ends.
//!
//! ```text
//! start()            depth 0 -> 1, cache cleared
//!   start()          depth 1 -> 2
//!     move_node(..)  cache only
//!     commit(A, r1)  deferred: elements = A, run = r1
//!   end()            depth 2 -> 1
//!   commit(B, r2)    deferred: elements = A ∪ B, run = r2
//! end()              depth 1 -> 0, one host commit of A ∪ B with r2
//! ```

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::hash_map::Entry;
use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Rect, Size, Vec2};

use crate::bounds::BoundingBox;
use crate::error::{LayoutError, Result};
use crate::host::{LayoutHost, LayoutRun};

#[derive(Clone, Copy, Debug)]
struct CachedNode {
    size: Size,
    position: Point,
    relative: Point,
    first_seen: Point,
}

impl CachedNode {
    fn footprint(&self) -> Rect {
        Rect::from_center_size(self.position, self.size)
    }
}

/// Cached node geometry plus the nesting counter that batches host commits.
///
/// The session is an explicit context object: every layout entry point takes
/// one, and nested layouts share the caller's.
#[derive(Debug)]
pub struct PositionSession<K> {
    cache: HashMap<K, CachedNode>,
    depth: usize,
    include_labels: bool,
    pending: Vec<K>,
    pending_set: HashSet<K>,
    pending_run: Option<LayoutRun<K>>,
}

impl<K> Default for PositionSession<K> {
    fn default() -> Self {
        Self {
            cache: HashMap::new(),
            depth: 0,
            include_labels: true,
            pending: Vec::new(),
            pending_set: HashSet::new(),
            pending_run: None,
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> PositionSession<K> {
    /// An empty session at depth 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth. Zero means no session is open.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether node sizes read from the host include label extents.
    ///
    /// Applies to cache entries populated after the call.
    pub fn set_include_labels(&mut self, include: bool) {
        self.include_labels = include;
    }

    /// Whether a commit is waiting for the outermost session to end.
    pub fn has_pending_commit(&self) -> bool {
        self.pending_run.is_some()
    }

    /// Whether the node has a cache entry.
    pub fn is_cached(&self, node: K) -> bool {
        self.cache.contains_key(&node)
    }

    fn entry<H>(&mut self, host: &H, node: K) -> Result<&mut CachedNode>
    where
        H: LayoutHost<NodeId = K> + ?Sized,
    {
        let include_labels = self.include_labels;
        match self.cache.entry(node) {
            Entry::Occupied(hit) => Ok(hit.into_mut()),
            Entry::Vacant(slot) => {
                let missing = || LayoutError::missing(node);
                let position = host.position(node).ok_or_else(missing)?;
                let relative = host.relative_position(node).ok_or_else(missing)?;
                let size = host
                    .layout_dimensions(node, include_labels)
                    .ok_or_else(missing)?;
                Ok(slot.insert(CachedNode {
                    size,
                    position,
                    relative,
                    first_seen: position,
                }))
            }
        }
    }

    /// Absolute center of a node.
    pub fn position<H>(&mut self, host: &H, node: K) -> Result<Point>
    where
        H: LayoutHost<NodeId = K> + ?Sized,
    {
        Ok(self.entry(host, node)?.position)
    }

    /// Center relative to the parent's center.
    pub fn relative_position<H>(&mut self, host: &H, node: K) -> Result<Point>
    where
        H: LayoutHost<NodeId = K> + ?Sized,
    {
        Ok(self.entry(host, node)?.relative)
    }

    /// Layout size of a node.
    pub fn dimensions<H>(&mut self, host: &H, node: K) -> Result<Size>
    where
        H: LayoutHost<NodeId = K> + ?Sized,
    {
        Ok(self.entry(host, node)?.size)
    }

    /// Shift a node's absolute and relative position by `delta`.
    pub fn move_node<H>(&mut self, host: &H, node: K, delta: Vec2) -> Result<()>
    where
        H: LayoutHost<NodeId = K> + ?Sized,
    {
        let e = self.entry(host, node)?;
        e.position += delta;
        e.relative += delta;
        Ok(())
    }

    /// Grow a node's cached size.
    pub fn increase_size<H>(&mut self, host: &H, node: K, dw: f64, dh: f64) -> Result<()>
    where
        H: LayoutHost<NodeId = K> + ?Sized,
    {
        let e = self.entry(host, node)?;
        e.size = Size::new(e.size.width + dw, e.size.height + dh);
        Ok(())
    }

    /// Expand `bounds` to include the node's footprint.
    pub fn expand_bounds<H>(&mut self, host: &H, node: K, bounds: &mut BoundingBox) -> Result<()>
    where
        H: LayoutHost<NodeId = K> + ?Sized,
    {
        let footprint = self.entry(host, node)?.footprint();
        bounds.expand_to_include(footprint);
        Ok(())
    }

    /// Size a node to `bounds` and move it to the center of `bounds`.
    ///
    /// An empty `bounds` leaves the node untouched.
    pub fn set_from_bounds<H>(&mut self, host: &H, node: K, bounds: &BoundingBox) -> Result<()>
    where
        H: LayoutHost<NodeId = K> + ?Sized,
    {
        let e = self.entry(host, node)?;
        if bounds.is_empty() {
            return Ok(());
        }
        let delta = bounds.center() - e.position;
        e.size = Size::new(bounds.width(), bounds.height());
        e.position += delta;
        e.relative += delta;
        Ok(())
    }

    /// How far the node has moved since the session first saw it.
    pub fn displacement(&self, node: K) -> Option<Vec2> {
        self.cache.get(&node).map(|e| e.position - e.first_seen)
    }

    /// Open a session. The outermost start clears the cache.
    pub fn start(&mut self) {
        if self.depth == 0 {
            self.cache.clear();
            self.discard_pending();
            log::debug!(target: "trellis::session", "session opened");
        }
        self.depth += 1;
    }

    /// Close a session. The outermost end flushes the pending commit, if any.
    pub fn end<H>(&mut self, host: &mut H) -> Result<()>
    where
        H: LayoutHost<NodeId = K> + ?Sized,
    {
        if self.depth == 0 {
            return Err(LayoutError::UnbalancedSession);
        }
        self.depth -= 1;
        if self.depth > 0 {
            return Ok(());
        }
        let Some(run) = self.pending_run.take() else {
            log::debug!(target: "trellis::session", "session closed with nothing to commit");
            self.discard_pending();
            return Ok(());
        };
        let elements = core::mem::take(&mut self.pending);
        self.pending_set.clear();
        self.flush(host, &elements, run)
    }

    /// Run `f` inside a session.
    ///
    /// The session is closed on every exit path. If `f` fails and this was the
    /// outermost session, the pending commit is dropped instead of flushed.
    pub fn scope<H, T>(
        &mut self,
        host: &mut H,
        f: impl FnOnce(&mut Self, &mut H) -> Result<T>,
    ) -> Result<T>
    where
        H: LayoutHost<NodeId = K> + ?Sized,
    {
        self.start();
        match f(self, host) {
            Ok(value) => {
                self.end(host)?;
                Ok(value)
            }
            Err(err) => {
                self.abandon();
                Err(err)
            }
        }
    }

    fn abandon(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 && self.pending_run.is_some() {
            log::debug!(
                target: "trellis::session",
                "session failed; dropping commit of {} elements",
                self.pending.len()
            );
            self.discard_pending();
        }
    }

    fn discard_pending(&mut self) {
        self.pending.clear();
        self.pending_set.clear();
        self.pending_run = None;
    }

    /// Ask the host to position `elements`.
    ///
    /// With no session open this happens immediately. Inside a session the
    /// request is deferred: elements accumulate into a union and the latest
    /// `run` replaces any earlier one, so the events of a replaced run never
    /// fire.
    pub fn commit<H>(&mut self, host: &mut H, elements: &[K], run: LayoutRun<K>) -> Result<()>
    where
        H: LayoutHost<NodeId = K> + ?Sized,
    {
        if self.depth == 0 {
            return self.flush(host, elements, run);
        }
        for &node in elements {
            if self.pending_set.insert(node) {
                self.pending.push(node);
            }
        }
        log::trace!(
            target: "trellis::session",
            "deferred commit from {} ({} elements pending)",
            run.name,
            self.pending.len()
        );
        self.pending_run = Some(run);
        Ok(())
    }

    fn flush<H>(&mut self, host: &mut H, elements: &[K], mut run: LayoutRun<K>) -> Result<()>
    where
        H: LayoutHost<NodeId = K> + ?Sized,
    {
        for &node in elements {
            self.entry(host, node)?;
        }
        log::debug!(
            target: "trellis::session",
            "committing {} elements for {}",
            elements.len(),
            run.name
        );
        let cache = &self.cache;
        let transform = run.events.take_transform();
        host.layout_positions(elements, run, &mut |node| {
            let at = cache.get(&node).map_or(Point::ZERO, |e| e.position);
            transform.as_ref().map_or(at, |f| f(node, at))
        });
        Ok(())
    }
}
