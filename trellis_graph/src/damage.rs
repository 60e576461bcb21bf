// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage summary types returned from commit.

use alloc::vec::Vec;
use hashbrown::HashSet;
use kurbo::Rect;

use crate::types::NodeId;

/// Changes produced by [`crate::Graph::commit`],
/// [`crate::Graph::apply_positions`], and [`crate::Graph::remove`].
#[derive(Clone, Debug, Default)]
pub struct Damage {
    /// Old and new footprints of every node whose box changed.
    pub dirty_rects: Vec<Rect>,
    /// Nodes whose position or size changed, or that were removed, in the
    /// order they were updated. Each node appears once.
    pub moved: Vec<NodeId>,
    seen: HashSet<NodeId>,
}

impl Damage {
    /// Returns `true` when nothing changed.
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty()
    }

    /// Returns the union of all damage rects.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }

    pub(crate) fn record(&mut self, id: NodeId, old: Rect, new: Rect) {
        if old == new {
            return;
        }
        if old.area() > 0.0 {
            self.dirty_rects.push(old);
        }
        if new.area() > 0.0 {
            self.dirty_rects.push(new);
        }
        self.mark_moved(id);
    }

    /// Fold `other` into `self`, keeping `moved` free of repeats.
    pub(crate) fn merge(&mut self, other: Self) {
        self.dirty_rects.extend(other.dirty_rects);
        for id in other.moved {
            self.mark_moved(id);
        }
    }

    fn mark_moved(&mut self, id: NodeId) {
        if self.seen.insert(id) {
            self.moved.push(id);
        }
    }
}
