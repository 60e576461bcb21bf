// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pass placement records.

use kurbo::{Point, Size};

/// Layout metadata for one child during one packing pass.
///
/// Records are side tables: they name a host node, they never own it. A fresh
/// set is built for every pass, so a failed pass leaves nothing to clean up.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePlacement<K> {
    /// The host node.
    pub node: K,
    /// Size used for packing.
    pub size: Size,
    pub(crate) placed: bool,
    pub(crate) target: Option<Point>,
}

impl<K> NodePlacement<K> {
    /// A record that has not been placed yet.
    pub fn new(node: K, size: Size) -> Self {
        Self {
            node,
            size,
            placed: false,
            target: None,
        }
    }

    /// Whether the packer has put this record into a grid cell.
    pub fn is_placed(&self) -> bool {
        self.placed
    }

    /// Center computed by the packer, relative to the parent's center.
    ///
    /// `None` until the packer has finished.
    pub fn target(&self) -> Option<Point> {
        self.target
    }

    pub(crate) fn mark_placed(&mut self) {
        debug_assert!(!self.placed, "placement record placed twice");
        self.placed = true;
    }
}
