// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the graph: node identifiers and per-node geometry.

use kurbo::{Point, Rect, Size};

/// Identifier for a node in the graph (generational).
///
/// A slot can be reused after [`Graph::remove`](crate::Graph::remove); the
/// generation makes identifiers that point at a freed slot stale instead of
/// silently aliasing the new occupant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Geometry of a single node.
///
/// Positions are node centers in graph coordinates. For compound nodes the
/// position and size are derived from the children on every
/// [`Graph::commit`](crate::Graph::commit), so values supplied here only seed
/// the node until the first commit.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalNode {
    /// Center of the node body.
    pub position: Point,
    /// Size of the node body.
    pub size: Size,
    /// Extents of the label stacked under the body; `Size::ZERO` when unlabeled.
    pub label: Size,
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            position: Point::ORIGIN,
            size: Size::ZERO,
            label: Size::ZERO,
        }
    }
}

impl LocalNode {
    /// An unlabeled node of the given size centered on `position`.
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            label: Size::ZERO,
        }
    }

    /// Attach label extents.
    pub fn with_label(mut self, label: Size) -> Self {
        self.label = label;
        self
    }

    /// Size used for layout, optionally including the label.
    ///
    /// A label stacks under the body: the width is the wider of the two and the
    /// heights add up.
    pub fn layout_size(&self, include_label: bool) -> Size {
        if include_label && self.label != Size::ZERO {
            Size::new(
                self.size.width.max(self.label.width),
                self.size.height + self.label.height,
            )
        } else {
            self.size
        }
    }

    /// Footprint centered on the node position.
    pub fn footprint(&self, include_label: bool) -> Rect {
        Rect::from_center_size(self.position, self.layout_size(include_label))
    }
}
