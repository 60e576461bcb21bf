// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`LayoutHost`] for [`trellis_graph::Graph`].
//!
//! The graph applies a whole batch at once: leaf positions are written, every
//! compound box is re-derived, and the batch lands in the graph's commit log.
//! The graph has no clock, so animated runs complete immediately and `ready`
//! and `stop` fire back to back.
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use trellis_graph::{Graph, LocalNode};
//! use trellis_layout::{CompoundGridLayout, LayoutEvents, LayoutOptions, PositionSession};
//!
//! let mut graph = Graph::new();
//! let parent = graph.insert(None, LocalNode::default());
//! for x in [0.0, 100.0, 200.0, 300.0] {
//!     graph.insert(Some(parent), LocalNode::new(Point::new(x, 0.0), Size::new(20.0, 20.0)));
//! }
//! graph.commit();
//!
//! let mut session = PositionSession::new();
//! CompoundGridLayout::new(LayoutOptions::default())
//!     .run(&mut graph, &mut session, &[parent], LayoutEvents::new())
//!     .unwrap();
//!
//! assert_eq!(graph.commits().len(), 1);
//! assert_eq!(graph.size(parent), Some(Size::new(77.0, 77.0)));
//! ```

use alloc::vec::Vec;

use kurbo::{Point, Size};
use trellis_graph::{Graph, NodeId};

use crate::host::{LayoutHost, LayoutRun};

impl LayoutHost for Graph {
    type NodeId = NodeId;

    fn position(&self, node: NodeId) -> Option<Point> {
        Self::position(self, node)
    }

    fn relative_position(&self, node: NodeId) -> Option<Point> {
        Self::relative_position(self, node)
    }

    fn layout_dimensions(&self, node: NodeId, include_labels: bool) -> Option<Size> {
        Self::layout_dimensions(self, node, include_labels)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent_of(node)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.children_of(node).to_vec()
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        Self::descendants(self, node)
    }

    fn is_compound(&self, node: NodeId) -> bool {
        Self::is_compound(self, node)
    }

    fn layout_positions(
        &mut self,
        elements: &[NodeId],
        mut run: LayoutRun<NodeId>,
        position_of: &mut dyn FnMut(NodeId) -> Point,
    ) {
        let positions = elements.iter().map(|&id| (id, position_of(id))).collect();
        let animated = elements
            .iter()
            .enumerate()
            .filter(|&(i, &id)| run.animates(id, i))
            .map(|(_, &id)| id)
            .collect();
        run.events.fire_ready();
        let damage = self.apply_positions(run.name, positions, animated);
        log::debug!(
            target: "trellis::graph",
            "{} moved {} nodes",
            run.name,
            damage.moved.len()
        );
        run.events.fire_stop();
    }
}
