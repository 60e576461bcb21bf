// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core graph implementation: structure, geometry updates, commits.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Point, Rect, Size, Vec2};

use crate::damage::Damage;
use crate::types::{LocalNode, NodeId};

/// Default padding between a compound node's boundary and its children.
///
/// Two sides of 11 add up to the 22 unit margin the grid layout reserves when it
/// sizes a compound node from its children.
pub const DEFAULT_COMPOUND_PADDING: f64 = 11.0;

/// One batch of positions applied through [`Graph::apply_positions`].
#[derive(Clone, Debug, PartialEq)]
pub struct CommitRecord {
    /// Name of the layout that produced the batch.
    pub layout: String,
    /// Every position handed over, in the order it was received.
    pub positions: Vec<(NodeId, Point)>,
    /// Nodes the layout asked to move with an animated transition.
    pub animated: Vec<NodeId>,
}

impl CommitRecord {
    /// Whether any node in the batch was to be animated.
    pub fn is_animated(&self) -> bool {
        !self.animated.is_empty()
    }
}

/// A compound graph: nodes may contain other nodes.
///
/// Leaf nodes carry their own center position and size. A node with at least
/// one live child is a *compound* node; its box is derived from the boxes of its
/// children (plus [`Graph::compound_padding`]) whenever [`Graph::commit`] runs,
/// so moving a compound node means moving its descendants.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Size};
/// use trellis_graph::{Graph, LocalNode};
///
/// let mut graph = Graph::new();
/// let parent = graph.insert(None, LocalNode::default());
/// let a = graph.insert(Some(parent), LocalNode::new(Point::new(0.0, 0.0), Size::new(10.0, 10.0)));
/// let b = graph.insert(Some(parent), LocalNode::new(Point::new(40.0, 0.0), Size::new(10.0, 10.0)));
/// graph.commit();
///
/// assert!(graph.is_compound(parent));
/// assert_eq!(graph.position(parent), Some(Point::new(20.0, 0.0)));
/// assert_eq!(graph.relative_position(b), Some(Point::new(20.0, 0.0)));
/// # let _ = a;
/// ```
pub struct Graph {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    compound_padding: f64,
    commits: Vec<CommitRecord>,
}

impl core::fmt::Debug for Graph {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Graph")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("compound_padding", &self.compound_padding)
            .field("commits", &self.commits.len())
            .finish_non_exhaustive()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalNode,
}

impl Node {
    fn new(generation: u32, local: LocalNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
        }
    }
}

impl Graph {
    /// Create an empty graph with [`DEFAULT_COMPOUND_PADDING`].
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            compound_padding: DEFAULT_COMPOUND_PADDING,
            commits: Vec::new(),
        }
    }

    /// Set the padding between a compound node's boundary and its children.
    pub fn with_compound_padding(mut self, padding: f64) -> Self {
        self.compound_padding = padding;
        self
    }

    /// Padding between a compound node's boundary and its children, per side.
    pub fn compound_padding(&self) -> f64 {
        self.compound_padding
    }

    /// Insert a new node as a child of `parent` (or as a root if `None`).
    ///
    /// Compound boxes are only re-derived on the next [`Graph::commit`].
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalNode) -> NodeId {
        let id = self.claim_slot(local);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove a node and its subtree.
    ///
    /// The returned damage covers the footprint of every removed node. The
    /// former parent's box is re-derived on the next [`Graph::commit`].
    pub fn remove(&mut self, id: NodeId) -> Damage {
        let mut damage = Damage::default();
        if !self.is_alive(id) {
            return damage;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for node in doomed {
            let footprint = self.node(node).local.footprint(true);
            damage.record(node, footprint, Rect::ZERO);
            self.nodes[node.idx()] = None;
            self.free_list.push(node.idx());
        }
        log::trace!(
            target: "trellis::graph",
            "removed {} nodes under {id:?}",
            damage.moved.len()
        );
        damage
    }

    /// Move `id` under `new_parent` (or make it a root).
    ///
    /// Reparenting a node under one of its own descendants is ignored; it would
    /// detach the subtree into a cycle.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = new_parent
            && (p == id || self.is_ancestor(id, p))
        {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
    }

    /// Move a node so that its center lands on `position`.
    ///
    /// Compound nodes cannot be placed directly; their descendants are shifted
    /// by the same offset instead, which moves the derived compound box.
    pub fn set_position(&mut self, id: NodeId, position: Point) {
        let Some(current) = self.position(id) else {
            return;
        };
        let delta = position - current;
        if delta == Vec2::ZERO {
            return;
        }
        for d in self.descendants(id) {
            self.node_mut(d).local.position += delta;
        }
        self.node_mut(id).local.position = position;
    }

    /// Update the body size of a node. Compound sizes are overwritten on commit.
    pub fn set_size(&mut self, id: NodeId, size: Size) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.size = size;
        }
    }

    /// Update the label extents of a node.
    pub fn set_label(&mut self, id: NodeId, label: Size) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.label = label;
        }
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|node| node.parent)
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.node_opt(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// Whether a live node contains other nodes.
    pub fn is_compound(&self, id: NodeId) -> bool {
        !self.children_of(id).is_empty()
    }

    /// All nodes below `id`, depth-first in child order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children_of(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children_of(next).iter().rev().copied());
        }
        out
    }

    /// Whether `ancestor` lies on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent_of(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent_of(p);
        }
        false
    }

    /// Center of a live node.
    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.node_opt(id).map(|n| n.local.position)
    }

    /// Center of a live node relative to its parent's center.
    ///
    /// Roots are relative to the origin, so this equals [`Graph::position`].
    pub fn relative_position(&self, id: NodeId) -> Option<Point> {
        let node = self.node_opt(id)?;
        let origin = node
            .parent
            .and_then(|p| self.position(p))
            .unwrap_or(Point::ORIGIN);
        Some((node.local.position - origin).to_point())
    }

    /// Body size of a live node.
    pub fn size(&self, id: NodeId) -> Option<Size> {
        self.node_opt(id).map(|n| n.local.size)
    }

    /// Size used by layouts, optionally including label extents.
    pub fn layout_dimensions(&self, id: NodeId, include_labels: bool) -> Option<Size> {
        self.node_opt(id).map(|n| n.local.layout_size(include_labels))
    }

    /// Body box of a live node.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.local.footprint(false))
    }

    /// Geometry of a live node.
    pub fn local(&self, id: NodeId) -> Option<&LocalNode> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// Live nodes without a parent, in slot order.
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                Some(n) if n.parent.is_none() =>
                {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "NodeId uses 32-bit indices by design."
                    )]
                    Some(NodeId::new(i as u32, n.generation))
                }
                _ => None,
            })
            .collect()
    }

    /// Re-derive every compound node's box from its children.
    ///
    /// Nodes are visited children-first, so nested compound nodes are sized
    /// before the compound nodes that contain them. A compound box is the union
    /// of its children's label-inclusive footprints grown by
    /// [`Graph::compound_padding`] on each side.
    pub fn commit(&mut self) -> Damage {
        let mut damage = Damage::default();
        let mut order = Vec::new();
        for root in self.roots() {
            order.push(root);
            order.extend(self.descendants(root));
        }
        for &id in order.iter().rev() {
            let Some(union) = self.children_union(id) else {
                continue;
            };
            let padded = union.inflate(self.compound_padding, self.compound_padding);
            let node = self.node_mut(id);
            let old = node.local.footprint(false);
            node.local.position = padded.center();
            node.local.size = padded.size();
            damage.record(id, old, padded);
        }
        if !damage.is_empty() {
            log::debug!(
                target: "trellis::graph",
                "commit resized {} compound nodes",
                damage.moved.len()
            );
        }
        damage
    }

    /// Apply a batch of node centers produced by a layout, then commit.
    ///
    /// Positions for compound nodes are ignored: their boxes follow from their
    /// children. Stale identifiers are skipped. The batch, together with the
    /// nodes the layout wanted `animated`, is appended to [`Graph::commits`].
    pub fn apply_positions(
        &mut self,
        layout: &str,
        positions: Vec<(NodeId, Point)>,
        animated: Vec<NodeId>,
    ) -> Damage {
        let mut damage = Damage::default();
        for &(id, position) in &positions {
            if !self.is_alive(id) || self.is_compound(id) {
                continue;
            }
            let node = self.node_mut(id);
            let old = node.local.footprint(false);
            node.local.position = position;
            let new = node.local.footprint(false);
            damage.record(id, old, new);
        }
        damage.merge(self.commit());
        self.commits.push(CommitRecord {
            layout: String::from(layout),
            positions,
            animated,
        });
        damage
    }

    /// Every batch applied so far, oldest first.
    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    /// Drain the commit log.
    pub fn take_commits(&mut self) -> Vec<CommitRecord> {
        core::mem::take(&mut self.commits)
    }

    // --- internals ---

    fn children_union(&self, id: NodeId) -> Option<Rect> {
        let mut it = self
            .children_of(id)
            .iter()
            .filter_map(|&c| self.node_opt(c))
            .map(|c| c.local.footprint(true));
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }

    /// Reuse a freed slot under a new generation, or grow the arena.
    fn claim_slot(&mut self, local: LocalNode) -> NodeId {
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.generations[idx] = self.generations[idx].saturating_add(1);
                idx
            }
            None => {
                self.nodes.push(None);
                self.generations.push(1);
                self.nodes.len() - 1
            }
        };
        let generation = self.generations[idx];
        self.nodes[idx] = Some(Node::new(generation, local));
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        NodeId::new(idx as u32, generation)
    }

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        let parent_node = self.node_mut(parent);
        parent_node.children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn leaf(x: f64, y: f64, w: f64, h: f64) -> LocalNode {
        LocalNode::new(Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn compound_box_follows_children() {
        let mut graph = Graph::new();
        let parent = graph.insert(None, LocalNode::default());
        let _a = graph.insert(Some(parent), leaf(0.0, 0.0, 10.0, 10.0));
        let _b = graph.insert(Some(parent), leaf(30.0, 20.0, 10.0, 10.0));
        let damage = graph.commit();

        assert_eq!(damage.moved, vec![parent]);
        assert_eq!(graph.position(parent), Some(Point::new(15.0, 10.0)));
        assert_eq!(graph.size(parent), Some(Size::new(40.0 + 22.0, 30.0 + 22.0)));
    }

    #[test]
    fn nested_compounds_are_sized_inside_out() {
        let mut graph = Graph::new().with_compound_padding(0.0);
        let outer = graph.insert(None, LocalNode::default());
        let inner = graph.insert(Some(outer), LocalNode::default());
        let _leaf = graph.insert(Some(inner), leaf(5.0, 5.0, 10.0, 10.0));
        let _other = graph.insert(Some(outer), leaf(50.0, 5.0, 10.0, 10.0));
        graph.commit();

        assert_eq!(graph.bounds(inner), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(graph.bounds(outer), Some(Rect::new(0.0, 0.0, 55.0, 10.0)));
    }

    #[test]
    fn relative_position_is_against_parent_center() {
        let mut graph = Graph::new();
        let parent = graph.insert(None, LocalNode::default());
        let a = graph.insert(Some(parent), leaf(-10.0, 0.0, 4.0, 4.0));
        let _b = graph.insert(Some(parent), leaf(10.0, 0.0, 4.0, 4.0));
        graph.commit();

        assert_eq!(graph.relative_position(a), Some(Point::new(-10.0, 0.0)));
        assert_eq!(graph.relative_position(parent), graph.position(parent));
    }

    #[test]
    fn moving_a_compound_moves_its_descendants() {
        let mut graph = Graph::new();
        let parent = graph.insert(None, LocalNode::default());
        let inner = graph.insert(Some(parent), LocalNode::default());
        let leaf_id = graph.insert(Some(inner), leaf(0.0, 0.0, 10.0, 10.0));
        graph.commit();

        graph.set_position(parent, Point::new(100.0, 50.0));
        graph.commit();
        assert_eq!(graph.position(leaf_id), Some(Point::new(100.0, 50.0)));
        assert_eq!(graph.position(parent), Some(Point::new(100.0, 50.0)));
    }

    #[test]
    fn descendants_are_depth_first() {
        let mut graph = Graph::new();
        // root -> [a -> [c, d], b]
        let root = graph.insert(None, LocalNode::default());
        let a = graph.insert(Some(root), LocalNode::default());
        let b = graph.insert(Some(root), LocalNode::default());
        let c = graph.insert(Some(a), LocalNode::default());
        let d = graph.insert(Some(a), LocalNode::default());

        assert_eq!(graph.descendants(root), vec![a, c, d, b]);
        assert_eq!(graph.descendants(a), vec![c, d]);
        assert!(graph.descendants(b).is_empty());
    }

    #[test]
    fn labels_extend_layout_dimensions() {
        let mut graph = Graph::new();
        let n = graph.insert(
            None,
            leaf(0.0, 0.0, 20.0, 10.0).with_label(Size::new(30.0, 6.0)),
        );
        assert_eq!(graph.layout_dimensions(n, false), Some(Size::new(20.0, 10.0)));
        assert_eq!(graph.layout_dimensions(n, true), Some(Size::new(30.0, 16.0)));
    }

    #[test]
    fn apply_positions_skips_compounds_and_logs_batch() {
        let mut graph = Graph::new();
        let parent = graph.insert(None, LocalNode::default());
        let a = graph.insert(Some(parent), leaf(0.0, 0.0, 10.0, 10.0));
        graph.commit();

        let damage = graph.apply_positions(
            "test",
            vec![(a, Point::new(20.0, 0.0)), (parent, Point::new(-500.0, 0.0))],
            vec![],
        );
        assert!(damage.moved.contains(&a));
        assert_eq!(graph.position(a), Some(Point::new(20.0, 0.0)));
        assert_eq!(graph.position(parent), Some(Point::new(20.0, 0.0)));
        assert_eq!(graph.commits().len(), 1);
        assert_eq!(graph.commits()[0].layout, "test");
        assert_eq!(graph.commits()[0].positions.len(), 2);
        assert!(!graph.commits()[0].is_animated());
    }

    #[test]
    fn removal_reports_the_vacated_subtree() {
        let mut graph = Graph::new().with_compound_padding(0.0);
        let root = graph.insert(None, LocalNode::default());
        let group = graph.insert(Some(root), LocalNode::default());
        let inner = graph.insert(Some(group), leaf(0.0, 0.0, 10.0, 10.0));
        let keep = graph.insert(Some(root), leaf(100.0, 0.0, 10.0, 10.0));
        graph.commit();
        assert_eq!(graph.size(root), Some(Size::new(110.0, 10.0)));

        let damage = graph.remove(group);
        assert_eq!(damage.moved, vec![inner, group]);
        assert_eq!(damage.union_rect(), Some(Rect::new(-5.0, -5.0, 5.0, 5.0)));
        assert!(!graph.is_alive(inner));
        assert_eq!(graph.children_of(root), &[keep]);

        graph.commit();
        assert_eq!(graph.size(root), Some(Size::new(10.0, 10.0)));
        assert!(graph.remove(group).is_empty(), "second removal is a no-op");
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut graph = Graph::new();
        let root = graph.insert(None, LocalNode::default());
        let child = graph.insert(Some(root), leaf(0.0, 0.0, 1.0, 1.0));
        graph.remove(root);
        assert!(!graph.is_alive(root));
        assert!(!graph.is_alive(child));
        assert!(graph.position(child).is_none());

        let reused = graph.insert(None, LocalNode::default());
        assert!(graph.is_alive(reused));
        assert_ne!(reused, root, "reused slot must carry a new generation");
        assert!(!graph.is_alive(root));
    }

    #[test]
    fn reparent_refuses_cycles() {
        let mut graph = Graph::new();
        let a = graph.insert(None, LocalNode::default());
        let b = graph.insert(Some(a), LocalNode::default());
        graph.reparent(a, Some(b));
        assert_eq!(graph.parent_of(a), None);
        assert_eq!(graph.parent_of(b), Some(a));
    }
}
