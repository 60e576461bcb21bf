// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the layouts and the graph engine that owns the nodes.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Size};

use crate::options::LayoutOptions;

/// A one-shot layout event handler.
pub type Callback = Box<dyn FnOnce()>;

/// Rewrites a node's final position just before the host receives it.
pub type Transform<K> = Box<dyn Fn(K, Point) -> Point>;

/// Decides per element whether the host animates it; gets the node and its
/// index in the committed element list.
pub type AnimateFilter<K> = Box<dyn Fn(K, usize) -> bool>;

/// Caller hooks for one layout run.
///
/// The host fires `ready` once it starts applying positions and `stop` once
/// they are final (after any animation). The session runs the `transform` on
/// every committed position, and the host asks the animate filter which
/// elements to animate when the run's options enable animation.
pub struct LayoutEvents<K> {
    ready: Option<Callback>,
    stop: Option<Callback>,
    transform: Option<Transform<K>>,
    animate_filter: Option<AnimateFilter<K>>,
}

impl<K> Default for LayoutEvents<K> {
    fn default() -> Self {
        Self {
            ready: None,
            stop: None,
            transform: None,
            animate_filter: None,
        }
    }
}

impl<K> Debug for LayoutEvents<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutEvents")
            .field("ready", &self.ready.is_some())
            .field("stop", &self.stop.is_some())
            .field("transform", &self.transform.is_some())
            .field("animate_filter", &self.animate_filter.is_some())
            .finish()
    }
}

impl<K> LayoutEvents<K> {
    /// No handlers; positions pass through and every element animates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `ready` handler.
    pub fn on_ready(mut self, f: impl FnOnce() + 'static) -> Self {
        self.ready = Some(Box::new(f));
        self
    }

    /// Set the `stop` handler.
    pub fn on_stop(mut self, f: impl FnOnce() + 'static) -> Self {
        self.stop = Some(Box::new(f));
        self
    }

    /// Set the position transform.
    pub fn with_transform(mut self, f: impl Fn(K, Point) -> Point + 'static) -> Self {
        self.transform = Some(Box::new(f));
        self
    }

    /// Set the animate filter.
    pub fn with_animate_filter(mut self, f: impl Fn(K, usize) -> bool + 'static) -> Self {
        self.animate_filter = Some(Box::new(f));
        self
    }

    /// Run the `ready` handler, at most once.
    pub fn fire_ready(&mut self) {
        if let Some(f) = self.ready.take() {
            f();
        }
    }

    /// Run the `stop` handler, at most once.
    pub fn fire_stop(&mut self) {
        if let Some(f) = self.stop.take() {
            f();
        }
    }

    pub(crate) fn take_transform(&mut self) -> Option<Transform<K>> {
        self.transform.take()
    }

    /// Whether the element at `index` should animate. `true` without a filter.
    pub fn animates(&self, node: K, index: usize) -> bool {
        self.animate_filter.as_ref().is_none_or(|f| f(node, index))
    }
}

/// Everything a host needs to carry out a position commit.
#[derive(Debug)]
pub struct LayoutRun<K> {
    /// Name of the layout that produced the positions.
    pub name: &'static str,
    /// Options the layout ran with.
    pub options: LayoutOptions,
    /// Caller hooks.
    pub events: LayoutEvents<K>,
}

impl<K> LayoutRun<K> {
    /// A run with no hooks.
    pub fn new(name: &'static str, options: LayoutOptions) -> Self {
        Self {
            name,
            options,
            events: LayoutEvents::default(),
        }
    }

    /// Attach caller hooks.
    pub fn with_events(mut self, events: LayoutEvents<K>) -> Self {
        self.events = events;
        self
    }

    /// Whether the host should animate the element at `index`.
    pub fn animates(&self, node: K, index: usize) -> bool {
        self.options.animate && self.events.animates(node, index)
    }
}

/// The graph engine the layouts read from and commit to.
///
/// The host owns node identity, structure, and geometry. Layouts never hold
/// host nodes; they keep side tables keyed by [`LayoutHost::NodeId`].
///
/// Positions are node centers. A compound node's position and size follow from
/// its descendants, so the layouts move compound nodes by moving every
/// descendant.
pub trait LayoutHost {
    /// Node handle.
    type NodeId: Copy + Eq + Hash + Debug;

    /// Absolute center of a node, or `None` if the node is unknown.
    fn position(&self, node: Self::NodeId) -> Option<Point>;

    /// Center relative to the parent's center, or `None` if the node is unknown.
    fn relative_position(&self, node: Self::NodeId) -> Option<Point>;

    /// Size used for layout, or `None` if the node is unknown.
    fn layout_dimensions(&self, node: Self::NodeId, include_labels: bool) -> Option<Size>;

    /// Parent of a node, `None` for roots.
    fn parent(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    /// Direct children in host order.
    fn children(&self, node: Self::NodeId) -> Vec<Self::NodeId>;

    /// Every node below `node`, excluding `node` itself.
    fn descendants(&self, node: Self::NodeId) -> Vec<Self::NodeId>;

    /// Whether the node contains other nodes.
    fn is_compound(&self, node: Self::NodeId) -> bool {
        !self.children(node).is_empty()
    }

    /// Assign positions to `elements`.
    ///
    /// The host calls `position_of` once per element, applies the results
    /// (animating the elements [`LayoutRun::animates`] selects), and fires the
    /// run's `ready` and `stop` events. Positions from `position_of` already
    /// carry the run's transform.
    fn layout_positions(
        &mut self,
        elements: &[Self::NodeId],
        run: LayoutRun<Self::NodeId>,
        position_of: &mut dyn FnMut(Self::NodeId) -> Point,
    );
}
