// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Layout: grid layouts for compound graph nodes.
//!
//! A compound node contains other nodes, and its box is derived from theirs. This crate
//! arranges a compound node's direct children in a grid without disturbing the inside of
//! any child, and repeats that over a whole nested subtree from the deepest level out, so
//! every compound node is packed only after its own compound children have their final size.
//!
//! ## Pieces
//!
//! - [`LayoutGrid`]: packs one set of siblings into rows aimed at a target [`GridShape`],
//!   scores the result with [`LayoutGrid::packing_efficiency`], and applies it.
//! - [`CompoundGridLayout`]: single-level layout; packs one node's children and commits.
//! - [`RecursiveCompoundLayout`]: runs the single-level layout deepest-first over a subtree.
//! - [`PositionSession`]: cached node geometry with a nesting counter; every commit requested
//!   while a session is open is coalesced into one host commit when the outermost ends.
//! - [`LayoutHost`]: what a graph engine provides. Nodes are referenced by the host's
//!   handle and never owned.
//! - [`LayoutRegistry`]: layouts by name, for hosts that dispatch on a string.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use trellis_graph::{Graph, LocalNode};
//! use trellis_layout::{LayoutEvents, LayoutOptions, PositionSession, RecursiveCompoundLayout};
//!
//! let mut graph = Graph::new();
//! let root = graph.insert(None, LocalNode::default());
//! let group = graph.insert(Some(root), LocalNode::default());
//! for i in 0..3 {
//!     let at = Point::new(f64::from(i) * 50.0, 0.0);
//!     graph.insert(Some(group), LocalNode::new(at, Size::new(10.0, 10.0)));
//! }
//! graph.insert(Some(root), LocalNode::new(Point::new(500.0, 500.0), Size::new(30.0, 30.0)));
//! graph.commit();
//!
//! let mut session = PositionSession::new();
//! let order = RecursiveCompoundLayout::new(LayoutOptions::default())
//!     .run(&mut graph, &mut session, &[root], LayoutEvents::new())
//!     .unwrap();
//!
//! assert_eq!(order, [group, root]);
//! assert_eq!(graph.commits().len(), 1);
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`] facade under the targets `trellis::session`,
//! `trellis::grid`, and `trellis::schedule`. No logger is installed.
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: `no_std` float support through `kurbo/libm`.
//! - `graph_adapter` (default): [`LayoutHost`] for [`trellis_graph::Graph`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
mod bounds;
mod compound_grid;
mod error;
mod grid;
mod host;
mod options;
mod placement;
mod recursive;
mod registry;
mod session;
mod util;

pub use bounds::{BoundingBox, Extent};
pub use compound_grid::CompoundGridLayout;
pub use error::{LayoutError, Result};
pub use grid::{COMPOUND_MARGIN, GridShape, LayoutGrid};
pub use host::{AnimateFilter, Callback, LayoutEvents, LayoutHost, LayoutRun, Transform};
pub use options::{Easing, LayoutOptions};
pub use placement::NodePlacement;
pub use recursive::{
    CompoundState, MAX_NESTING, RecursiveCompoundLayout, Schedule, ScheduledCompound, depth_below,
};
pub use registry::{Layout, LayoutRegistry};
pub use session::PositionSession;
