// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Graph: an in-memory compound graph for layout hosts.
//!
//! - Represents a hierarchy of nodes with center positions, body sizes, and label extents.
//! - Derives every compound node's box from its children on [`Graph::commit`].
//! - Accepts batches of positions from layouts through [`Graph::apply_positions`] and keeps a
//!   [`CommitRecord`] log of them.
//!
//! ## Not a layout engine
//!
//! This crate stores geometry; it does not arrange anything. Layout algorithms such as the
//! ones in `trellis_layout` read positions and sizes from the graph, compute new centers, and
//! hand them back in one batch.
//!
//! ## Compound nodes
//!
//! A node with live children is compound. Its position and size are not set independently:
//! they follow from the union of its children's footprints (labels included) grown by
//! [`Graph::compound_padding`] per side. [`Graph::set_position`] on a compound node shifts
//! its descendants instead.
//!
//! ## API overview
//!
//! - [`Graph`]: container managing nodes, structure, and commits.
//! - [`LocalNode`]: per-node geometry (center, size, label).
//! - [`NodeId`]: generational handle of a node.
//! - [`Damage`]: boxes and nodes changed by a commit.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod damage;
mod graph;
mod types;

pub use damage::Damage;
pub use graph::{CommitRecord, DEFAULT_COMPOUND_PADDING, Graph};
pub use types::{LocalNode, NodeId};
