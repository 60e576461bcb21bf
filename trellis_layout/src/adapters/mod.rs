// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters that let other Trellis crates act as layout hosts.
//!
//! Each adapter is gated behind a feature flag so the core stays `no_std` and
//! host-agnostic.
//!
//! ## Available Adapters
//!
//! - [`graph`] (`graph_adapter` feature): [`LayoutHost`](crate::LayoutHost) for
//!   [`trellis_graph::Graph`].

#[cfg(feature = "graph_adapter")]
pub mod graph;
