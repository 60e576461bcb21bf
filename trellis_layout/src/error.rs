// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for layout passes.

use alloc::string::String;
use thiserror::Error;

/// Result type alias for layout operations.
pub type Result<T> = core::result::Result<T, LayoutError>;

/// Errors that abort a layout pass.
///
/// None of these are retried. Placement records are rebuilt on every pass, so a
/// failed pass can be re-run from scratch once the cause is fixed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The layout was run against an empty collection.
    #[error("layout was given no target node")]
    NoTarget,

    /// The grid layout arranges the children of exactly one compound node.
    #[error("layout targets {count} elements; it arranges the children of exactly one node")]
    MultipleTargets {
        /// Number of elements in the rejected collection.
        count: usize,
    },

    /// No layout is registered under the requested name.
    #[error("no layout registered as {0:?}")]
    UnknownLayout(String),

    /// A session was ended more times than it was started.
    #[error("position session ended without a matching start")]
    UnbalancedSession,

    /// The row-filling loop ran past its iteration bound without placing every node.
    #[error("grid placement gave up after {attempts} attempts with {count} nodes")]
    PlacementOverrun {
        /// Attempts made before giving up.
        attempts: usize,
        /// Number of nodes being placed.
        count: usize,
    },

    /// A parent chain was longer than the nesting limit.
    #[error("compound nesting deeper than {limit}; the parent chain is cyclic or malformed")]
    NestingTooDeep {
        /// The nesting limit that was exceeded.
        limit: usize,
    },

    /// A node's parent chain ended before reaching the layout root.
    #[error("node {0} is not below the layout root")]
    DetachedNode(String),

    /// The host does not know a node the layout asked about.
    #[error("host has no node {0}")]
    MissingNode(String),
}

impl LayoutError {
    pub(crate) fn missing(node: impl core::fmt::Debug) -> Self {
        Self::MissingNode(alloc::format!("{node:?}"))
    }

    pub(crate) fn detached(node: impl core::fmt::Debug) -> Self {
        Self::DetachedNode(alloc::format!("{node:?}"))
    }
}
