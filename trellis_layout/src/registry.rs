// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named layouts a host can dispatch to.

use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;

use crate::compound_grid::CompoundGridLayout;
use crate::error::{LayoutError, Result};
use crate::host::{LayoutEvents, LayoutHost};
use crate::options::LayoutOptions;
use crate::recursive::RecursiveCompoundLayout;
use crate::session::PositionSession;

/// A layout algorithm runnable by name.
pub trait Layout<H: LayoutHost + ?Sized> {
    /// Registered name.
    fn name(&self) -> &'static str;

    /// Lay out `targets` and commit through `session`.
    fn run(
        &self,
        host: &mut H,
        session: &mut PositionSession<H::NodeId>,
        targets: &[H::NodeId],
        events: LayoutEvents<H::NodeId>,
    ) -> Result<()>;
}

impl<H: LayoutHost + ?Sized> Layout<H> for CompoundGridLayout {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(
        &self,
        host: &mut H,
        session: &mut PositionSession<H::NodeId>,
        targets: &[H::NodeId],
        events: LayoutEvents<H::NodeId>,
    ) -> Result<()> {
        Self::run(self, host, session, targets, events)
    }
}

impl<H: LayoutHost + ?Sized> Layout<H> for RecursiveCompoundLayout {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(
        &self,
        host: &mut H,
        session: &mut PositionSession<H::NodeId>,
        targets: &[H::NodeId],
        events: LayoutEvents<H::NodeId>,
    ) -> Result<()> {
        Self::run(self, host, session, targets, events).map(|_| ())
    }
}

/// Layouts keyed by name.
pub struct LayoutRegistry<H: LayoutHost + ?Sized> {
    layouts: HashMap<&'static str, Box<dyn Layout<H>>>,
}

impl<H: LayoutHost + ?Sized> Debug for LayoutRegistry<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutRegistry")
            .field("layouts", &self.names())
            .finish()
    }
}

impl<H: LayoutHost + ?Sized> Default for LayoutRegistry<H> {
    fn default() -> Self {
        Self {
            layouts: HashMap::new(),
        }
    }
}

impl<H: LayoutHost + ?Sized> LayoutRegistry<H> {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the grid and recursive layouts, both using `options`.
    pub fn with_builtin(options: LayoutOptions) -> Self {
        let mut registry = Self::new();
        registry.register(CompoundGridLayout::new(options.clone()));
        registry.register(RecursiveCompoundLayout::new(options));
        registry
    }

    /// Add a layout, replacing any registered under the same name.
    pub fn register(&mut self, layout: impl Layout<H> + 'static) {
        self.layouts.insert(layout.name(), Box::new(layout));
    }

    /// Whether a layout is registered as `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.layouts.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Run the layout registered as `name`.
    pub fn run(
        &self,
        name: &str,
        host: &mut H,
        session: &mut PositionSession<H::NodeId>,
        targets: &[H::NodeId],
        events: LayoutEvents<H::NodeId>,
    ) -> Result<()> {
        let layout = self
            .layouts
            .get(name)
            .ok_or_else(|| LayoutError::UnknownLayout(name.to_string()))?;
        layout.run(host, session, targets, events)
    }
}
