// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout configuration.

use kurbo::{Point, Rect};

/// Easing curve a host may use when animating to committed positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Slow start.
    EaseIn,
    /// Slow finish.
    EaseOut,
    /// Slow start and finish.
    EaseInOut,
}

/// Options for the compound grid layouts.
///
/// The grid shape fields are targets, not limits: `rows` and `cols` shape the
/// grid the packer aims for, and the number of nodes per row still varies with
/// node sizes.
///
/// - neither given: aim for a square grid;
/// - one given: hold that count and derive the other from the node count;
/// - both given: keep their ratio, scaled to the node count.
///
/// The viewport and animation fields are not interpreted by the layouts; they
/// travel with the commit to the host.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutOptions {
    /// Target number of rows.
    pub rows: Option<usize>,
    /// Target number of columns.
    pub cols: Option<usize>,
    /// Padding around the layout, for the host's viewport fit.
    pub padding: f64,
    /// Bounds the host may constrain the result to.
    pub bounding_box: Option<Rect>,
    /// Multiplier on the spacing between grid cells when positive.
    pub spacing_factor: Option<f64>,
    /// Whether node labels count toward node sizes.
    pub node_dimensions_include_labels: bool,
    /// Whether the host should animate to the new positions.
    pub animate: bool,
    /// Animation length in milliseconds.
    pub animation_duration_ms: u32,
    /// Animation curve.
    pub animation_easing: Option<Easing>,
    /// Fit the viewport to the result. Overrides `pan` and `zoom`.
    pub fit: bool,
    /// Viewport position to leave the display at.
    pub pan: Option<Point>,
    /// Zoom level to leave the display at.
    pub zoom: Option<f64>,
    /// Also pack with neighbouring target shapes and keep the most efficient result.
    pub alternate_shapes: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            rows: None,
            cols: None,
            padding: 30.0,
            bounding_box: None,
            spacing_factor: None,
            node_dimensions_include_labels: true,
            animate: true,
            animation_duration_ms: 500,
            animation_easing: None,
            fit: false,
            pan: None,
            zoom: None,
            alternate_shapes: false,
        }
    }
}

impl LayoutOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target number of rows.
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Set the target number of columns.
    pub fn with_cols(mut self, cols: usize) -> Self {
        self.cols = Some(cols);
        self
    }

    /// Set the spacing multiplier.
    pub fn with_spacing_factor(mut self, factor: f64) -> Self {
        self.spacing_factor = Some(factor);
        self
    }

    /// Choose whether labels count toward node sizes.
    pub fn with_labels(mut self, include: bool) -> Self {
        self.node_dimensions_include_labels = include;
        self
    }

    /// Enable or disable animation.
    pub fn with_animation(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    /// Try neighbouring target shapes as well.
    pub fn with_alternate_shapes(mut self, enabled: bool) -> Self {
        self.alternate_shapes = enabled;
        self
    }

    /// The spacing multiplier, if one is set and usable.
    pub(crate) fn spacing_multiplier(&self) -> f64 {
        match self.spacing_factor {
            Some(f) if f > 0.0 => f,
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let o = LayoutOptions::default();
        assert_eq!(o.padding, 30.0);
        assert!(o.animate);
        assert_eq!(o.animation_duration_ms, 500);
        assert!(o.node_dimensions_include_labels);
        assert!(o.rows.is_none() && o.cols.is_none());
    }

    #[test]
    fn non_positive_spacing_factor_is_ignored() {
        assert_eq!(LayoutOptions::new().spacing_multiplier(), 1.0);
        assert_eq!(LayoutOptions::new().with_spacing_factor(0.0).spacing_multiplier(), 1.0);
        assert_eq!(LayoutOptions::new().with_spacing_factor(2.0).spacing_multiplier(), 2.0);
    }
}
