// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental min/max bounding box.

use kurbo::{Point, Rect, Size};

/// Something a [`BoundingBox`] can grow to include.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Extent {
    /// A single point.
    Point(Point),
    /// Two corners. Each is folded in as an ordinary point; they are not paired
    /// per axis, so an inverted rectangle still grows the box to both corners.
    Corners(Point, Point),
    /// A size anchored at the box's current minimum corner.
    Size(Size),
}

impl From<Point> for Extent {
    fn from(p: Point) -> Self {
        Self::Point(p)
    }
}

impl From<Rect> for Extent {
    fn from(r: Rect) -> Self {
        Self::Corners(Point::new(r.x0, r.y0), Point::new(r.x1, r.y1))
    }
}

impl From<Size> for Extent {
    fn from(s: Size) -> Self {
        Self::Size(s)
    }
}

/// Axis-aligned box that grows as extents are folded in.
///
/// A fresh box is inverted at `(+∞, +∞, −∞, −∞)`; its width and height are
/// meaningless until something has been included. After any inclusion
/// `x1 <= x2` and `y1 <= y2`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum x.
    pub x1: f64,
    /// Minimum y.
    pub y1: f64,
    /// Maximum x.
    pub x2: f64,
    /// Maximum y.
    pub y2: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingBox {
    /// An empty box that includes nothing yet.
    pub const fn new() -> Self {
        Self {
            x1: f64::INFINITY,
            y1: f64::INFINITY,
            x2: f64::NEG_INFINITY,
            y2: f64::NEG_INFINITY,
        }
    }

    /// Grow to include `extent`.
    pub fn expand_to_include(&mut self, extent: impl Into<Extent>) {
        match extent.into() {
            Extent::Point(p) => self.include_point(p),
            Extent::Corners(a, b) => {
                self.include_point(a);
                self.include_point(b);
            }
            Extent::Size(s) => {
                self.x2 = self.x2.max(self.x1 + s.width);
                self.y2 = self.y2.max(self.y1 + s.height);
            }
        }
    }

    /// `x2 - x1`.
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// `y2 - y1`.
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Whether nothing has been included yet.
    pub fn is_empty(&self) -> bool {
        self.x1 > self.x2 || self.y1 > self.y2
    }

    /// Midpoint of the box. Undefined for an empty box.
    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) * 0.5, (self.y1 + self.y2) * 0.5)
    }

    /// The box as a [`Rect`], or `None` if nothing was included.
    pub fn to_rect(&self) -> Option<Rect> {
        if self.is_empty() {
            None
        } else {
            Some(Rect::new(self.x1, self.y1, self.x2, self.y2))
        }
    }

    fn include_point(&mut self, p: Point) {
        self.x1 = self.x1.min(p.x);
        self.x2 = self.x2.max(p.x);
        self.y1 = self.y1.min(p.y);
        self.y2 = self.y2.max(p.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_box_is_empty() {
        let b = BoundingBox::new();
        assert!(b.is_empty());
        assert!(b.to_rect().is_none());
    }

    #[test]
    fn points_fold_into_min_max() {
        let mut b = BoundingBox::new();
        b.expand_to_include(Point::new(3.0, -1.0));
        b.expand_to_include(Point::new(-2.0, 4.0));
        assert_eq!(b.to_rect(), Some(Rect::new(-2.0, -1.0, 3.0, 4.0)));
        assert_eq!(b.width(), 5.0);
        assert_eq!(b.height(), 5.0);
    }

    #[test]
    fn corners_are_not_axis_paired() {
        let mut b = BoundingBox::new();
        // An inverted rect still contributes both corners as plain points.
        b.expand_to_include(Rect {
            x0: 10.0,
            y0: 10.0,
            x1: 0.0,
            y1: 0.0,
        });
        assert_eq!(b.to_rect(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn size_is_anchored_at_min_corner() {
        let mut b = BoundingBox::new();
        b.expand_to_include(Point::new(5.0, 5.0));
        b.expand_to_include(Size::new(20.0, 2.0));
        assert_eq!(b.to_rect(), Some(Rect::new(5.0, 5.0, 25.0, 7.0)));
        // Smaller sizes never shrink the box.
        b.expand_to_include(Size::new(1.0, 1.0));
        assert_eq!(b.width(), 20.0);
    }
}
