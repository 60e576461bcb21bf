// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid packer: arranges one parent's children into rows.
//!
//! Packing fills rows greedily against a *target box*, the footprint the grid
//! would have if every child were the same size:
//!
//! 1. The first unplaced child always opens a row.
//! 2. Further children join the row while more than 75% of their width fits in
//!    what is left of the (slackened) target width. Among those that fit, the
//!    one whose height is closest to the row height wins; being taller counts
//!    three times as much as being shorter. Ties keep input order.
//! 3. When nothing fits, the next row opens.
//!
//! Rows are then laid out top to bottom, children left to right, and the whole
//! arrangement is centered on the origin so targets are relative to the
//! parent's center.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Rect, Size, Vec2};
use smallvec::SmallVec;

use crate::bounds::BoundingBox;
use crate::error::{LayoutError, Result};
use crate::host::LayoutHost;
use crate::placement::NodePlacement;
use crate::session::PositionSession;
use crate::util::isqrt_ceil;

/// Slack applied to the target box when deciding row capacity.
const TARGET_SLACK: f64 = 1.1;
/// Smallest gap between cells, per axis.
const MIN_SPACING: f64 = 15.0;
/// Spacing as a share of the per-cell target size.
const SPACING_SHARE: f64 = 0.1;
/// A candidate joins a row when this share of its width still fits.
const MIN_FIT: f64 = 0.75;
/// Weight on candidates taller than the current row.
const TALLER_PENALTY: f64 = 3.0;
/// Margin added around a parent after its children are placed, both axes.
pub const COMPOUND_MARGIN: f64 = 22.0;

/// Target row and column counts for a grid.
///
/// These steer the packer; the packed grid may end up with a different shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridShape {
    /// Target number of rows.
    pub rows: usize,
    /// Target number of columns.
    pub cols: usize,
}

impl GridShape {
    /// A shape with both counts given. Zero counts are raised to one.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// Derive a shape for `count` children from optional row and column targets.
    ///
    /// A zero target is treated as absent. Oversized targets saturate instead
    /// of overflowing.
    ///
    /// - both: keep the `rows:cols` ratio, scaled so the cell count covers `count`;
    /// - one: hold it and derive the other;
    /// - neither: square, `ceil(sqrt(count))` each way.
    pub fn normalize(rows: Option<usize>, cols: Option<usize>, count: usize) -> Self {
        let rows = rows.filter(|&r| r > 0);
        let cols = cols.filter(|&c| c > 0);
        match (rows, cols) {
            (Some(r), Some(c)) => {
                let cols = isqrt_ceil(count.saturating_mul(c).div_ceil(r)).max(1);
                Self::new(count.div_ceil(cols), cols)
            }
            (Some(r), None) => Self::new(r, count.div_ceil(r)),
            (None, Some(c)) => Self::new(count.div_ceil(c), c),
            (None, None) => {
                let side = isqrt_ceil(count);
                Self::new(side, side)
            }
        }
    }

    /// Shapes with one column fewer and one more, rows re-derived for `count`.
    pub fn neighbours(self, count: usize) -> impl Iterator<Item = Self> {
        let fewer = (self.cols > 1).then(|| self.cols - 1);
        let more = self.cols.checked_add(1);
        fewer
            .into_iter()
            .chain(more)
            .map(move |cols| Self::new(count.div_ceil(cols), cols))
    }
}

#[derive(Clone, Debug, Default)]
struct Row {
    /// Indices into the placement list.
    cells: SmallVec<[usize; 8]>,
    width: f64,
    height: f64,
}

/// Row and column position for the next write.
#[derive(Copy, Clone, Debug, Default)]
struct Cursor {
    row: usize,
    col: usize,
}

/// The result of packing one parent's children.
#[derive(Clone, Debug)]
pub struct LayoutGrid<K> {
    parent: K,
    placements: Vec<NodePlacement<K>>,
    shape: GridShape,
    rows: Vec<Row>,
    summed: Size,
    largest: Size,
    ideal: Size,
    target_box: Size,
    spacing: Vec2,
    no_space: Size,
    bounds: BoundingBox,
}

impl<K: Copy + Eq + Hash + Debug> LayoutGrid<K> {
    /// Pack `placements` (the children of `parent`) toward `shape`.
    ///
    /// Fails with [`LayoutError::NoTarget`] when there is nothing to pack.
    pub fn new(parent: K, placements: Vec<NodePlacement<K>>, shape: GridShape) -> Result<Self> {
        Self::with_spacing_factor(parent, placements, shape, 1.0)
    }

    /// Like [`LayoutGrid::new`], with cell spacing scaled by `factor` when positive.
    pub fn with_spacing_factor(
        parent: K,
        placements: Vec<NodePlacement<K>>,
        shape: GridShape,
        factor: f64,
    ) -> Result<Self> {
        let limit = 3 * placements.len();
        Self::pack(parent, placements, shape, factor, limit)
    }

    fn pack(
        parent: K,
        placements: Vec<NodePlacement<K>>,
        shape: GridShape,
        factor: f64,
        limit: usize,
    ) -> Result<Self> {
        if placements.is_empty() {
            return Err(LayoutError::NoTarget);
        }
        let shape = GridShape::new(shape.rows, shape.cols);
        let mut summed = Size::ZERO;
        let mut largest = Size::ZERO;
        for p in &placements {
            summed.width += p.size.width;
            summed.height += p.size.height;
            largest.width = largest.width.max(p.size.width);
            largest.height = largest.height.max(p.size.height);
        }
        let rows_f = shape.rows as f64;
        let cols_f = shape.cols as f64;
        let ideal = Size::new(summed.width / rows_f, summed.height / cols_f);
        let target_box = ideal * TARGET_SLACK;
        let factor = if factor > 0.0 { factor } else { 1.0 };
        let spacing = Vec2::new(
            MIN_SPACING.max(SPACING_SHARE * target_box.width / cols_f),
            MIN_SPACING.max(SPACING_SHARE * target_box.height / rows_f),
        ) * factor;

        let mut grid = Self {
            parent,
            placements,
            shape,
            rows: Vec::new(),
            summed,
            largest,
            ideal,
            target_box,
            spacing,
            no_space: Size::ZERO,
            bounds: BoundingBox::new(),
        };
        grid.fill_rows(limit)?;
        grid.assign_coordinates();
        log::debug!(
            target: "trellis::grid",
            "packed {} children of {:?} into {} rows (target {}x{}, efficiency {:.3})",
            grid.placements.len(),
            grid.parent,
            grid.rows.len(),
            shape.rows,
            shape.cols,
            grid.packing_efficiency()
        );
        Ok(grid)
    }

    fn place(&mut self, cursor: &mut Cursor, index: usize) {
        if cursor.row == self.rows.len() {
            self.rows.push(Row::default());
        }
        let size = self.placements[index].size;
        let row = &mut self.rows[cursor.row];
        row.cells.push(index);
        row.width += size.width;
        row.height = row.height.max(size.height);
        self.placements[index].mark_placed();
        log::trace!(
            target: "trellis::grid",
            "{:?} -> row {} col {}",
            self.placements[index].node,
            cursor.row,
            cursor.col
        );
        cursor.col += 1;
    }

    /// The best unplaced candidate for the current row, if any fits.
    fn best_fit(&self, row: &Row) -> Option<usize> {
        let remaining = self.target_box.width - row.width;
        let mut best: Option<(usize, f64)> = None;
        for (i, p) in self.placements.iter().enumerate() {
            let fits = remaining / p.size.width > MIN_FIT;
            if p.placed || !fits {
                continue;
            }
            let delta = p.size.height - row.height;
            let score = if delta > 0.0 {
                delta * TALLER_PENALTY
            } else {
                -delta
            };
            if best.is_none_or(|(_, s)| score < s) {
                best = Some((i, score));
            }
        }
        best.map(|(i, _)| i)
    }

    fn fill_rows(&mut self, limit: usize) -> Result<()> {
        let count = self.placements.len();
        let mut cursor = Cursor::default();
        let mut placed = 0;
        let mut attempts = 0;
        while placed < count {
            if attempts >= limit {
                return Err(LayoutError::PlacementOverrun { attempts, count });
            }
            attempts += 1;
            if cursor.col == 0 {
                let Some(first) = self.placements.iter().position(|p| !p.placed) else {
                    break;
                };
                self.place(&mut cursor, first);
                placed += 1;
                continue;
            }
            match self.best_fit(&self.rows[cursor.row]) {
                Some(i) => {
                    self.place(&mut cursor, i);
                    placed += 1;
                }
                None => {
                    cursor.row += 1;
                    cursor.col = 0;
                }
            }
        }
        Ok(())
    }

    fn assign_coordinates(&mut self) {
        let mut bounds = BoundingBox::new();
        let mut no_space = Size::ZERO;
        let mut y = 0.0;
        for row in &self.rows {
            y += row.height / 2.0;
            let mut x = 0.0;
            for &i in &row.cells {
                let p = &mut self.placements[i];
                x += p.size.width / 2.0;
                let center = Point::new(x, y);
                p.target = Some(center);
                bounds.expand_to_include(Rect::from_center_size(center, p.size));
                x += p.size.width / 2.0 + self.spacing.x;
            }
            y += row.height / 2.0 + self.spacing.y;
            no_space.width = no_space.width.max(row.width);
            no_space.height += row.height;
        }

        let offset = bounds.center().to_vec2();
        let mut centered = BoundingBox::new();
        for p in &mut self.placements {
            if let Some(t) = p.target.as_mut() {
                *t -= offset;
                centered.expand_to_include(Rect::from_center_size(*t, p.size));
            }
        }
        self.bounds = centered;
        self.no_space = no_space;
    }

    /// Ideal box area over the achieved box area, ignoring spacing.
    ///
    /// 1.0 for a perfectly uniform grid; lower means more wasted space. Only
    /// meaningful as a comparison between grids over the same children.
    pub fn packing_efficiency(&self) -> f64 {
        let achieved = self.no_space.width * self.no_space.height;
        if achieved > 0.0 {
            self.ideal.width * self.ideal.height / achieved
        } else {
            0.0
        }
    }

    /// Move the children to their packed positions and fit the parent around them.
    ///
    /// Compound children carry their descendants along. The parent is then
    /// sized to the children's bounds plus [`COMPOUND_MARGIN`].
    pub fn apply<H>(&self, session: &mut PositionSession<K>, host: &H) -> Result<()>
    where
        H: LayoutHost<NodeId = K> + ?Sized,
    {
        let mut bounds = BoundingBox::new();
        for p in self.placed() {
            let Some(target) = p.target else { continue };
            let current = session.relative_position(host, p.node)?;
            let delta = target - current;
            session.move_node(host, p.node, delta)?;
            if host.is_compound(p.node) {
                for d in host.descendants(p.node) {
                    session.move_node(host, d, delta)?;
                }
            }
            session.expand_bounds(host, p.node, &mut bounds)?;
        }
        session.set_from_bounds(host, self.parent, &bounds)?;
        session.increase_size(host, self.parent, COMPOUND_MARGIN, COMPOUND_MARGIN)
    }

    /// Placements in row-major order.
    pub fn placed(&self) -> impl Iterator<Item = &NodePlacement<K>> + '_ {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter().map(|&i| &self.placements[i]))
    }

    /// The parent whose children were packed.
    pub fn parent(&self) -> K {
        self.parent
    }

    /// Placement records in input order.
    pub fn placements(&self) -> &[NodePlacement<K>] {
        &self.placements
    }

    /// The target shape the grid was packed toward.
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Number of rows produced.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Nodes in row `row`, left to right.
    pub fn row(&self, row: usize) -> impl Iterator<Item = K> + '_ {
        self.rows
            .get(row)
            .into_iter()
            .flat_map(|r| r.cells.iter().map(|&i| self.placements[i].node))
    }

    /// Summed child widths and the tallest child of row `row`.
    pub fn row_size(&self, row: usize) -> Option<Size> {
        self.rows.get(row).map(|r| Size::new(r.width, r.height))
    }

    /// Sum of child widths and of child heights.
    pub fn summed_size(&self) -> Size {
        self.summed
    }

    /// Widest and tallest child dimensions.
    pub fn largest_size(&self) -> Size {
        self.largest
    }

    /// Target box including slack.
    pub fn target_box(&self) -> Size {
        self.target_box
    }

    /// Gap between cells.
    pub fn spacing(&self) -> Vec2 {
        self.spacing
    }

    /// Extent of the rows with spacing removed.
    pub fn no_space_size(&self) -> Size {
        self.no_space
    }

    /// Bounds of the packed children, centered on the origin.
    pub fn bounding_box(&self) -> Option<Rect> {
        self.bounds.to_rect()
    }
}
