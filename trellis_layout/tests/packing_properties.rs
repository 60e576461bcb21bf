// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the grid packer.

use kurbo::{Rect, Size};
use proptest::prelude::*;
use trellis_layout::{GridShape, LayoutGrid, NodePlacement};

fn sizes() -> impl Strategy<Value = Vec<Size>> {
    prop::collection::vec((1.0_f64..200.0, 1.0_f64..200.0), 1..40)
        .prop_map(|v| v.into_iter().map(|(w, h)| Size::new(w, h)).collect())
}

fn shape() -> impl Strategy<Value = (Option<usize>, Option<usize>)> {
    (prop::option::of(0_usize..8), prop::option::of(0_usize..8))
}

fn pack(sizes: &[Size], (rows, cols): (Option<usize>, Option<usize>)) -> LayoutGrid<usize> {
    let placements = sizes
        .iter()
        .enumerate()
        .map(|(i, &s)| NodePlacement::new(i, s))
        .collect::<Vec<_>>();
    let shape = GridShape::normalize(rows, cols, placements.len());
    LayoutGrid::new(usize::MAX, placements, shape).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Every child lands in exactly one cell.
    #[test]
    fn every_child_placed_once(sizes in sizes(), shape in shape()) {
        let grid = pack(&sizes, shape);
        let mut seen: Vec<usize> = grid.placed().map(|p| p.node).collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..sizes.len()).collect::<Vec<_>>());
        prop_assert!(grid.placements().iter().all(|p| p.is_placed() && p.target().is_some()));
        let cells: usize = (0..grid.row_count()).map(|r| grid.row(r).count()).sum();
        prop_assert_eq!(cells, sizes.len());
    }

    /// Target box and spacing stay positive however lopsided the children are.
    #[test]
    fn target_box_and_spacing_are_positive(sizes in sizes(), shape in shape()) {
        let grid = pack(&sizes, shape);
        prop_assert!(grid.target_box().width > 0.0 && grid.target_box().height > 0.0);
        prop_assert!(grid.spacing().x >= 15.0 && grid.spacing().y >= 15.0);
        prop_assert!(grid.packing_efficiency() > 0.0);
    }

    /// Packed children never overlap and the arrangement is centered.
    #[test]
    fn cells_are_disjoint_and_centered(sizes in sizes(), shape in shape()) {
        let grid = pack(&sizes, shape);
        let boxes: Vec<Rect> = grid
            .placements()
            .iter()
            .map(|p| Rect::from_center_size(p.target().unwrap(), p.size))
            .collect();
        for (i, a) in boxes.iter().enumerate() {
            for b in &boxes[i + 1..] {
                prop_assert!(a.intersect(*b).area() < 1e-6, "{:?} overlaps {:?}", a, b);
            }
        }
        let center = grid.bounding_box().unwrap().center();
        prop_assert!(center.x.abs() < 1e-6 && center.y.abs() < 1e-6);
    }

    /// Packing depends only on sizes and order, so a rerun reproduces it.
    #[test]
    fn rerun_reproduces_arrangement(sizes in sizes(), shape in shape()) {
        let first = pack(&sizes, shape);
        let second = pack(&sizes, shape);
        prop_assert_eq!(first.placements(), second.placements());
        prop_assert_eq!(first.row_count(), second.row_count());
    }

    /// Efficiency is the ideal area over the spacing-free area, so among
    /// packings that fall short of the ideal, the closer one scores higher.
    #[test]
    fn efficiency_tracks_closeness_to_ideal(sizes in sizes(), a in shape(), b in shape()) {
        let first = pack(&sizes, a);
        let second = pack(&sizes, b);
        let ratio = |grid: &LayoutGrid<usize>| {
            let summed = grid.summed_size();
            let shape = grid.shape();
            let ideal = (summed.width / shape.rows as f64) * (summed.height / shape.cols as f64);
            ideal / grid.no_space_size().area()
        };
        let (ra, rb) = (ratio(&first), ratio(&second));
        let (ea, eb) = (first.packing_efficiency(), second.packing_efficiency());
        prop_assert!((ea - ra).abs() <= 1e-9 * ra.max(1.0));
        prop_assert!((eb - rb).abs() <= 1e-9 * rb.max(1.0));
        if ra <= 1.0 && rb <= 1.0 && ((ra - 1.0).abs() - (rb - 1.0).abs()).abs() > 1e-6 {
            prop_assert_eq!((ra - 1.0).abs() < (rb - 1.0).abs(), ea > eb);
        }
    }

    /// A square grid of identical children packs perfectly.
    #[test]
    fn uniform_square_grid_is_fully_efficient(side in 1_usize..7, edge in 1.0_f64..100.0) {
        let sizes = vec![Size::new(edge, edge); side * side];
        let grid = pack(&sizes, (None, None));
        prop_assert_eq!(grid.row_count(), side);
        prop_assert!((grid.packing_efficiency() - 1.0).abs() < 1e-9);
    }
}
