//! Property-based tests for region growing and selection accumulation.

#![allow(clippy::unwrap_used)]

use mesh_region::{SelectionAccumulator, SelectionMode, cells_fully_within};
use mesh_types::{Point3, SurfaceMesh};
use proptest::prelude::*;

fn arb_pick() -> impl Strategy<Value = (Point3<f64>, f64)> {
    (-1.0..9.0f64, -1.0..9.0f64, -0.5..0.5f64, 0.1..3.0f64)
        .prop_map(|(x, y, z, r)| (Point3::new(x, y, z), r))
}

fn arb_mode() -> impl Strategy<Value = SelectionMode> {
    prop_oneof![Just(SelectionMode::Append), Just(SelectionMode::Replace)]
}

proptest! {
    /// Every selected cell has all vertices inside; every unselected cell has one outside.
    #[test]
    fn containment_is_strict((center, radius) in arb_pick()) {
        let mesh = SurfaceMesh::planar_grid(8, 8, 1.0);
        let region = cells_fully_within(&mesh, &center, radius);
        for (id, cell) in mesh.cells().iter().enumerate() {
            let id = u32::try_from(id).unwrap();
            let all_inside = cell
                .ids()
                .iter()
                .all(|&v| (mesh.position(v).unwrap() - center).norm() <= radius);
            prop_assert_eq!(region.contains(id), all_inside);
        }
    }

    /// Appends only grow the cumulative region; replaces never touch it.
    #[test]
    fn cumulative_region_is_monotonic(picks in prop::collection::vec((arb_pick(), arb_mode()), 1..12)) {
        let mesh = SurfaceMesh::planar_grid(8, 8, 1.0);
        let mut selection = SelectionAccumulator::new();
        let mut appended = Vec::new();

        for ((center, radius), mode) in picks {
            let before = selection.cumulative_region().clone();
            let centers_before = selection.selected_centers(&mesh);
            let last = selection.select(&mesh, &center, radius, mode).clone();

            prop_assert!(selection.cumulative_region().is_superset(&before));
            match mode {
                SelectionMode::Append => {
                    prop_assert!(selection.cumulative_region().is_superset(&last));
                    if !last.is_empty() {
                        appended.push(center);
                    }
                }
                SelectionMode::Replace => {
                    prop_assert_eq!(selection.cumulative_region(), &before);
                    prop_assert_eq!(selection.selected_centers(&mesh), centers_before);
                }
            }
        }
        prop_assert_eq!(selection.selected_centers(&mesh), appended);

        selection.clear();
        prop_assert!(selection.cumulative_region().is_empty());
    }
}
