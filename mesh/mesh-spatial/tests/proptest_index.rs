//! Property-based tests: the bucket grid must agree with a linear scan.

#![allow(clippy::unwrap_used)]

use hashbrown::HashSet;
use mesh_spatial::{IndexParams, LinearScan, SpatialIndex, VertexGrid};
use mesh_types::{Point3, SurfaceMesh};
use proptest::prelude::*;

fn arb_position() -> impl Strategy<Value = Point3<f64>> {
    (-50.0..50.0f64, -50.0..50.0f64, -5.0..5.0f64).prop_map(|(x, y, z)| Point3::new(x, y, z))
}

fn arb_cloud() -> impl Strategy<Value = SurfaceMesh> {
    prop::collection::vec(arb_position(), 0..200).prop_map(|points| {
        let mut mesh = SurfaceMesh::new();
        for p in points {
            mesh.push_vertex(p);
        }
        mesh
    })
}

fn sorted(set: HashSet<u32>) -> Vec<u32> {
    let mut v: Vec<_> = set.into_iter().collect();
    v.sort_unstable();
    v
}

proptest! {
    #[test]
    fn radius_queries_match(mesh in arb_cloud(), probe in arb_position(), radius in 0.0..40.0f64) {
        let grid = VertexGrid::new(&mesh);
        let linear = LinearScan::new(&mesh);
        prop_assert_eq!(
            sorted(grid.points_within_radius(&probe, radius)),
            sorted(linear.points_within_radius(&probe, radius))
        );
    }

    #[test]
    fn nearest_queries_match(mesh in arb_cloud(), probe in arb_position()) {
        let grid = VertexGrid::new(&mesh);
        let linear = LinearScan::new(&mesh);
        prop_assert_eq!(grid.closest_point(&probe), linear.closest_point(&probe));
    }

    #[test]
    fn explicit_bucket_sizes_match(
        mesh in arb_cloud(),
        probe in arb_position(),
        size in 0.1..30.0f64,
        radius in 0.1..20.0f64,
    ) {
        let grid = VertexGrid::build(&mesh, &IndexParams::default().with_bucket_size(size)).unwrap();
        let linear = LinearScan::new(&mesh);
        prop_assert_eq!(grid.closest_point(&probe), linear.closest_point(&probe));
        prop_assert_eq!(
            sorted(grid.points_within_radius(&probe, radius)),
            sorted(linear.points_within_radius(&probe, radius))
        );
    }
}
