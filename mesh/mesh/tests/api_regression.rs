//! API regression tests for the selection and contour crates.
//!
//! These tests pin the public surface used by applications, organized in
//! tiers that build on each other:
//!
//! - Tier 1: Foundation (mesh-types)
//! - Tier 2: Spatial queries (mesh-spatial)
//! - Tier 3: Selection (mesh-region)
//! - Tier 4: Contours (mesh-contour)
//! - Tier 5: Operations and pipelines (mesh)
//!
//! A failure here after an API change means the change is breaking and
//! needs a version bump.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::float_cmp)]

use approx::assert_relative_eq;
use mesh::{contour, prelude::*, region, spatial, types};

// =============================================================================
// TIER 1: Foundation
// =============================================================================

mod tier1_foundation {
    use super::*;

    #[test]
    fn mesh_construction() {
        let mesh = SurfaceMesh::new();
        assert!(mesh.is_empty());

        let mesh = SurfaceMesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![Cell::triangle([0, 1, 2]), Cell::line(0, 1), Cell::vertex(2)],
        )
        .unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.cell_count(), 3);
        assert_eq!(mesh.count_kind(CellKind::Polygon), 1);
        assert_eq!(mesh.count_kind(CellKind::Line), 1);
        assert!(mesh.to_string().contains("3 vertices"));
    }

    #[test]
    fn triangulated_rebuild() {
        let quad = SurfaceMesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![Cell::polygon([0, 1, 2, 3]), Cell::line(0, 2)],
        )
        .unwrap();
        assert_relative_eq!(quad.polygon_area_vector(0).unwrap().z, 1.0, epsilon = 1e-12);

        let tris = quad.triangles_only();
        assert_eq!(tris.cell_count(), 2);
        assert_relative_eq!(tris.surface_area(), 1.0, epsilon = 1e-12);
        assert!(tris.detail().to_string().starts_with("4 points\n"));
    }

    #[test]
    fn invalid_cells_are_rejected() {
        let result = SurfaceMesh::from_triangles(vec![Point3::origin()], &[[0, 1, 2]]);
        assert!(matches!(
            result,
            Err(types::MeshError::InvalidVertexIndex { index: 1, .. })
        ));
    }

    #[test]
    fn fixtures() {
        let cube = SurfaceMesh::unit_cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.cell_count(), 12);
        let bounds: Aabb = cube.bounds();
        assert_eq!(bounds.min, Point3::new(-0.5, -0.5, -0.5));
        assert_eq!(bounds.max, Point3::new(0.5, 0.5, 0.5));

        let grid = SurfaceMesh::planar_grid(3, 2, 1.0);
        assert_eq!(grid.vertex_count(), 12);
        assert_eq!(grid.cell_count(), 12);
    }

    #[test]
    fn every_mutation_changes_revision() {
        let mut mesh = SurfaceMesh::planar_grid(1, 1, 1.0);
        let r0 = mesh.revision();
        mesh.translate(Vector3::new(0.0, 0.0, 1.0));
        let r1 = mesh.revision();
        assert_ne!(r0, r1);
        assert!(mesh.set_position(0, Point3::new(5.0, 5.0, 5.0)));
        assert_ne!(mesh.revision(), r1);
        assert!(!mesh.set_position(99, Point3::origin()));
    }

    #[test]
    fn adjacency_queries() {
        let cube = SurfaceMesh::unit_cube();
        let adjacency = types::MeshAdjacency::build(&cube);
        assert!(adjacency.is_manifold());
        assert!(adjacency.boundary_edges().is_empty());
        assert_eq!(adjacency.edge_count(), 18);
    }

    #[test]
    fn submesh_extraction() {
        let cube = SurfaceMesh::unit_cube();
        let bottom = cube.extract_cells([1, 0]);
        assert_eq!(bottom.cell_count(), 2);
        assert_eq!(bottom.vertex_count(), 4);
    }
}

// =============================================================================
// TIER 2: Spatial queries
// =============================================================================

mod tier2_spatial {
    use super::*;
    use spatial::{IndexParams, LinearScan};

    #[test]
    fn index_params_builder() {
        let params = IndexParams::default();
        assert_eq!(params.points_per_bucket, 2);
        assert!(params.bucket_size.is_none());

        let params = IndexParams::coarse().with_bucket_size(0.5);
        assert_eq!(params.bucket_size, Some(0.5));
        assert!(IndexParams::default().with_bucket_size(-1.0).validate().is_err());
    }

    #[test]
    fn grid_and_scan_agree() {
        let grid_mesh = SurfaceMesh::planar_grid(8, 8, 1.0);
        let grid = VertexGrid::new(&grid_mesh);
        let scan = LinearScan::new(&grid_mesh);
        let p = Point3::new(3.2, 4.9, 0.3);

        assert_eq!(grid.closest_point(&p), scan.closest_point(&p));
        assert_eq!(
            grid.points_within_radius(&p, 2.0),
            scan.points_within_radius(&p, 2.0)
        );
        assert_eq!(grid.len(), 81);
        assert_eq!(grid.source_revision(), grid_mesh.revision());
    }

    #[test]
    fn empty_index_is_neutral() {
        let grid = VertexGrid::new(&SurfaceMesh::new());
        assert!(grid.is_empty());
        assert!(grid.closest_point(&Point3::origin()).is_none());
        assert!(grid.points_within_radius(&Point3::origin(), 10.0).is_empty());
    }
}

// =============================================================================
// TIER 3: Selection
// =============================================================================

mod tier3_selection {
    use super::*;
    use region::{SelectionRequest, SelectionState};

    #[test]
    fn stale_outputs_are_empty() {
        let mut mesh = SurfaceMesh::planar_grid(6, 6, 1.0);
        let mut selection = SelectionAccumulator::new();
        selection.select(&mesh, &Point3::new(2.0, 2.0, 0.0), 1.5, SelectionMode::Append);
        assert_eq!(selection.applied_cell_ids(&mesh).len(), 8);

        mesh.translate(Vector3::new(1.0, 0.0, 0.0));
        assert!(!selection.is_current(&mesh));
        assert!(selection.applied_cell_ids(&mesh).is_empty());
        assert!(selection.selected_centers(&mesh).is_empty());
        assert!(selection.cumulative_selection_mesh(&mesh).is_empty());
    }

    #[test]
    fn oriented_normals() {
        let cube = SurfaceMesh::unit_cube();
        let normals = compute_normals(&cube, &NormalParams::default()).unwrap();
        assert_eq!(normals.cell_normals.len(), 12);
        assert_eq!(normals.vertex_normals.len(), 8);
        assert_eq!(normals.flipped_cells, 0);
        assert_relative_eq!(
            normals.cell_normals[0],
            Vector3::new(0.0, 0.0, -1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn strict_containment() {
        let grid = SurfaceMesh::planar_grid(4, 4, 1.0);
        let region = cells_fully_within(&grid, &Point3::new(1.0, 1.0, 0.0), 1.5);
        assert_eq!(region.len(), 8);
        assert!(cells_fully_within(&grid, &Point3::new(1.0, 1.0, 0.0), 0.9).is_empty());
    }

    #[test]
    fn accumulator_lifecycle() {
        let mesh = SurfaceMesh::planar_grid(10, 10, 1.0);
        let mut selection = SelectionAccumulator::new();
        assert_eq!(selection.state(), SelectionState::Idle);

        selection.select(&mesh, &Point3::new(2.0, 2.0, 0.0), 1.5, SelectionMode::Append);
        selection.select(&mesh, &Point3::new(7.0, 7.0, 0.0), 1.5, SelectionMode::Append);
        assert_eq!(selection.state(), SelectionState::Selected);
        assert_eq!(selection.selected_centers(&mesh).len(), 2);
        assert_eq!(selection.cumulative_region().len(), 16);

        selection.select(&mesh, &Point3::new(5.0, 5.0, 0.0), 1.5, SelectionMode::Replace);
        assert_eq!(selection.last_region().len(), 8);
        assert_eq!(selection.cumulative_region().len(), 16);

        selection.clear();
        assert_eq!(selection.state(), SelectionState::Idle);
        assert!(selection.applied_cell_ids(&mesh).is_empty());
    }

    #[test]
    fn requests_and_flags() {
        let mesh = SurfaceMesh::planar_grid(4, 4, 1.0);
        let mut selection = SelectionAccumulator::new();

        let request = SelectionRequest::append(Point3::new(1.0, 1.0, 0.0), 1.5);
        assert_eq!(selection.apply(&mesh, &request).len(), 8);

        selection.select_with_flag(&mesh, &Point3::new(3.0, 3.0, 0.0), 1.5, false);
        assert_eq!(selection.selected_centers(&mesh).len(), 1);

        let before = selection.version();
        selection.select(&mesh, &Point3::origin(), -1.0, SelectionMode::Append);
        assert_eq!(selection.version(), before);
    }

    #[test]
    fn mutation_resets_selection() {
        let mut mesh = SurfaceMesh::planar_grid(4, 4, 1.0);
        let mut selection = SelectionAccumulator::new();
        selection.select(&mesh, &Point3::new(1.0, 1.0, 0.0), 1.5, SelectionMode::Append);

        mesh.translate(Vector3::new(0.0, 0.0, 1.0));
        assert!(selection.cumulative_selection_mesh(&mesh).is_empty());

        selection.select(&mesh, &Point3::new(3.0, 3.0, 1.0), 1.5, SelectionMode::Append);
        assert_eq!(selection.selected_centers(&mesh), vec![Point3::new(3.0, 3.0, 1.0)]);
        assert_eq!(selection.cumulative_selection_mesh(&mesh).cell_count(), 8);
    }

    #[test]
    fn patch_normal() {
        let cube = SurfaceMesh::unit_cube();
        let normal = aggregate_normal(&cube, [0, 1]);
        assert_relative_eq!(normal.z, -1.0, epsilon = 1e-12);
        assert_eq!(aggregate_normal(&cube, []), Vector3::zeros());
    }
}

// =============================================================================
// TIER 4: Contours
// =============================================================================

mod tier4_contours {
    use super::*;
    use contour::{CleanOutcome, ContourError, line_segments, polyline_mesh};

    #[test]
    fn loop_ordering() {
        let contour = order_loop([[0, 3], [2, 1], [1, 0], [3, 2]]);
        assert!(contour.is_closed());
        assert!(contour.matches_cycle(&[0, 1, 2, 3]));
        assert_eq!(contour.vertices()[0], 0);

        let open = order_loop([[0, 1], [1, 2]]);
        assert!(matches!(
            open.into_closed(3),
            Err(ContourError::OpenLoop { .. })
        ));
    }

    #[test]
    fn plane_section_pipeline() {
        let cube = SurfaceMesh::unit_cube();
        let plane = Plane::new(Point3::origin(), Vector3::new(0.0, 0.0, 2.0)).unwrap();
        let section = cut_with_plane(&cube, &plane).unwrap();
        assert_eq!(line_segments(&section).len(), 8);

        let outline = intersection_polygon(&cube, &plane, &CleanParams::default()).unwrap();
        assert_eq!(outline.len(), 8);

        let closed = polyline_mesh(&outline, true).unwrap();
        assert_eq!(closed.cell(0).unwrap().len(), 9);
    }

    #[test]
    fn clean_params_builder() {
        let params = CleanParams::default();
        assert_eq!(params.tolerance, 0.0);
        assert!(!params.tolerance_is_absolute);
        assert!(params.remove_duplicate_cells);
        assert!(params.triangulate);

        let params = CleanParams::default().with_absolute_tolerance(0.1).with_triangulate(false);
        assert!(params.tolerance_is_absolute);
        assert!(!params.triangulate);

        let outcome: CleanOutcome = clean_mesh(&SurfaceMesh::unit_cube(), &params).unwrap();
        assert!(outcome.is_unchanged());
    }

    #[test]
    fn feature_edge_extraction() {
        let grid = SurfaceMesh::planar_grid(3, 3, 1.0);
        let rim = feature_edges(&grid, &FeatureEdgeParams::default()).unwrap();
        assert_eq!(rim.cell_count(), 12);

        let outline = extract_loop(&rim, &CleanParams::default()).unwrap();
        assert!(outline.is_complete());
        assert!(contour::is_manifold(&grid));
    }
}

// =============================================================================
// TIER 5: Operations and pipelines
// =============================================================================

mod tier5_operations {
    use super::*;

    #[test]
    fn operation_dispatch() {
        let grid = SurfaceMesh::planar_grid(4, 4, 1.0);
        let ops = [
            MeshOperation::RegionGrow {
                center: Point3::new(1.0, 1.0, 0.0),
                radius: 1.5,
            },
            MeshOperation::NormalEstimate { cells: vec![0, 1] },
            MeshOperation::Clean(CleanParams::default()),
        ];
        let outputs: Vec<OperationOutput> = ops.iter().map(|op| op.apply(&grid).unwrap()).collect();

        assert_eq!(outputs[0].as_cells().unwrap().len(), 8);
        assert_relative_eq!(outputs[1].as_normal().unwrap().z, 1.0, epsilon = 1e-12);
        assert_eq!(outputs[2].as_mesh().unwrap(), &grid);
    }

    #[test]
    fn cached_selection_stage() {
        let mut grid = SurfaceMesh::planar_grid(4, 4, 1.0);
        let mut stage = Stage::new(MeshOperation::RegionGrow {
            center: Point3::new(1.0, 1.0, 0.0),
            radius: 1.5,
        });
        stage.compute(&grid).unwrap();
        assert!(stage.is_fresh(&grid));

        grid.set_position(0, Point3::new(0.0, 0.0, 5.0));
        assert!(!stage.is_fresh(&grid));
        let cells = stage.compute(&grid).unwrap().as_cells().unwrap().to_vec();
        assert_eq!(cells.len(), 6);
        assert_eq!(stage.computations(), 2);
    }

    #[test]
    fn section_pipeline() {
        let section = cut_with_plane(&SurfaceMesh::unit_cube(), &Plane::horizontal(-0.3)).unwrap();
        let mut pipeline = Pipeline::new(MeshOperation::LoopExtract(CleanParams::merge_only()))
            .with_clean(CleanParams::default().with_tolerance(1e-9));

        let points = pipeline.compute(&section).unwrap().as_contour().unwrap().points();
        assert_eq!(points.len(), 8);
        for p in &points {
            assert_relative_eq!(p.z, -0.3, epsilon = 1e-12);
        }
    }
}
