//! Region selection and contour extraction for surface meshes.
//!
//! This umbrella crate re-exports the mesh-* crates and adds a small
//! operation layer on top: every processing step is a [`MeshOperation`]
//! value, and [`Stage`]/[`Pipeline`] cache results against the revision of
//! the mesh they were computed from.
//!
//! # Quick Start
//!
//! ```
//! use mesh::prelude::*;
//!
//! let mesh = SurfaceMesh::planar_grid(10, 10, 1.0);
//!
//! // Paint two strokes onto the mesh.
//! let mut selection = SelectionAccumulator::new();
//! selection.select(&mesh, &Point3::new(2.0, 2.0, 0.0), 1.5, SelectionMode::Append);
//! selection.select(&mesh, &Point3::new(3.0, 2.0, 0.0), 1.5, SelectionMode::Append);
//! let patch = selection.cumulative_selection_mesh(&mesh);
//!
//! // Trace the outline of the painted patch.
//! let rim = feature_edges(&patch, &FeatureEdgeParams::default()).unwrap();
//! let outline = extract_loop(&rim, &CleanParams::default()).unwrap();
//! assert!(outline.is_complete());
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - `SurfaceMesh`, `Cell`, `Aabb`, `MeshAdjacency`
//! - [`spatial`] - Vertex indices for radius and nearest-point queries
//! - [`region`] - Region growing, selection accumulation, patch normals
//! - [`contour`] - Plane cuts, cleaning, feature edges, loop ordering
//!
//! # Revisions
//!
//! A cached output is valid for exactly one mesh revision. Mutating a mesh
//! takes a fresh revision, which every [`Stage`] and
//! [`SelectionAccumulator`](region::SelectionAccumulator) notices on its
//! next call.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod ops;
mod pipeline;

pub use ops::{MeshOperation, OperationOutput};
pub use pipeline::{Pipeline, Stage};

pub use mesh_contour::{CleanOutcome, CleanParams, LoopExtraction};

// =============================================================================
// Re-exports
// =============================================================================

/// Core data structures: `SurfaceMesh`, `Cell`, `Aabb`, `MeshAdjacency`.
pub use mesh_types as types;

/// Vertex indices: `VertexGrid`, `LinearScan`.
pub use mesh_spatial as spatial;

/// Region growing and selection accumulation.
pub use mesh_region as region;

/// Plane cuts, cleaning, feature edges and loop ordering.
pub use mesh_contour as contour;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for selection and contour work.
///
/// # Usage
///
/// ```
/// use mesh::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mesh_types::{Aabb, Cell, CellKind, Point3, SurfaceMesh, Vector3};

    // Spatial
    pub use mesh_spatial::{SpatialIndex, VertexGrid};

    // Region
    pub use mesh_region::{
        CellRegion, NormalParams, RegionIndex, SelectionAccumulator, SelectionMode,
        aggregate_normal, cells_fully_within, compute_normals,
    };

    // Contour
    pub use mesh_contour::{
        CleanParams, ContourLoop, FeatureEdgeParams, Plane, clean_mesh, cut_with_plane,
        extract_loop, feature_edges, intersection_polygon, order_loop,
    };

    // Operations
    pub use crate::{MeshOperation, OperationOutput, Pipeline, Stage};
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prelude_imports() {
        use prelude::*;

        let mesh = SurfaceMesh::new();
        assert_eq!(mesh.vertex_count(), 0);
        assert!(order_loop(std::iter::empty()).is_empty());
    }

    #[test]
    fn module_reexports() {
        let _ = types::SurfaceMesh::unit_cube();
        let _ = spatial::IndexParams::default();
        let _ = region::SelectionAccumulator::new();
        let _ = contour::FeatureEdgeParams::default();
    }

    #[test]
    fn stage_caches_per_revision() {
        let mut mesh = types::SurfaceMesh::unit_cube();
        let mut stage = Stage::new(MeshOperation::Clean(CleanParams::default()));

        stage.compute(&mesh).unwrap();
        stage.compute(&mesh).unwrap();
        assert_eq!(stage.computations(), 1);
        assert!(stage.is_fresh(&mesh));

        mesh.translate(types::Vector3::new(1.0, 0.0, 0.0));
        assert!(!stage.is_fresh(&mesh));
        stage.compute(&mesh).unwrap();
        assert_eq!(stage.computations(), 2);

        stage.invalidate();
        assert!(stage.output().is_none());
    }

    #[test]
    fn pipeline_recomputes_downstream_only_on_change() {
        let section = contour::cut_with_plane(
            &types::SurfaceMesh::unit_cube(),
            &contour::Plane::horizontal(0.0),
        )
        .unwrap();
        let mut pipeline = Pipeline::new(MeshOperation::LoopExtract(CleanParams::default()))
            .with_clean(CleanParams::default())
            .with_clean(CleanParams::merge_only());
        assert_eq!(pipeline.len(), 3);

        pipeline.compute(&section).unwrap();
        pipeline.compute(&section).unwrap();
        assert!(pipeline.stages().all(|s| s.computations() == 1));

        let mut moved = section.clone();
        moved.translate(types::Vector3::new(0.0, 0.0, 1.0));
        let output = pipeline.compute(&moved).unwrap();
        assert!(output.as_contour().unwrap().is_complete());
        assert!(pipeline.stages().all(|s| s.computations() == 2));

        pipeline.invalidate();
        assert!(pipeline.terminal().output().is_none());
    }
}
