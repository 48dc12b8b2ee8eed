//! Spatial vertex index for surface meshes.
//!
//! This crate answers the two point queries the selection engine needs:
//!
//! - which vertices lie within a radius of a point;
//! - which vertex lies closest to a point.
//!
//! [`VertexGrid`] buckets vertices into a hashed uniform grid sized from the
//! mesh bounds so that each occupied bucket holds a handful of vertices.
//! [`LinearScan`] answers the same queries by brute force and serves as a
//! reference. Both implement [`SpatialIndex`].
//!
//! An index is a snapshot: it copies the vertex positions at build time and
//! records the mesh [`revision`](mesh_types::SurfaceMesh::revision) it was
//! built from. Rebuild it when the mesh changes.
//!
//! # Example
//!
//! ```
//! use mesh_spatial::{SpatialIndex, VertexGrid};
//! use mesh_types::{Point3, SurfaceMesh};
//!
//! let grid = SurfaceMesh::planar_grid(4, 4, 1.0);
//! let index = VertexGrid::new(&grid);
//!
//! let near = index.points_within_radius(&Point3::new(2.0, 2.0, 0.0), 1.0);
//! assert_eq!(near.len(), 5); // center plus its four axis neighbors
//!
//! assert_eq!(index.closest_point(&Point3::new(0.1, -0.2, 3.0)), Some(0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bucket;
mod error;
mod grid;
mod linear;
mod params;

pub use bucket::{BucketCoord, BucketRange};
pub use error::{SpatialError, SpatialResult};
pub use grid::VertexGrid;
pub use linear::LinearScan;
pub use params::IndexParams;

use hashbrown::HashSet;
use nalgebra::Point3;

/// Point queries over the vertices of one mesh snapshot.
///
/// Implementations must agree exactly: the same vertex set for a radius
/// query, and the same vertex for a nearest query, with ties going to the
/// smallest vertex id.
pub trait SpatialIndex {
    /// Every vertex whose Euclidean distance to `point` is at most `radius`.
    ///
    /// Returns an empty set when `radius` is not a positive finite number,
    /// when `point` is not finite, or when the index is empty.
    fn points_within_radius(&self, point: &Point3<f64>, radius: f64) -> HashSet<u32>;

    /// The vertex nearest to `point`, or `None` for an empty index.
    fn closest_point(&self, point: &Point3<f64>) -> Option<u32>;

    /// Number of indexed vertices.
    fn len(&self) -> usize;

    /// True if no vertex is indexed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Revision of the mesh the index was built from.
    fn source_revision(&self) -> u64;
}

/// True if a radius query with these arguments can match anything.
pub(crate) fn is_valid_query(point: &Point3<f64>, radius: f64) -> bool {
    radius > 0.0 && radius.is_finite() && is_finite_point(point)
}

pub(crate) fn is_finite_point(point: &Point3<f64>) -> bool {
    point.iter().all(|c| c.is_finite())
}

/// Keeps the nearer of two candidates, preferring the smaller id on ties.
#[allow(clippy::float_cmp)]
pub(crate) fn nearer(best: Option<(f64, u32)>, candidate: (f64, u32)) -> Option<(f64, u32)> {
    match best {
        Some((d, id)) if d < candidate.0 || (d == candidate.0 && id < candidate.1) => Some((d, id)),
        _ => Some(candidate),
    }
}
