//! Surface mesh model for region selection and contour extraction.
//!
//! This crate provides the foundational types shared by the selection and
//! contour crates:
//!
//! - [`SurfaceMesh`] - Vertex positions plus mixed vertex/line/polygon cells
//! - [`Cell`] / [`CellKind`] - A single cell as an ordered list of vertex ids
//! - [`MeshAdjacency`] - Vertex-to-cell and edge-to-cell lookups
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Revisions
//!
//! Every [`SurfaceMesh`] carries a revision stamp drawn from a process-wide
//! counter. Any mutation takes a fresh stamp, so a cached result computed
//! against revision `r` is stale exactly when `mesh.revision() != r`.
//! Two meshes never share a stamp unless one is a clone of the other.
//!
//! # Coordinate System
//!
//! Right-handed, `f64` coordinates, unit-agnostic. Polygon winding is
//! **counter-clockwise (CCW) when viewed from the front**; normals follow the
//! right-hand rule.
//!
//! # Example
//!
//! ```
//! use mesh_types::{Point3, SurfaceMesh};
//!
//! let mesh = SurfaceMesh::from_triangles(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//!     &[[0, 1, 2]],
//! )
//! .unwrap();
//!
//! assert_eq!(mesh.vertex_count(), 3);
//! assert_eq!(mesh.cell_count(), 1);
//! assert!(mesh.cell(0).is_some_and(|c| c.is_triangle()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod adjacency;
mod bounds;
mod cell;
mod error;
mod mesh;
mod triangle;

pub use adjacency::{MeshAdjacency, normalize_edge};
pub use bounds::Aabb;
pub use cell::{Cell, CellIds, CellKind};
pub use error::{MeshError, MeshResult};
pub use mesh::{MeshDetail, SurfaceMesh};
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
