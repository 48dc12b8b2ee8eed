//! Region selection on surface meshes.
//!
//! This crate turns a pick point and a radius into a set of mesh cells and
//! keeps a running selection across repeated picks:
//!
//! - [`cells_fully_within`] / [`RegionGrower`] - Cells whose every vertex
//!   lies inside the pick sphere
//! - [`CellRegion`] - A set of cell ids with submesh extraction
//! - [`SelectionAccumulator`] - Last and cumulative selections with
//!   append, replace and clear
//! - [`aggregate_normal`] - Area-weighted orientation of a cell subset
//! - [`compute_normals`] - Consistent winding with per-cell and per-vertex
//!   normals
//!
//! # Containment Rule
//!
//! A cell is selected only if **all** of its vertices are within the radius.
//! Cells straddling the sphere are left out, so repeated picks paint whole
//! cells without partial overlap.
//!
//! # Example
//!
//! ```
//! use mesh_region::{SelectionAccumulator, SelectionMode};
//! use mesh_types::{Point3, SurfaceMesh};
//!
//! let mesh = SurfaceMesh::planar_grid(10, 10, 1.0);
//! let mut selection = SelectionAccumulator::new();
//!
//! selection.select(&mesh, &Point3::new(2.0, 2.0, 0.0), 1.5, SelectionMode::Append);
//! selection.select(&mesh, &Point3::new(7.0, 7.0, 0.0), 1.5, SelectionMode::Append);
//!
//! assert_eq!(selection.selected_centers(&mesh).len(), 2);
//! let painted = selection.cumulative_selection_mesh(&mesh);
//! assert_eq!(painted.cell_count(), selection.cumulative_region().len());
//!
//! let normal = selection.selection_normal(&mesh);
//! approx::assert_relative_eq!(normal.z, 1.0, epsilon = 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod grow;
mod normal;
mod orient;
mod region;
mod selection;

pub use error::{RegionError, RegionResult};
pub use grow::{RegionGrower, RegionIndex, cells_fully_within};
pub use normal::aggregate_normal;
pub use orient::{MeshNormals, NormalParams, compute_normals};
pub use region::CellRegion;
pub use selection::{SelectionAccumulator, SelectionMode, SelectionRequest, SelectionState};

// Re-export for convenience
pub use mesh_types::{Point3, SurfaceMesh, Vector3};
