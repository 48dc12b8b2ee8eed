//! Contours on surface meshes: plane cuts, cleaning and loop ordering.
//!
//! The pieces compose into a cross-section pipeline:
//!
//! 1. [`cut_with_plane`] turns every polygon crossed by a [`Plane`] into a
//!    line segment.
//! 2. [`clean_mesh`] merges coincident points, demotes collapsed cells and
//!    drops duplicates.
//! 3. [`order_loop`] walks the unordered segments into a [`ContourLoop`].
//!
//! [`intersection_polygon`] runs all three. [`feature_edges`] is the other
//! common source of edge meshes: boundaries, non-manifold hinges and sharp
//! creases.
//!
//! # Loop Ordering
//!
//! Segments may arrive in any order with either endpoint first. The walk
//! starts at the smallest vertex id and never turns back along the segment
//! it arrived on, so the result is the input cycle up to rotation and
//! direction. Malformed input (branches, gaps, several cycles) yields a
//! partial loop with [`ContourLoop::is_closed`] false rather than an error;
//! use [`ContourLoop::into_closed`] to insist on a complete loop.
//!
//! # Example
//!
//! ```
//! use mesh_contour::{CleanParams, Plane, cut_with_plane, extract_loop};
//! use mesh_types::SurfaceMesh;
//!
//! let cube = SurfaceMesh::unit_cube();
//! let section = cut_with_plane(&cube, &Plane::horizontal(0.25)).unwrap();
//! let extraction = extract_loop(&section, &CleanParams::default()).unwrap();
//!
//! assert!(extraction.is_complete());
//! assert_eq!(extraction.points().len(), 8);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod clean;
mod cut;
mod error;
mod features;
mod loop_order;
mod polygon;

pub use clean::{CleanOutcome, CleanParams, clean_mesh};
pub use cut::{Plane, cut_with_plane};
pub use error::{ContourError, ContourResult};
pub use features::{FeatureEdgeParams, feature_edges, is_manifold};
pub use loop_order::{ContourLoop, EdgeGraph, order_loop};
pub use polygon::{LoopExtraction, extract_loop, intersection_polygon, line_segments, polygon_points, polyline_mesh};
