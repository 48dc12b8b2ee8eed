//! Error types for region selection.

use mesh_spatial::SpatialError;
use mesh_types::MeshError;
use thiserror::Error;

/// Result type for region operations.
pub type RegionResult<T> = Result<T, RegionError>;

/// Errors reported by request validation, index construction and mesh
/// rebuilding.
///
/// Selection itself never fails: an invalid request is a no-op. These errors
/// exist for callers that want to tell the user why nothing happened.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegionError {
    /// The selection radius must be positive and finite.
    #[error("selection radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    /// The pick point has a NaN or infinite coordinate.
    #[error("pick point has a non-finite coordinate")]
    NonFinitePoint,

    /// The spatial index could not be built.
    #[error(transparent)]
    Index(#[from] SpatialError),

    /// A rebuilt mesh failed validation.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}
