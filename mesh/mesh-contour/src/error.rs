//! Error types for contour extraction.

use mesh_types::MeshError;
use thiserror::Error;

/// Result type for contour operations.
pub type ContourResult<T> = Result<T, ContourError>;

/// Errors that can occur while cutting, cleaning or ordering contours.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContourError {
    /// The segments did not close into a single loop.
    #[error("contour is open: walked {visited} of {vertices} vertices")]
    OpenLoop {
        /// Vertices visited before the walk stopped.
        visited: usize,
        /// Distinct vertices referenced by the segments.
        vertices: usize,
    },

    /// A cutting plane needs a non-zero, finite normal.
    #[error("plane normal must be non-zero and finite")]
    DegeneratePlane,

    /// Merge tolerance must be non-negative and finite.
    #[error("merge tolerance must be non-negative and finite, got {0}")]
    InvalidTolerance(f64),

    /// Feature angle must lie in [0, 180] degrees.
    #[error("feature angle must be between 0 and 180 degrees, got {0}")]
    InvalidFeatureAngle(f64),

    /// Building an output mesh failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}
