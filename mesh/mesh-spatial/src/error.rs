//! Error types for index construction.

/// Errors raised when building a spatial index.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SpatialError {
    /// An explicit bucket size must be positive and finite.
    #[error("bucket size must be positive and finite, got {0}")]
    InvalidBucketSize(f64),

    /// Buckets must be allowed to hold at least one vertex.
    #[error("points per bucket must be at least 1")]
    InvalidPointsPerBucket,
}

/// Result type for spatial index operations.
pub type SpatialResult<T> = Result<T, SpatialError>;
