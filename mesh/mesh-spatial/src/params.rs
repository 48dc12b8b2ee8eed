//! Index construction parameters.

use crate::error::{SpatialError, SpatialResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters for building a [`VertexGrid`](crate::VertexGrid).
///
/// By default the bucket size is derived from the mesh bounds so that an
/// average occupied bucket holds about `points_per_bucket` vertices.
///
/// # Example
///
/// ```
/// use mesh_spatial::IndexParams;
///
/// let params = IndexParams::default();
/// assert_eq!(params.points_per_bucket, 2);
///
/// let coarse = IndexParams::default().with_bucket_size(5.0);
/// assert!(coarse.validate().is_ok());
/// assert!(IndexParams::default().with_bucket_size(0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexParams {
    /// Target number of vertices per occupied bucket.
    pub points_per_bucket: usize,

    /// Fixed bucket edge length. Overrides `points_per_bucket` when set.
    pub bucket_size: Option<f64>,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            points_per_bucket: 2,
            bucket_size: None,
        }
    }
}

impl IndexParams {
    /// Larger buckets for meshes that are queried with big radii.
    #[must_use]
    pub fn coarse() -> Self {
        Self {
            points_per_bucket: 16,
            ..Self::default()
        }
    }

    /// Set the target number of vertices per bucket.
    #[must_use]
    pub const fn with_points_per_bucket(mut self, n: usize) -> Self {
        self.points_per_bucket = n;
        self
    }

    /// Use a fixed bucket edge length.
    #[must_use]
    pub const fn with_bucket_size(mut self, size: f64) -> Self {
        self.bucket_size = Some(size);
        self
    }

    /// Check the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidBucketSize`] for a non-positive or
    /// non-finite bucket size and [`SpatialError::InvalidPointsPerBucket`]
    /// when `points_per_bucket` is zero.
    pub fn validate(&self) -> SpatialResult<()> {
        if let Some(size) = self.bucket_size {
            if !(size > 0.0 && size.is_finite()) {
                return Err(SpatialError::InvalidBucketSize(size));
            }
        }
        if self.points_per_bucket == 0 {
            return Err(SpatialError::InvalidPointsPerBucket);
        }
        Ok(())
    }
}
