//! Integer bucket coordinates and ranges.

use nalgebra::Point3;

/// A discrete bucket coordinate.
///
/// `i32` coordinates allow buckets on both sides of the grid origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BucketCoord {
    /// X index.
    pub x: i32,
    /// Y index.
    pub y: i32,
    /// Z index.
    pub z: i32,
}

impl BucketCoord {
    /// Create a bucket coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Bucket containing `point` for a grid anchored at `origin`.
    ///
    /// Coordinates beyond the `i32` range saturate.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // saturating float-to-int cast
    pub fn containing(point: &Point3<f64>, origin: &Point3<f64>, inv_size: f64) -> Self {
        let rel = (point - origin) * inv_size;
        Self::new(
            rel.x.floor() as i32,
            rel.y.floor() as i32,
            rel.z.floor() as i32,
        )
    }

    /// Chebyshev (L-infinity) distance in buckets.
    #[must_use]
    pub fn chebyshev(self, other: Self) -> i64 {
        let dx = (i64::from(self.x) - i64::from(other.x)).abs();
        let dy = (i64::from(self.y) - i64::from(other.y)).abs();
        let dz = (i64::from(self.z) - i64::from(other.z)).abs();
        dx.max(dy).max(dz)
    }
}

/// Inclusive box of bucket coordinates.
///
/// # Example
///
/// ```
/// use mesh_spatial::{BucketCoord, BucketRange};
///
/// let range = BucketRange::new(BucketCoord::new(0, 0, 0), BucketCoord::new(3, 1, 0));
/// assert_eq!(range.count(), 8);
/// assert_eq!(range.distance_to(BucketCoord::new(5, 0, 0)), 2);
/// assert_eq!(range.distance_to(BucketCoord::new(1, 1, 0)), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketRange {
    /// Minimum corner, inclusive.
    pub min: BucketCoord,
    /// Maximum corner, inclusive.
    pub max: BucketCoord,
}

impl BucketRange {
    /// Create a range, ordering each axis.
    #[must_use]
    pub fn new(a: BucketCoord, b: BucketCoord) -> Self {
        Self {
            min: BucketCoord::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BucketCoord::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// A range holding one bucket.
    #[must_use]
    pub const fn single(coord: BucketCoord) -> Self {
        Self {
            min: coord,
            max: coord,
        }
    }

    /// Grow the range to include `coord`.
    pub fn include(&mut self, coord: BucketCoord) {
        *self = Self::new(
            BucketCoord::new(
                self.min.x.min(coord.x),
                self.min.y.min(coord.y),
                self.min.z.min(coord.z),
            ),
            BucketCoord::new(
                self.max.x.max(coord.x),
                self.max.y.max(coord.y),
                self.max.z.max(coord.z),
            ),
        );
    }

    /// Overlap of two ranges, or `None` if they are disjoint.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let min = BucketCoord::new(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.min.z.max(other.min.z),
        );
        let max = BucketCoord::new(
            self.max.x.min(other.max.x),
            self.max.y.min(other.max.y),
            self.max.z.min(other.max.z),
        );
        (min.x <= max.x && min.y <= max.y && min.z <= max.z).then_some(Self { min, max })
    }

    /// Number of buckets in the range, saturating.
    #[must_use]
    pub fn count(&self) -> u64 {
        let span = |lo: i32, hi: i32| u64::from(hi.abs_diff(lo)).saturating_add(1);
        span(self.min.x, self.max.x)
            .saturating_mul(span(self.min.y, self.max.y))
            .saturating_mul(span(self.min.z, self.max.z))
    }

    /// True if `coord` is inside the range.
    #[must_use]
    pub const fn contains(&self, coord: BucketCoord) -> bool {
        coord.x >= self.min.x
            && coord.x <= self.max.x
            && coord.y >= self.min.y
            && coord.y <= self.max.y
            && coord.z >= self.min.z
            && coord.z <= self.max.z
    }

    /// Chebyshev distance from `coord` to the nearest bucket in the range.
    #[must_use]
    pub fn distance_to(&self, coord: BucketCoord) -> i64 {
        let axis = |c: i32, lo: i32, hi: i32| {
            let (c, lo, hi) = (i64::from(c), i64::from(lo), i64::from(hi));
            (lo - c).max(c - hi).max(0)
        };
        axis(coord.x, self.min.x, self.max.x)
            .max(axis(coord.y, self.min.y, self.max.y))
            .max(axis(coord.z, self.min.z, self.max.z))
    }

    /// Chebyshev distance from `coord` to the farthest corner of the range.
    #[must_use]
    pub fn reach_from(&self, coord: BucketCoord) -> i64 {
        let axis = |c: i32, lo: i32, hi: i32| {
            let (c, lo, hi) = (i64::from(c), i64::from(lo), i64::from(hi));
            (c - lo).abs().max((hi - c).abs())
        };
        axis(coord.x, self.min.x, self.max.x)
            .max(axis(coord.y, self.min.y, self.max.y))
            .max(axis(coord.z, self.min.z, self.max.z))
    }
}
