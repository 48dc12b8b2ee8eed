//! Hashed uniform grid over mesh vertices.

use hashbrown::{HashMap, HashSet};
use mesh_types::{Aabb, SurfaceMesh};
use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;
use tracing::debug;

use crate::bucket::{BucketCoord, BucketRange};
use crate::error::SpatialResult;
use crate::params::IndexParams;
use crate::{SpatialIndex, is_finite_point, is_valid_query, nearer};

/// Smallest bucket edge as a fraction of the longest bounds edge.
const MIN_BUCKET_FRACTION: f64 = 1e-6;

/// Spatial index bucketing vertices into a hashed uniform grid.
///
/// Only occupied buckets are stored. Construction is a single pass over the
/// vertices; radius queries visit the buckets overlapping the query cube and
/// nearest queries scan rings of buckets outward from the query point.
///
/// Flat and degenerate meshes are fine: the bucket size is derived from the
/// non-degenerate extents only.
///
/// # Example
///
/// ```
/// use mesh_spatial::{IndexParams, SpatialIndex, VertexGrid};
/// use mesh_types::{Point3, SurfaceMesh};
///
/// let cube = SurfaceMesh::unit_cube();
/// let index = VertexGrid::build(&cube, &IndexParams::default().with_bucket_size(0.25)).unwrap();
///
/// let corner = Point3::new(0.5, 0.5, 0.5);
/// assert_eq!(index.closest_point(&corner), Some(6));
/// assert_eq!(index.points_within_radius(&corner, 1.0).len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct VertexGrid {
    positions: Vec<Point3<f64>>,
    origin: Point3<f64>,
    bucket_size: f64,
    inv_bucket_size: f64,
    buckets: HashMap<BucketCoord, SmallVec<[u32; 4]>>,
    /// Range covering every occupied bucket; `None` when nothing is indexed.
    extent: Option<BucketRange>,
    revision: u64,
}

impl VertexGrid {
    /// Build an index with default parameters.
    #[must_use]
    pub fn new(mesh: &SurfaceMesh) -> Self {
        Self::build_valid(mesh, &IndexParams::default())
    }

    /// Build an index with explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `params` fail [`IndexParams::validate`].
    pub fn build(mesh: &SurfaceMesh, params: &IndexParams) -> SpatialResult<Self> {
        params.validate()?;
        Ok(Self::build_valid(mesh, params))
    }

    fn build_valid(mesh: &SurfaceMesh, params: &IndexParams) -> Self {
        let positions = mesh.positions().to_vec();
        let finite: Vec<(u32, Point3<f64>)> = positions
            .iter()
            .enumerate()
            .filter(|(_, p)| is_finite_point(p))
            .filter_map(|(i, p)| u32::try_from(i).ok().map(|id| (id, *p)))
            .collect();
        let bounds = Aabb::from_points(finite.iter().map(|(_, p)| p));

        let bucket_size = params
            .bucket_size
            .unwrap_or_else(|| auto_bucket_size(&bounds, finite.len(), params.points_per_bucket));
        let origin = if bounds.is_empty() {
            Point3::origin()
        } else {
            bounds.min
        };

        let mut grid = Self {
            positions,
            origin,
            bucket_size,
            inv_bucket_size: 1.0 / bucket_size,
            buckets: HashMap::new(),
            extent: None,
            revision: mesh.revision(),
        };

        for (id, p) in &finite {
            let coord = grid.bucket_of(p);
            grid.buckets.entry(coord).or_default().push(*id);
            grid.extent = Some(match grid.extent {
                Some(mut extent) => {
                    extent.include(coord);
                    extent
                }
                None => BucketRange::single(coord),
            });
        }

        debug!(
            vertices = finite.len(),
            buckets = grid.buckets.len(),
            bucket_size,
            "built vertex grid"
        );
        grid
    }

    /// Edge length of one bucket.
    #[must_use]
    pub const fn bucket_size(&self) -> f64 {
        self.bucket_size
    }

    /// Number of occupied buckets.
    #[must_use]
    pub fn occupied_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Bucket containing a world-space point.
    #[must_use]
    pub fn bucket_of(&self, point: &Point3<f64>) -> BucketCoord {
        BucketCoord::containing(point, &self.origin, self.inv_bucket_size)
    }

    fn collect_within(
        &self,
        ids: &[u32],
        point: &Point3<f64>,
        radius: f64,
        found: &mut HashSet<u32>,
    ) {
        for &id in ids {
            if (self.positions[id as usize] - point).norm() <= radius {
                found.insert(id);
            }
        }
    }

    /// Visit every occupied bucket at Chebyshev distance exactly `k` from `center`.
    fn scan_ring(
        &self,
        center: BucketCoord,
        k: i64,
        extent: &BucketRange,
        point: &Point3<f64>,
        best: &mut Option<(f64, u32)>,
    ) {
        let (cx, cy, cz) = (i64::from(center.x), i64::from(center.y), i64::from(center.z));
        let lo = |c: i64, min: i32| (c - k).max(i64::from(min));
        let hi = |c: i64, max: i32| (c + k).min(i64::from(max));
        let z_lo = i64::from(extent.min.z);
        let z_hi = i64::from(extent.max.z);

        let mut visit = |x: i64, y: i64, z: i64| {
            let (Ok(x), Ok(y), Ok(z)) = (i32::try_from(x), i32::try_from(y), i32::try_from(z))
            else {
                return;
            };
            if let Some(ids) = self.buckets.get(&BucketCoord::new(x, y, z)) {
                for &id in ids {
                    let d = (self.positions[id as usize] - point).norm();
                    *best = nearer(*best, (d, id));
                }
            }
        };

        for x in lo(cx, extent.min.x)..=hi(cx, extent.max.x) {
            for y in lo(cy, extent.min.y)..=hi(cy, extent.max.y) {
                if (x - cx).abs() == k || (y - cy).abs() == k {
                    for z in lo(cz, extent.min.z)..=hi(cz, extent.max.z) {
                        visit(x, y, z);
                    }
                } else {
                    // Interior column: only the two shell caps lie on the ring.
                    for z in [cz - k, cz + k] {
                        if (z_lo..=z_hi).contains(&z) {
                            visit(x, y, z);
                        }
                    }
                }
            }
        }
    }
}

impl SpatialIndex for VertexGrid {
    fn points_within_radius(&self, point: &Point3<f64>, radius: f64) -> HashSet<u32> {
        let mut found = HashSet::new();
        if !is_valid_query(point, radius) {
            return found;
        }
        let Some(extent) = self.extent else {
            return found;
        };

        // One bucket of padding absorbs rounding at bucket boundaries.
        let reach = Vector3::repeat(radius + self.bucket_size);
        let query = BucketRange::new(self.bucket_of(&(point - reach)), self.bucket_of(&(point + reach)));
        let Some(range) = query.intersect(&extent) else {
            return found;
        };

        if range.count() > self.buckets.len() as u64 {
            for ids in self.buckets.values() {
                self.collect_within(ids, point, radius, &mut found);
            }
        } else {
            for x in range.min.x..=range.max.x {
                for y in range.min.y..=range.max.y {
                    for z in range.min.z..=range.max.z {
                        if let Some(ids) = self.buckets.get(&BucketCoord::new(x, y, z)) {
                            self.collect_within(ids, point, radius, &mut found);
                        }
                    }
                }
            }
        }
        found
    }

    #[allow(clippy::cast_precision_loss)]
    fn closest_point(&self, point: &Point3<f64>) -> Option<u32> {
        if !is_finite_point(point) {
            return None;
        }
        let extent = self.extent?;
        let center = self.bucket_of(point);

        let mut best = None;
        for k in extent.distance_to(center)..=extent.reach_from(center) {
            self.scan_ring(center, k, &extent, point, &mut best);
            // Anything in ring k + 1 or beyond is at least (k - 1) buckets away,
            // allowing one bucket for rounding in `bucket_of`.
            if let Some((d, _)) = best {
                if d <= (k - 1) as f64 * self.bucket_size {
                    break;
                }
            }
        }
        best.map(|(_, id)| id)
    }

    fn len(&self) -> usize {
        self.positions.len()
    }

    fn source_revision(&self) -> u64 {
        self.revision
    }
}

/// Bucket edge so that occupied buckets hold about `per_bucket` vertices.
///
/// Degenerate axes (flat or linear meshes) are left out of the volume.
#[allow(clippy::cast_precision_loss)]
fn auto_bucket_size(bounds: &Aabb, count: usize, per_bucket: usize) -> f64 {
    let size = bounds.size();
    let longest = size.max();
    if !(longest > 0.0 && longest.is_finite()) {
        return 1.0;
    }
    let floor = longest * MIN_BUCKET_FRACTION;
    let active: SmallVec<[f64; 3]> = size.iter().copied().filter(|&e| e > floor).collect();
    let target = (count as f64 / per_bucket.max(1) as f64).max(1.0);
    let volume: f64 = active.iter().product();
    (volume / target).powf(1.0 / active.len() as f64).max(floor)
}
