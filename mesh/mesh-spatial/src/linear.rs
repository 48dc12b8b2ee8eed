//! Brute-force reference index.

use hashbrown::HashSet;
use mesh_types::SurfaceMesh;
use nalgebra::Point3;

use crate::{SpatialIndex, is_finite_point, is_valid_query, nearer};

/// Spatial index that scans every vertex.
///
/// Linear in the vertex count per query. Useful as a reference for
/// [`VertexGrid`](crate::VertexGrid) and for meshes with a handful of vertices.
#[derive(Debug, Clone)]
pub struct LinearScan {
    positions: Vec<Point3<f64>>,
    revision: u64,
}

impl LinearScan {
    /// Snapshot the vertices of a mesh.
    #[must_use]
    pub fn new(mesh: &SurfaceMesh) -> Self {
        Self {
            positions: mesh.positions().to_vec(),
            revision: mesh.revision(),
        }
    }

    fn enumerate(&self) -> impl Iterator<Item = (u32, &Point3<f64>)> {
        self.positions
            .iter()
            .enumerate()
            .filter_map(|(i, p)| u32::try_from(i).ok().map(|id| (id, p)))
    }
}

impl SpatialIndex for LinearScan {
    fn points_within_radius(&self, point: &Point3<f64>, radius: f64) -> HashSet<u32> {
        if !is_valid_query(point, radius) {
            return HashSet::new();
        }
        self.enumerate()
            .filter(|(_, p)| (*p - point).norm() <= radius)
            .map(|(id, _)| id)
            .collect()
    }

    fn closest_point(&self, point: &Point3<f64>) -> Option<u32> {
        if !is_finite_point(point) {
            return None;
        }
        self.enumerate()
            .filter(|(_, p)| is_finite_point(p))
            .fold(None, |best, (id, p)| nearer(best, ((p - point).norm(), id)))
            .map(|(_, id)| id)
    }

    fn len(&self) -> usize {
        self.positions.len()
    }

    fn source_revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_all_vertices() {
        let cube = SurfaceMesh::unit_cube();
        let index = LinearScan::new(&cube);
        assert_eq!(index.len(), 8);
        assert_eq!(index.points_within_radius(&Point3::origin(), 0.9).len(), 8);
        assert!(index.points_within_radius(&Point3::origin(), 0.8).is_empty());
        assert_eq!(index.closest_point(&Point3::new(-0.4, 0.6, 0.4)), Some(7));
    }

    #[test]
    fn empty_index() {
        let index = LinearScan::new(&SurfaceMesh::new());
        assert!(index.is_empty());
        assert_eq!(index.closest_point(&Point3::origin()), None);
    }
}
