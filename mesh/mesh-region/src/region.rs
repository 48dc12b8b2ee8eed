//! Cell-id regions.
//!
//! A [`CellRegion`] is an unordered set of cell ids belonging to one mesh
//! revision. Regions are cheap to merge and turn into submeshes on demand.

use hashbrown::HashSet;
use mesh_types::{SurfaceMesh, Vector3};

use crate::normal::aggregate_normal;

/// An unordered, duplicate-free set of cell ids.
///
/// # Example
///
/// ```
/// use mesh_region::CellRegion;
///
/// let mut region = CellRegion::from_cells([3, 1, 3]);
/// assert_eq!(region.len(), 2);
///
/// let added = region.union_with(&CellRegion::from_cells([1, 2]));
/// assert_eq!(added, 1);
/// assert_eq!(region.sorted_ids(), vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellRegion {
    cells: HashSet<u32>,
}

impl CellRegion {
    /// Create an empty region.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a region from cell ids, dropping duplicates.
    #[must_use]
    pub fn from_cells(cells: impl IntoIterator<Item = u32>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the region has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if the cell is part of the region.
    #[must_use]
    pub fn contains(&self, cell: u32) -> bool {
        self.cells.contains(&cell)
    }

    /// Add a cell. Returns `false` if it was already present.
    pub fn insert(&mut self, cell: u32) -> bool {
        self.cells.insert(cell)
    }

    /// Add every cell of `other`, returning how many were new.
    pub fn union_with(&mut self, other: &Self) -> usize {
        let before = self.cells.len();
        self.cells.extend(other.cells.iter().copied());
        self.cells.len() - before
    }

    /// True if every cell of `other` is also in `self`.
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        self.cells.is_superset(&other.cells)
    }

    /// Remove every cell.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Iterate over the cell ids in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.iter().copied()
    }

    /// Cell ids in ascending order.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.iter().collect();
        ids.sort_unstable();
        ids
    }

    /// Extract the region's cells, and the vertices they use, as a new mesh.
    #[must_use]
    pub fn to_mesh(&self, mesh: &SurfaceMesh) -> SurfaceMesh {
        mesh.extract_cells(self.sorted_ids())
    }

    /// Area-weighted unit normal of the region's triangles.
    ///
    /// Cells are summed in ascending id order so the result does not depend
    /// on hash iteration order.
    #[must_use]
    pub fn normal(&self, mesh: &SurfaceMesh) -> Vector3<f64> {
        aggregate_normal(mesh, self.sorted_ids())
    }
}

impl FromIterator<u32> for CellRegion {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        Self::from_cells(iter)
    }
}

impl Extend<u32> for CellRegion {
    fn extend<T: IntoIterator<Item = u32>>(&mut self, iter: T) {
        self.cells.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn union_counts_new_cells() {
        let mut a = CellRegion::from_cells([0, 1, 2]);
        let b = CellRegion::from_cells([2, 3]);
        assert_eq!(a.union_with(&b), 1);
        assert!(a.is_superset(&b));
        assert_eq!(a.union_with(&b), 0);
    }

    #[test]
    fn clear_empties() {
        let mut region: CellRegion = (0..5).collect();
        assert_eq!(region.len(), 5);
        region.clear();
        assert!(region.is_empty());
    }

    #[test]
    fn to_mesh_extracts_cells() {
        let cube = SurfaceMesh::unit_cube();
        let region = CellRegion::from_cells([2, 3]);
        let top = region.to_mesh(&cube);
        assert_eq!(top.cell_count(), 2);
        assert_eq!(top.vertex_count(), 4);
        let n = region.normal(&cube);
        assert_relative_eq!(n.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_region_has_empty_mesh() {
        let cube = SurfaceMesh::unit_cube();
        let region = CellRegion::new();
        assert!(region.to_mesh(&cube).is_empty());
        assert_eq!(region.normal(&cube), Vector3::zeros());
    }
}
