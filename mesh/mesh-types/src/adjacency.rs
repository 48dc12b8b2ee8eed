//! Vertex-to-cell and edge-to-cell lookups.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::{CellKind, SurfaceMesh};

/// Adjacency information for a [`SurfaceMesh`].
///
/// - every cell kind contributes to the vertex-to-cell table;
/// - only polygon edges are counted in the edge table, so boundary and
///   non-manifold classification ignore line and vertex cells.
///
/// The tables are built once; rebuild after the mesh changes.
#[derive(Debug, Clone, Default)]
pub struct MeshAdjacency {
    vertex_to_cells: Vec<SmallVec<[u32; 6]>>,
    /// Edge (v0, v1) with v0 < v1 to the polygon cells using it.
    edge_to_cells: HashMap<(u32, u32), SmallVec<[u32; 2]>>,
}

impl MeshAdjacency {
    /// Build adjacency tables for a mesh.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{MeshAdjacency, SurfaceMesh};
    ///
    /// let grid = SurfaceMesh::planar_grid(1, 1, 1.0);
    /// let adj = MeshAdjacency::build(&grid);
    ///
    /// assert_eq!(adj.cells_for_vertex(0), &[0, 1]);
    /// assert_eq!(adj.boundary_edges().len(), 4);
    /// assert!(adj.is_manifold());
    /// ```
    #[must_use]
    pub fn build(mesh: &SurfaceMesh) -> Self {
        let mut vertex_to_cells: Vec<SmallVec<[u32; 6]>> = vec![SmallVec::new(); mesh.vertex_count()];
        let mut edge_to_cells: HashMap<(u32, u32), SmallVec<[u32; 2]>> = HashMap::new();

        for (cell_idx, cell) in mesh.cells().iter().enumerate() {
            let Ok(cell_id) = u32::try_from(cell_idx) else {
                break;
            };
            for &v in cell.ids() {
                let incident = &mut vertex_to_cells[v as usize];
                // Cells that repeat a vertex are listed once.
                if incident.last() != Some(&cell_id) {
                    incident.push(cell_id);
                }
            }
            if cell.kind() == CellKind::Polygon {
                for [a, b] in cell.edges() {
                    if a != b {
                        edge_to_cells.entry(normalize_edge(a, b)).or_default().push(cell_id);
                    }
                }
            }
        }

        Self {
            vertex_to_cells,
            edge_to_cells,
        }
    }

    /// Cells referencing a vertex, in ascending id order.
    ///
    /// Returns an empty slice for unknown or isolated vertices.
    #[must_use]
    pub fn cells_for_vertex(&self, v: u32) -> &[u32] {
        self.vertex_to_cells.get(v as usize).map_or(&[], |c| c.as_slice())
    }

    /// Polygon cells sharing an edge, or an empty slice.
    #[must_use]
    pub fn cells_for_edge(&self, v0: u32, v1: u32) -> &[u32] {
        self.edge_to_cells
            .get(&normalize_edge(v0, v1))
            .map_or(&[], |c| c.as_slice())
    }

    /// Edges used by exactly one polygon, sorted.
    #[must_use]
    pub fn boundary_edges(&self) -> Vec<(u32, u32)> {
        self.edges_where(|n| n == 1)
    }

    /// Edges used by more than two polygons, sorted.
    #[must_use]
    pub fn non_manifold_edges(&self) -> Vec<(u32, u32)> {
        self.edges_where(|n| n > 2)
    }

    /// All polygon edges with their cells, sorted by edge.
    #[must_use]
    pub fn edges(&self) -> Vec<((u32, u32), &[u32])> {
        let mut edges: Vec<_> = self
            .edge_to_cells
            .iter()
            .map(|(&e, cells)| (e, cells.as_slice()))
            .collect();
        edges.sort_unstable_by_key(|&(e, _)| e);
        edges
    }

    /// True if no edge is shared by more than two polygons.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.edge_to_cells.values().all(|cells| cells.len() <= 2)
    }

    /// Number of distinct polygon edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_to_cells.len()
    }

    fn edges_where(&self, keep: impl Fn(usize) -> bool) -> Vec<(u32, u32)> {
        let mut edges: Vec<_> = self
            .edge_to_cells
            .iter()
            .filter(|(_, cells)| keep(cells.len()))
            .map(|(&e, _)| e)
            .collect();
        edges.sort_unstable();
        edges
    }
}

/// Order an undirected edge so the smaller id comes first.
#[inline]
#[must_use]
pub const fn normalize_edge(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}
