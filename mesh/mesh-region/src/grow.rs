//! Region growing by strict radius containment.

use hashbrown::HashSet;
use mesh_spatial::{IndexParams, SpatialIndex, VertexGrid};
use mesh_types::{MeshAdjacency, Point3, SurfaceMesh};
use tracing::debug;

use crate::error::RegionResult;
use crate::region::CellRegion;

/// Finds the cells lying entirely inside a pick sphere.
///
/// The grower borrows a mesh, a spatial index over its vertices and its
/// vertex-to-cell adjacency. All three must describe the same mesh
/// revision; [`RegionIndex::grower`] guarantees that.
///
/// # Example
///
/// ```
/// use mesh_region::RegionIndex;
/// use mesh_types::{Point3, SurfaceMesh};
///
/// let mesh = SurfaceMesh::planar_grid(4, 4, 1.0);
/// let index = RegionIndex::new(&mesh);
/// let grower = index.grower(&mesh).unwrap();
///
/// // The 2x2 block of quads around (1, 1) is 8 triangles.
/// let region = grower.cells_fully_within(&Point3::new(1.0, 1.0, 0.0), 1.5);
/// assert_eq!(region.len(), 8);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RegionGrower<'a, I: SpatialIndex = VertexGrid> {
    mesh: &'a SurfaceMesh,
    index: &'a I,
    adjacency: &'a MeshAdjacency,
}

impl<'a, I: SpatialIndex> RegionGrower<'a, I> {
    /// Create a grower from prebuilt parts.
    #[must_use]
    pub const fn new(mesh: &'a SurfaceMesh, index: &'a I, adjacency: &'a MeshAdjacency) -> Self {
        Self {
            mesh,
            index,
            adjacency,
        }
    }

    /// Every cell whose vertices all lie within `radius` of `point`.
    ///
    /// Returns an empty region for a non-positive or non-finite radius.
    #[must_use]
    pub fn cells_fully_within(&self, point: &Point3<f64>, radius: f64) -> CellRegion {
        let mut region = CellRegion::new();
        if !(radius > 0.0 && radius.is_finite()) {
            return region;
        }

        let inside = self.index.points_within_radius(point, radius);
        let mut visited: HashSet<u32> = HashSet::new();

        for &v in &inside {
            for &cell_id in self.adjacency.cells_for_vertex(v) {
                // A cell shares up to all of its vertices with the sphere.
                if !visited.insert(cell_id) {
                    continue;
                }
                let Some(cell) = self.mesh.cell(cell_id) else {
                    continue;
                };
                if cell.ids().iter().all(|id| inside.contains(id)) {
                    region.insert(cell_id);
                }
            }
        }

        debug!(
            radius,
            vertices = inside.len(),
            examined = visited.len(),
            cells = region.len(),
            "grew region"
        );
        region
    }
}

/// Owned spatial index and adjacency for one mesh revision.
///
/// Build once, then create cheap [`RegionGrower`]s for as many picks as the
/// mesh stays unchanged.
#[derive(Debug, Clone)]
pub struct RegionIndex {
    grid: VertexGrid,
    adjacency: MeshAdjacency,
    revision: u64,
}

impl RegionIndex {
    /// Build with default index parameters.
    #[must_use]
    pub fn new(mesh: &SurfaceMesh) -> Self {
        Self {
            grid: VertexGrid::new(mesh),
            adjacency: MeshAdjacency::build(mesh),
            revision: mesh.revision(),
        }
    }

    /// Build with explicit index parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Index`](crate::RegionError::Index) if the
    /// parameters are invalid.
    pub fn build(mesh: &SurfaceMesh, params: &IndexParams) -> RegionResult<Self> {
        Ok(Self {
            grid: VertexGrid::build(mesh, params)?,
            adjacency: MeshAdjacency::build(mesh),
            revision: mesh.revision(),
        })
    }

    /// Revision of the mesh this index describes.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// True if `mesh` is the revision this index was built from.
    #[must_use]
    pub const fn is_current(&self, mesh: &SurfaceMesh) -> bool {
        self.revision == mesh.revision()
    }

    /// The vertex index.
    #[must_use]
    pub const fn grid(&self) -> &VertexGrid {
        &self.grid
    }

    /// A grower over `mesh`, or `None` if the mesh has changed since the
    /// index was built.
    #[must_use]
    pub fn grower<'a>(&'a self, mesh: &'a SurfaceMesh) -> Option<RegionGrower<'a>> {
        self.is_current(mesh)
            .then(|| RegionGrower::new(mesh, &self.grid, &self.adjacency))
    }
}

/// Every cell of `mesh` whose vertices all lie within `radius` of `point`.
///
/// Builds a fresh index on each call. Use [`RegionIndex`] when picking the
/// same mesh repeatedly.
///
/// # Example
///
/// ```
/// use mesh_region::cells_fully_within;
/// use mesh_types::{Point3, SurfaceMesh};
///
/// let cube = SurfaceMesh::unit_cube();
/// assert_eq!(cells_fully_within(&cube, &Point3::origin(), 1.0).len(), 12);
/// assert!(cells_fully_within(&cube, &Point3::origin(), 0.0).is_empty());
/// assert!(cells_fully_within(&SurfaceMesh::new(), &Point3::origin(), 1.0).is_empty());
/// ```
#[must_use]
pub fn cells_fully_within(mesh: &SurfaceMesh, point: &Point3<f64>, radius: f64) -> CellRegion {
    if !(radius > 0.0 && radius.is_finite()) || mesh.is_empty() {
        return CellRegion::new();
    }
    let index = RegionIndex::new(mesh);
    RegionGrower::new(mesh, &index.grid, &index.adjacency).cells_fully_within(point, radius)
}
