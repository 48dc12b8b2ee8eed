//! Surface mesh with mixed cells and revision stamps.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

use crate::{Aabb, Cell, CellKind, MeshError, MeshResult, Triangle};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// A surface mesh: vertex positions plus vertex, line and polygon cells.
///
/// Vertex and cell ids are `u32` positions in their arrays. They stay valid
/// until the mesh is rebuilt; a mutation that keeps the arrays (such as
/// [`SurfaceMesh::translate`]) still takes a fresh [`revision`](Self::revision).
///
/// Every cell index is checked against the vertex array on insertion, so a
/// `SurfaceMesh` never holds a dangling id. Deserialization goes through the
/// same check.
///
/// # Example
///
/// ```
/// use mesh_types::{Cell, Point3, SurfaceMesh};
///
/// let mut mesh = SurfaceMesh::new();
/// let a = mesh.push_vertex(Point3::new(0.0, 0.0, 0.0));
/// let b = mesh.push_vertex(Point3::new(1.0, 0.0, 0.0));
/// let c = mesh.push_vertex(Point3::new(0.0, 1.0, 0.0));
/// mesh.push_cell(Cell::triangle([a, b, c])).unwrap();
///
/// assert!(mesh.push_cell(Cell::line(a, 9)).is_err());
/// assert_eq!(mesh.cell_count(), 1);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "MeshParts")
)]
pub struct SurfaceMesh {
    positions: Vec<Point3<f64>>,
    cells: Vec<Cell>,
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    revision: u64,
}

/// Serialized form of a [`SurfaceMesh`], validated on the way in.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct MeshParts {
    positions: Vec<Point3<f64>>,
    cells: Vec<Cell>,
}

#[cfg(feature = "serde")]
impl TryFrom<MeshParts> for SurfaceMesh {
    type Error = MeshError;

    fn try_from(parts: MeshParts) -> MeshResult<Self> {
        Self::from_parts(parts.positions, parts.cells)
    }
}

impl SurfaceMesh {
    /// Create an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Create an empty mesh with pre-allocated storage.
    #[must_use]
    pub fn with_capacity(vertex_count: usize, cell_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count),
            cells: Vec::with_capacity(cell_count),
            revision: next_revision(),
        }
    }

    /// Create a mesh from positions and cells, validating every cell.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::EmptyCell`] for a cell with no ids and
    /// [`MeshError::InvalidVertexIndex`] for an id past the vertex array.
    pub fn from_parts(positions: Vec<Point3<f64>>, cells: Vec<Cell>) -> MeshResult<Self> {
        for (i, cell) in cells.iter().enumerate() {
            validate_cell(cell, i, positions.len())?;
        }
        if u32::try_from(cells.len()).is_err() {
            return Err(MeshError::TooManyCells);
        }
        Ok(Self {
            positions,
            cells,
            revision: next_revision(),
        })
    }

    /// Create a triangle mesh from positions and index triples.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidVertexIndex`] if a triple references a
    /// missing vertex.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Point3, SurfaceMesh};
    ///
    /// let mesh = SurfaceMesh::from_triangles(
    ///     vec![
    ///         Point3::new(0.0, 0.0, 0.0),
    ///         Point3::new(1.0, 0.0, 0.0),
    ///         Point3::new(1.0, 1.0, 0.0),
    ///         Point3::new(0.0, 1.0, 0.0),
    ///     ],
    ///     &[[0, 1, 2], [0, 2, 3]],
    /// )
    /// .unwrap();
    /// approx::assert_relative_eq!(mesh.surface_area(), 1.0, epsilon = 1e-12);
    /// ```
    pub fn from_triangles(positions: Vec<Point3<f64>>, triangles: &[[u32; 3]]) -> MeshResult<Self> {
        let cells = triangles.iter().map(|&t| Cell::triangle(t)).collect();
        Self::from_parts(positions, cells)
    }

    /// Append a vertex and return its id.
    #[allow(clippy::cast_possible_truncation)] // vertex ids are u32 by contract
    pub fn push_vertex(&mut self, position: Point3<f64>) -> u32 {
        let id = self.positions.len() as u32;
        self.positions.push(position);
        self.revision = next_revision();
        id
    }

    /// Append a cell and return its id.
    ///
    /// # Errors
    ///
    /// Fails if the cell is empty, references a missing vertex, or the cell
    /// array is full.
    pub fn push_cell(&mut self, cell: Cell) -> MeshResult<u32> {
        validate_cell(&cell, self.cells.len(), self.positions.len())?;
        let id = u32::try_from(self.cells.len()).map_err(|_| MeshError::TooManyCells)?;
        self.cells.push(cell);
        self.revision = next_revision();
        Ok(id)
    }

    /// All vertex positions, indexed by vertex id.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// All cells, indexed by cell id.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of cells.
    #[inline]
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// True if the mesh has no vertices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of a vertex.
    #[must_use]
    pub fn position(&self, id: u32) -> Option<&Point3<f64>> {
        self.positions.get(id as usize)
    }

    /// A cell by id.
    #[must_use]
    pub fn cell(&self, id: u32) -> Option<&Cell> {
        self.cells.get(id as usize)
    }

    /// The triangle for a cell id, if that cell is a triangle.
    #[must_use]
    pub fn triangle(&self, id: u32) -> Option<Triangle> {
        let [a, b, c] = self.cell(id)?.as_triangle()?;
        Some(Triangle::new(
            *self.position(a)?,
            *self.position(b)?,
            *self.position(c)?,
        ))
    }

    /// Iterator over `(cell id, triangle)` for every triangle cell.
    pub fn triangles(&self) -> impl Iterator<Item = (u32, Triangle)> + '_ {
        (0..self.cells.len())
            .filter_map(|i| u32::try_from(i).ok())
            .filter_map(|id| self.triangle(id).map(|t| (id, t)))
    }

    /// Current revision stamp. Any mutation replaces it with a fresh one.
    #[inline]
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Bounding box of all vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter())
    }

    /// Area vector of a polygon cell by Newell's method.
    ///
    /// Points along the right-hand-rule normal, with length equal to the
    /// polygon's area. Also valid for non-planar polygons. `None` for
    /// unknown ids and non-polygon cells.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Cell, Point3, SurfaceMesh, Vector3};
    ///
    /// let quad = SurfaceMesh::from_parts(
    ///     vec![
    ///         Point3::new(0.0, 0.0, 0.0),
    ///         Point3::new(2.0, 0.0, 0.0),
    ///         Point3::new(2.0, 1.0, 0.0),
    ///         Point3::new(0.0, 1.0, 0.0),
    ///     ],
    ///     vec![Cell::polygon([0, 1, 2, 3])],
    /// )
    /// .unwrap();
    /// assert_eq!(quad.polygon_area_vector(0), Some(Vector3::new(0.0, 0.0, 2.0)));
    /// ```
    #[must_use]
    pub fn polygon_area_vector(&self, id: u32) -> Option<Vector3<f64>> {
        let cell = self.cell(id)?;
        if cell.kind() != CellKind::Polygon {
            return None;
        }
        let mut sum = Vector3::zeros();
        for [a, b] in cell.edges() {
            let (p, q) = (self.position(a)?, self.position(b)?);
            sum.x += (p.y - q.y) * (p.z + q.z);
            sum.y += (p.z - q.z) * (p.x + q.x);
            sum.z += (p.x - q.x) * (p.y + q.y);
        }
        Some(sum * 0.5)
    }

    /// Total area of the triangle cells.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|(_, t)| t.area()).sum()
    }

    /// Number of cells of one kind.
    #[must_use]
    pub fn count_kind(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind() == kind).count()
    }

    /// Translate every vertex.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for p in &mut self.positions {
            *p += offset;
        }
        self.revision = next_revision();
    }

    /// Move one vertex. Returns `false` if the id is out of range.
    pub fn set_position(&mut self, id: u32, position: Point3<f64>) -> bool {
        match self.positions.get_mut(id as usize) {
            Some(p) => {
                *p = position;
                self.revision = next_revision();
                true
            }
            None => false,
        }
    }

    /// Build a submesh from a set of cell ids.
    ///
    /// The result holds exactly the listed cells, in ascending id order, and
    /// the vertices they reference, renumbered in order of first reference.
    /// Unknown ids and duplicates are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::SurfaceMesh;
    ///
    /// let cube = SurfaceMesh::unit_cube();
    /// let bottom = cube.extract_cells([1, 0, 0, 999]);
    /// assert_eq!(bottom.cell_count(), 2);
    /// assert_eq!(bottom.vertex_count(), 4);
    /// ```
    #[must_use]
    pub fn extract_cells(&self, ids: impl IntoIterator<Item = u32>) -> Self {
        let mut selected: Vec<u32> = ids
            .into_iter()
            .filter(|&id| (id as usize) < self.cells.len())
            .collect();
        selected.sort_unstable();
        selected.dedup();

        let mut remap: HashMap<u32, u32> = HashMap::new();
        let mut positions = Vec::new();
        let mut cells = Vec::with_capacity(selected.len());

        for id in selected {
            let cell = &self.cells[id as usize];
            let ids = cell.ids().iter().map(|&v| {
                *remap.entry(v).or_insert_with(|| {
                    positions.push(self.positions[v as usize]);
                    #[allow(clippy::cast_possible_truncation)]
                    let new_id = (positions.len() - 1) as u32;
                    new_id
                })
            });
            cells.push(Cell::new(cell.kind(), ids));
        }

        Self {
            positions,
            cells,
            revision: next_revision(),
        }
    }

    /// Rebuild the mesh as triangles only.
    ///
    /// Polygons are fan-triangulated, lines and vertex cells are dropped, and
    /// vertices no triangle references are removed.
    #[must_use]
    pub fn triangles_only(&self) -> Self {
        let fanned = Self {
            positions: self.positions.clone(),
            cells: self
                .cells
                .iter()
                .flat_map(|cell| cell.fan_triangles())
                .map(Cell::triangle)
                .collect(),
            revision: next_revision(),
        };
        let count = u32::try_from(fanned.cells.len()).unwrap_or(u32::MAX);
        fanned.extract_cells(0..count)
    }

    /// Full listing of positions and cells, for debugging small meshes.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::SurfaceMesh;
    ///
    /// let grid = SurfaceMesh::planar_grid(1, 1, 1.0);
    /// let listing = grid.detail().to_string();
    /// assert!(listing.starts_with("4 points\n0: 0, 0, 0\n"));
    /// assert!(listing.ends_with("1: polygon 0 3 2\n"));
    /// ```
    #[must_use]
    pub const fn detail(&self) -> MeshDetail<'_> {
        MeshDetail(self)
    }

    /// Axis-aligned unit cube centered on the origin, 12 outward-facing triangles.
    ///
    /// Cells 0 and 1 form the bottom face (`z = -0.5`).
    #[must_use]
    pub fn unit_cube() -> Self {
        let positions = vec![
            Point3::new(-0.5, -0.5, -0.5),
            Point3::new(0.5, -0.5, -0.5),
            Point3::new(0.5, 0.5, -0.5),
            Point3::new(-0.5, 0.5, -0.5),
            Point3::new(-0.5, -0.5, 0.5),
            Point3::new(0.5, -0.5, 0.5),
            Point3::new(0.5, 0.5, 0.5),
            Point3::new(-0.5, 0.5, 0.5),
        ];
        let faces: [[u32; 3]; 12] = [
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [2, 3, 7],
            [2, 7, 6],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        Self {
            positions,
            cells: faces.iter().map(|&f| Cell::triangle(f)).collect(),
            revision: next_revision(),
        }
    }

    /// Triangulated grid in the XY plane with normals along +Z.
    ///
    /// The grid has `(nx + 1) * (ny + 1)` vertices starting at the origin,
    /// and `2 * nx * ny` triangles. Vertex `(i, j)` has id `j * (nx + 1) + i`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn planar_grid(nx: u32, ny: u32, spacing: f64) -> Self {
        let row = nx + 1;
        let mut positions = Vec::with_capacity((row * (ny + 1)) as usize);
        for j in 0..=ny {
            for i in 0..=nx {
                positions.push(Point3::new(f64::from(i) * spacing, f64::from(j) * spacing, 0.0));
            }
        }
        let mut cells = Vec::with_capacity((2 * nx * ny) as usize);
        for j in 0..ny {
            for i in 0..nx {
                let v00 = j * row + i;
                let v10 = v00 + 1;
                let v01 = v00 + row;
                let v11 = v01 + 1;
                cells.push(Cell::triangle([v00, v10, v11]));
                cells.push(Cell::triangle([v00, v11, v01]));
            }
        }
        Self {
            positions,
            cells,
            revision: next_revision(),
        }
    }
}

impl Default for SurfaceMesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Geometry equality: positions and cells, ignoring revision stamps.
impl PartialEq for SurfaceMesh {
    fn eq(&self, other: &Self) -> bool {
        self.positions == other.positions && self.cells == other.cells
    }
}

/// Line-per-entry listing of a mesh, see [`SurfaceMesh::detail`].
#[derive(Debug, Clone, Copy)]
pub struct MeshDetail<'a>(&'a SurfaceMesh);

impl fmt::Display for MeshDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mesh = self.0;
        writeln!(f, "{} points", mesh.vertex_count())?;
        for (i, p) in mesh.positions.iter().enumerate() {
            writeln!(f, "{i}: {}, {}, {}", p.x, p.y, p.z)?;
        }
        writeln!(f, "{} cells", mesh.cell_count())?;
        for (i, cell) in mesh.cells.iter().enumerate() {
            write!(f, "{i}: {}", cell.kind().name())?;
            for v in cell.ids() {
                write!(f, " {v}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for SurfaceMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vertices, {} cells ({} polygons, {} lines, {} vertex cells)",
            self.vertex_count(),
            self.cell_count(),
            self.count_kind(CellKind::Polygon),
            self.count_kind(CellKind::Line),
            self.count_kind(CellKind::Vertex),
        )
    }
}

fn validate_cell(cell: &Cell, position: usize, vertex_count: usize) -> MeshResult<()> {
    if cell.is_empty() {
        return Err(MeshError::EmptyCell { cell: position });
    }
    match cell.ids().iter().find(|&&v| v as usize >= vertex_count) {
        Some(&index) => Err(MeshError::InvalidVertexIndex {
            index,
            vertex_count,
        }),
        None => Ok(()),
    }
}
