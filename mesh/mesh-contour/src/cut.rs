//! Cutting a mesh with a plane.

use hashbrown::HashMap;
use mesh_types::{Cell, CellKind, Point3, SurfaceMesh, Vector3, normalize_edge};
use smallvec::SmallVec;
use tracing::debug;

use crate::error::{ContourError, ContourResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An oriented plane through `origin` with unit `normal`.
///
/// # Example
///
/// ```
/// use mesh_contour::Plane;
/// use mesh_types::{Point3, Vector3};
///
/// let plane = Plane::new(Point3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 0.0, 5.0)).unwrap();
/// approx::assert_relative_eq!(plane.signed_distance(&Point3::new(1.0, 1.0, 3.0)), 1.0);
/// assert!(Plane::new(Point3::origin(), Vector3::zeros()).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plane {
    origin: Point3<f64>,
    normal: Vector3<f64>,
}

impl Plane {
    /// Create a plane, normalizing `normal`.
    ///
    /// # Errors
    ///
    /// Returns [`ContourError::DegeneratePlane`] for a zero or non-finite normal.
    pub fn new(origin: Point3<f64>, normal: Vector3<f64>) -> ContourResult<Self> {
        if !normal.iter().all(|c| c.is_finite()) {
            return Err(ContourError::DegeneratePlane);
        }
        let normal = normal.try_normalize(0.0).ok_or(ContourError::DegeneratePlane)?;
        Ok(Self { origin, normal })
    }

    /// Horizontal plane at height `z`, facing +Z.
    #[must_use]
    pub fn horizontal(z: f64) -> Self {
        Self {
            origin: Point3::new(0.0, 0.0, z),
            normal: Vector3::z(),
        }
    }

    /// A point on the plane.
    #[must_use]
    pub const fn origin(&self) -> &Point3<f64> {
        &self.origin
    }

    /// Unit normal.
    #[must_use]
    pub const fn normal(&self) -> &Vector3<f64> {
        &self.normal
    }

    /// Signed distance, positive on the normal side.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.origin).dot(&self.normal)
    }
}

/// Where a cut point comes from. Shared sources give shared output vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CutSource {
    /// A mesh vertex lying exactly on the plane.
    Vertex(u32),
    /// A crossing on the undirected edge `(lo, hi)`.
    Edge(u32, u32),
}

/// Cut every polygon cell of `mesh` with `plane`.
///
/// The result is a mesh of two-point line cells, one per polygon crossed by
/// the plane (two per polygon for concave polygons crossed four times).
/// Intersection points are shared between cells along the same mesh edge,
/// so a closed surface yields a connected segment soup.
///
/// Polygons lying entirely in the plane and polygons that only touch it at
/// a single vertex produce nothing. Line and vertex cells are ignored.
///
/// # Errors
///
/// Only fails if the output mesh cannot be assembled.
///
/// # Example
///
/// ```
/// use mesh_contour::{Plane, cut_with_plane};
/// use mesh_types::SurfaceMesh;
///
/// let cube = SurfaceMesh::unit_cube();
/// let section = cut_with_plane(&cube, &Plane::horizontal(0.0)).unwrap();
///
/// // Two triangles per side face, one segment each.
/// assert_eq!(section.cell_count(), 8);
/// assert_eq!(section.vertex_count(), 8);
/// ```
pub fn cut_with_plane(mesh: &SurfaceMesh, plane: &Plane) -> ContourResult<SurfaceMesh> {
    let distances: Vec<f64> = mesh
        .positions()
        .iter()
        .map(|p| plane.signed_distance(p))
        .collect();

    let mut out = SurfaceMesh::new();
    let mut sources: HashMap<CutSource, u32> = HashMap::new();
    let mut coplanar = 0usize;

    for cell in mesh.cells() {
        if cell.kind() != CellKind::Polygon || cell.len() < 3 {
            continue;
        }
        if cell.ids().iter().all(|&v| distances[v as usize] == 0.0) {
            coplanar += 1;
            continue;
        }

        let mut hits: SmallVec<[CutSource; 4]> = SmallVec::new();
        for [a, b] in cell.edges() {
            let (da, db) = (distances[a as usize], distances[b as usize]);
            let source = if da == 0.0 {
                CutSource::Vertex(a)
            } else if da * db < 0.0 {
                let (lo, hi) = normalize_edge(a, b);
                CutSource::Edge(lo, hi)
            } else {
                continue;
            };
            if !hits.contains(&source) {
                hits.push(source);
            }
        }

        for pair in hits.chunks_exact(2) {
            let a = resolve(&mut out, &mut sources, mesh, &distances, pair[0]);
            let b = resolve(&mut out, &mut sources, mesh, &distances, pair[1]);
            out.push_cell(Cell::line(a, b))?;
        }
    }

    debug!(
        segments = out.cell_count(),
        points = out.vertex_count(),
        coplanar,
        "cut mesh with plane"
    );
    Ok(out)
}

/// Output vertex for a cut source, creating it on first use.
fn resolve(
    out: &mut SurfaceMesh,
    sources: &mut HashMap<CutSource, u32>,
    mesh: &SurfaceMesh,
    distances: &[f64],
    source: CutSource,
) -> u32 {
    *sources.entry(source).or_insert_with(|| {
        let point = match source {
            CutSource::Vertex(v) => mesh.positions()[v as usize],
            CutSource::Edge(lo, hi) => {
                let (p_lo, p_hi) = (mesh.positions()[lo as usize], mesh.positions()[hi as usize]);
                let (d_lo, d_hi) = (distances[lo as usize], distances[hi as usize]);
                let t = d_lo / (d_lo - d_hi);
                p_lo + (p_hi - p_lo) * t
            }
        };
        out.push_vertex(point)
    })
}
