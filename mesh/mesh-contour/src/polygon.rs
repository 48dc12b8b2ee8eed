//! From edge meshes to ordered polygons and back.

use mesh_types::{Cell, CellKind, Point3, SurfaceMesh};

use crate::clean::{CleanParams, clean_mesh};
use crate::cut::{Plane, cut_with_plane};
use crate::error::ContourResult;
use crate::loop_order::{ContourLoop, order_loop};

/// Segments of every line cell, polylines split into consecutive pairs.
#[must_use]
pub fn line_segments(mesh: &SurfaceMesh) -> Vec<[u32; 2]> {
    mesh.cells()
        .iter()
        .filter(|cell| cell.kind() == CellKind::Line)
        .flat_map(|cell| cell.edges())
        .collect()
}

/// A cleaned edge mesh and the loop ordered from it.
///
/// The loop's ids refer to `mesh`, not to the mesh that was passed in.
#[derive(Debug, Clone)]
pub struct LoopExtraction {
    /// The cleaned edge mesh.
    pub mesh: SurfaceMesh,
    /// The ordered loop over `mesh`'s vertices.
    pub contour: ContourLoop,
}

impl LoopExtraction {
    /// Loop positions in order.
    #[must_use]
    pub fn points(&self) -> Vec<Point3<f64>> {
        self.contour.points(&self.mesh)
    }

    /// True if the loop closed and visited every vertex of the cleaned mesh.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.contour.is_closed() && self.contour.len() == self.mesh.vertex_count()
    }
}

/// Clean an edge mesh, then order its segments into a loop.
///
/// Cleaning merges coincident endpoints so that segments produced
/// independently (one per cut polygon, say) share vertex ids.
///
/// # Errors
///
/// Returns an error if `params` is invalid.
pub fn extract_loop(edge_mesh: &SurfaceMesh, params: &CleanParams) -> ContourResult<LoopExtraction> {
    let cleaned = clean_mesh(edge_mesh, params)?.mesh;
    let contour = order_loop(line_segments(&cleaned));
    Ok(LoopExtraction {
        mesh: cleaned,
        contour,
    })
}

/// Ordered loop positions of an edge mesh.
///
/// # Errors
///
/// Returns an error if `params` is invalid.
pub fn polygon_points(edge_mesh: &SurfaceMesh, params: &CleanParams) -> ContourResult<Vec<Point3<f64>>> {
    Ok(extract_loop(edge_mesh, params)?.points())
}

/// The ordered outline where `plane` cuts `mesh`.
///
/// # Errors
///
/// Returns an error if `params` is invalid.
///
/// # Example
///
/// ```
/// use mesh_contour::{CleanParams, Plane, intersection_polygon};
/// use mesh_types::SurfaceMesh;
///
/// let cube = SurfaceMesh::unit_cube();
/// let outline = intersection_polygon(&cube, &Plane::horizontal(0.0), &CleanParams::default()).unwrap();
/// assert_eq!(outline.len(), 8);
/// for p in &outline {
///     approx::assert_relative_eq!(p.z, 0.0, epsilon = 1e-12);
/// }
/// ```
pub fn intersection_polygon(
    mesh: &SurfaceMesh,
    plane: &Plane,
    params: &CleanParams,
) -> ContourResult<Vec<Point3<f64>>> {
    let section = cut_with_plane(mesh, plane)?;
    polygon_points(&section, params)
}

/// A mesh holding `points` joined by one polyline cell.
///
/// A closed polyline repeats its first id at the end. A single point gives a
/// vertex cell and no points give an empty mesh.
///
/// # Errors
///
/// Fails only if the point count does not fit vertex ids.
///
/// # Example
///
/// ```
/// use mesh_contour::polyline_mesh;
/// use mesh_types::Point3;
///
/// let square = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = polyline_mesh(&square, true).unwrap();
/// assert_eq!(mesh.vertex_count(), 4);
/// assert_eq!(mesh.cell(0).unwrap().ids(), &[0, 1, 2, 3, 0]);
/// ```
pub fn polyline_mesh(points: &[Point3<f64>], closed: bool) -> ContourResult<SurfaceMesh> {
    let mut mesh = SurfaceMesh::with_capacity(points.len(), 1);
    let ids: Vec<u32> = points.iter().map(|p| mesh.push_vertex(*p)).collect();
    match ids.as_slice() {
        [] => {}
        [only] => {
            mesh.push_cell(Cell::vertex(*only))?;
        }
        [first, ..] => {
            let tail = closed.then_some(*first);
            mesh.push_cell(Cell::polyline(ids.iter().copied().chain(tail)))?;
        }
    }
    Ok(mesh)
}
