//! Area-weighted orientation of a cell subset.

use mesh_types::{SurfaceMesh, Vector3};

/// Area-weighted average orientation of a set of triangles.
///
/// For each triangle cell the cross product of its first two edges is
/// normalized and weighted by the triangle's area; the sum is normalized
/// again. Non-triangle cells and unknown ids are skipped. Returns the zero
/// vector when nothing contributes or the contributions cancel out.
///
/// The sum follows the order of `cells`, so pass a sorted sequence when the
/// result must be bit-for-bit reproducible.
///
/// # Example
///
/// ```
/// use mesh_region::aggregate_normal;
/// use mesh_types::SurfaceMesh;
///
/// let cube = SurfaceMesh::unit_cube();
///
/// // Bottom face points down.
/// let n = aggregate_normal(&cube, [0, 1]);
/// approx::assert_relative_eq!(n.z, -1.0, epsilon = 1e-12);
///
/// // A closed surface cancels out.
/// let all = aggregate_normal(&cube, 0..12);
/// approx::assert_relative_eq!(all.norm(), 0.0, epsilon = 1e-12);
/// ```
#[must_use]
pub fn aggregate_normal(mesh: &SurfaceMesh, cells: impl IntoIterator<Item = u32>) -> Vector3<f64> {
    let mut total = Vector3::zeros();
    for id in cells {
        let Some(tri) = mesh.triangle(id) else {
            continue;
        };
        let cross = tri.cross();
        let area = 0.5 * cross.norm();
        let unit = cross.try_normalize(0.0).unwrap_or(cross);
        total += unit * area;
    }
    total.try_normalize(0.0).unwrap_or(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{Cell, Point3};

    fn unit_triangle() -> SurfaceMesh {
        SurfaceMesh::from_triangles(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            &[[0, 1, 2]],
        )
        .unwrap()
    }

    #[test]
    fn unit_triangle_points_up() {
        let n = aggregate_normal(&unit_triangle(), [0]);
        assert_relative_eq!(n, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn reversed_winding_points_down() {
        let mut mesh = unit_triangle();
        mesh.push_cell(Cell::triangle([0, 2, 1])).unwrap();
        let n = aggregate_normal(&mesh, [1]);
        assert_relative_eq!(n, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn larger_triangles_weigh_more() {
        // Big triangle facing +Z, small triangle facing +X.
        let mesh = SurfaceMesh::from_triangles(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
                Point3::new(0.0, 4.0, 0.0),
                Point3::new(5.0, 0.0, 0.0),
                Point3::new(5.0, 1.0, 0.0),
                Point3::new(5.0, 0.0, 1.0),
            ],
            &[[0, 1, 2], [3, 4, 5]],
        )
        .unwrap();
        let n = aggregate_normal(&mesh, [0, 1]);
        // Weights 8 and 0.5.
        let expected = Vector3::new(0.5, 0.0, 8.0).normalize();
        assert_relative_eq!(n, expected, epsilon = 1e-12);
    }

    #[test]
    fn non_triangles_and_unknown_ids_are_skipped() {
        let mut mesh = unit_triangle();
        mesh.push_cell(Cell::line(0, 1)).unwrap();
        mesh.push_cell(Cell::polygon([0, 1, 2, 0])).unwrap();
        let n = aggregate_normal(&mesh, [0, 1, 2, 99]);
        assert_relative_eq!(n, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
        assert_eq!(aggregate_normal(&mesh, [1, 2]), Vector3::zeros());
    }

    #[test]
    fn degenerate_triangle_contributes_nothing() {
        let mesh = SurfaceMesh::from_triangles(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
            ],
            &[[0, 1, 2]],
        )
        .unwrap();
        assert_eq!(aggregate_normal(&mesh, [0]), Vector3::zeros());
    }
}
