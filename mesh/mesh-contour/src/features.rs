//! Boundary, non-manifold and sharp edge extraction.

use hashbrown::HashMap;
use mesh_types::{Cell, MeshAdjacency, SurfaceMesh, Vector3};
use tracing::debug;

use crate::error::{ContourError, ContourResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which edges [`feature_edges`] reports.
///
/// # Example
///
/// ```
/// use mesh_contour::FeatureEdgeParams;
///
/// let params = FeatureEdgeParams::default();
/// assert!(params.boundary);
/// assert!(!params.non_manifold);
/// assert!(params.feature_angle.is_none());
///
/// let sharp = FeatureEdgeParams::sharp(30.0);
/// assert!(!sharp.boundary);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeatureEdgeParams {
    /// Edges used by exactly one polygon.
    ///
    /// Default: `true`
    pub boundary: bool,

    /// Edges used by more than two polygons.
    ///
    /// Default: `false`
    pub non_manifold: bool,

    /// Edges between two polygons whose normals differ by more than this
    /// many degrees. `None` disables sharp edges.
    ///
    /// Default: `None`
    pub feature_angle: Option<f64>,
}

impl Default for FeatureEdgeParams {
    fn default() -> Self {
        Self {
            boundary: true,
            non_manifold: false,
            feature_angle: None,
        }
    }
}

impl FeatureEdgeParams {
    /// Only edges sharper than `degrees`.
    #[must_use]
    pub const fn sharp(degrees: f64) -> Self {
        Self {
            boundary: false,
            non_manifold: false,
            feature_angle: Some(degrees),
        }
    }

    /// Boundary and non-manifold edges.
    #[must_use]
    pub const fn topological() -> Self {
        Self {
            boundary: true,
            non_manifold: true,
            feature_angle: None,
        }
    }

    /// Enable or disable boundary edges.
    #[must_use]
    pub const fn with_boundary(mut self, boundary: bool) -> Self {
        self.boundary = boundary;
        self
    }

    /// Enable or disable non-manifold edges.
    #[must_use]
    pub const fn with_non_manifold(mut self, non_manifold: bool) -> Self {
        self.non_manifold = non_manifold;
        self
    }

    /// Set the sharp edge threshold in degrees.
    #[must_use]
    pub const fn with_feature_angle(mut self, degrees: f64) -> Self {
        self.feature_angle = Some(degrees);
        self
    }

    /// Check the feature angle.
    ///
    /// # Errors
    ///
    /// Returns [`ContourError::InvalidFeatureAngle`] for an angle outside
    /// `[0, 180]`.
    pub fn validate(&self) -> ContourResult<()> {
        match self.feature_angle {
            Some(a) if !(0.0..=180.0).contains(&a) => Err(ContourError::InvalidFeatureAngle(a)),
            _ => Ok(()),
        }
    }
}

/// Extract the selected edges of `mesh` as two-point line cells.
///
/// Only polygon edges are considered. The output holds the referenced
/// vertices, renumbered in ascending original order, and one line per edge
/// with the smaller id first, in ascending edge order.
///
/// # Errors
///
/// Returns [`ContourError::InvalidFeatureAngle`] for invalid parameters.
///
/// # Example
///
/// ```
/// use mesh_contour::{FeatureEdgeParams, feature_edges};
/// use mesh_types::SurfaceMesh;
///
/// let grid = SurfaceMesh::planar_grid(2, 2, 1.0);
/// let rim = feature_edges(&grid, &FeatureEdgeParams::default()).unwrap();
/// assert_eq!(rim.cell_count(), 8);
/// assert_eq!(rim.vertex_count(), 8);
/// ```
pub fn feature_edges(mesh: &SurfaceMesh, params: &FeatureEdgeParams) -> ContourResult<SurfaceMesh> {
    params.validate()?;
    let adjacency = MeshAdjacency::build(mesh);
    let cos_limit = params.feature_angle.map(|a| a.to_radians().cos());
    let mut normals: HashMap<u32, Option<Vector3<f64>>> = HashMap::new();

    let mut out = SurfaceMesh::new();
    let mut new_ids: HashMap<u32, u32> = HashMap::new();
    let mut selected: Vec<(u32, u32)> = Vec::new();
    let (mut boundary, mut non_manifold, mut sharp) = (0usize, 0usize, 0usize);

    for ((a, b), cells) in adjacency.edges() {
        let keep = match cells {
            [_] => {
                boundary += 1;
                params.boundary
            }
            [c0, c1] => cos_limit.is_some_and(|limit| {
                let n0 = *normals.entry(*c0).or_insert_with(|| polygon_normal(mesh, *c0));
                let n1 = *normals.entry(*c1).or_insert_with(|| polygon_normal(mesh, *c1));
                let is_sharp = matches!((n0, n1), (Some(n0), Some(n1)) if n0.dot(&n1) < limit);
                if is_sharp {
                    sharp += 1;
                }
                is_sharp
            }),
            _ => {
                non_manifold += 1;
                params.non_manifold
            }
        };
        if keep {
            selected.push((a, b));
        }
    }

    // Vertices are numbered in ascending original order.
    let mut used: Vec<u32> = selected.iter().flat_map(|&(a, b)| [a, b]).collect();
    used.sort_unstable();
    used.dedup();
    for v in used {
        if let Some(p) = mesh.position(v) {
            new_ids.insert(v, out.push_vertex(*p));
        }
    }
    for (a, b) in selected {
        if let (Some(&na), Some(&nb)) = (new_ids.get(&a), new_ids.get(&b)) {
            out.push_cell(Cell::line(na, nb))?;
        }
    }

    debug!(
        boundary,
        non_manifold,
        sharp,
        extracted = out.cell_count(),
        "extracted feature edges"
    );
    Ok(out)
}

/// True if no polygon edge of `mesh` is shared by more than two polygons.
#[must_use]
pub fn is_manifold(mesh: &SurfaceMesh) -> bool {
    MeshAdjacency::build(mesh).is_manifold()
}

/// Unit normal of a polygon cell by Newell's method.
fn polygon_normal(mesh: &SurfaceMesh, cell_id: u32) -> Option<Vector3<f64>> {
    mesh.polygon_area_vector(cell_id)?.try_normalize(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::Point3;

    #[test]
    fn closed_cube_has_no_boundary() {
        let cube = SurfaceMesh::unit_cube();
        let rim = feature_edges(&cube, &FeatureEdgeParams::default()).unwrap();
        assert!(rim.is_empty());
        assert!(is_manifold(&cube));
    }

    #[test]
    fn cube_sharp_edges_skip_diagonals() {
        let cube = SurfaceMesh::unit_cube();
        let sharp = feature_edges(&cube, &FeatureEdgeParams::sharp(30.0)).unwrap();
        assert_eq!(sharp.cell_count(), 12);
        assert_eq!(sharp.vertex_count(), 8);
        for cell in sharp.cells() {
            let [a, b] = [cell.ids()[0], cell.ids()[1]];
            let d = sharp.position(a).unwrap() - sharp.position(b).unwrap();
            assert_relative_eq!(d.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn flat_grid_has_no_sharp_edges() {
        let grid = SurfaceMesh::planar_grid(3, 3, 1.0);
        let sharp = feature_edges(&grid, &FeatureEdgeParams::sharp(1.0)).unwrap();
        assert_eq!(sharp.cell_count(), 0);
    }

    #[test]
    fn fin_is_non_manifold() {
        // Three triangles hinged on the edge (0, 1).
        let mesh = SurfaceMesh::from_triangles(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
                Point3::new(0.5, -1.0, 0.0),
                Point3::new(0.5, 0.0, 1.0),
            ],
            &[[0, 1, 2], [1, 0, 3], [0, 1, 4]],
        )
        .unwrap();
        assert!(!is_manifold(&mesh));

        let hinge = feature_edges(&mesh, &FeatureEdgeParams::default().with_boundary(false).with_non_manifold(true))
            .unwrap();
        assert_eq!(hinge.cell_count(), 1);
        assert_eq!(hinge.vertex_count(), 2);

        let all = feature_edges(&mesh, &FeatureEdgeParams::topological()).unwrap();
        assert_eq!(all.cell_count(), 7);
    }

    #[test]
    fn line_cells_are_ignored() {
        let mut mesh = SurfaceMesh::planar_grid(1, 1, 1.0);
        mesh.push_cell(Cell::line(0, 3)).unwrap();
        let rim = feature_edges(&mesh, &FeatureEdgeParams::default()).unwrap();
        assert_eq!(rim.cell_count(), 4);
    }

    #[test]
    fn invalid_feature_angle() {
        let cube = SurfaceMesh::unit_cube();
        for angle in [-1.0, 181.0, f64::NAN] {
            assert!(matches!(
                feature_edges(&cube, &FeatureEdgeParams::sharp(angle)),
                Err(ContourError::InvalidFeatureAngle(_))
            ));
        }
    }
}
