//! Consistent polygon orientation with per-cell and per-vertex normals.
//!
//! Polygons are visited component by component, breadth-first across shared
//! edges. A neighbour that walks a shared edge in the same direction as the
//! cell it was reached from is reversed. Edges shared by more than two
//! polygons are traversed like any other.
//!
//! With auto-orientation, every closed component (each edge used by exactly
//! two polygons) is then turned so its signed volume is positive, which
//! makes its normals point outward. Open components keep the orientation of
//! their lowest-id polygon.

use std::collections::VecDeque;

use mesh_types::{Cell, CellKind, MeshAdjacency, Point3, SurfaceMesh, Vector3};
use tracing::debug;

use crate::error::RegionResult;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options for [`compute_normals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NormalParams {
    /// Reverse polygons so neighbours traverse shared edges in opposite
    /// directions.
    pub consistent: bool,
    /// Turn closed components outward.
    pub auto_orient: bool,
}

impl Default for NormalParams {
    fn default() -> Self {
        Self {
            consistent: true,
            auto_orient: true,
        }
    }
}

impl NormalParams {
    /// Normals of the cells exactly as wound.
    #[must_use]
    pub const fn as_wound() -> Self {
        Self {
            consistent: false,
            auto_orient: false,
        }
    }

    /// Set neighbour consistency.
    #[must_use]
    pub const fn with_consistent(mut self, consistent: bool) -> Self {
        self.consistent = consistent;
        self
    }

    /// Set outward orientation of closed components.
    #[must_use]
    pub const fn with_auto_orient(mut self, auto_orient: bool) -> Self {
        self.auto_orient = auto_orient;
        self
    }
}

/// Result of [`compute_normals`].
#[derive(Debug, Clone)]
pub struct MeshNormals {
    /// The input mesh with reversed polygons rewound. Positions and cell ids
    /// are unchanged.
    pub mesh: SurfaceMesh,
    /// Unit normal per cell. Zero for lines, vertex cells and degenerate
    /// polygons.
    pub cell_normals: Vec<Vector3<f64>>,
    /// Area-weighted unit normal per vertex. Zero for vertices on no polygon.
    pub vertex_normals: Vec<Vector3<f64>>,
    /// Number of polygons that were reversed.
    pub flipped_cells: usize,
}

/// Orient the polygons of `mesh` and compute cell and vertex normals.
///
/// # Errors
///
/// Never fails for a mesh built through the checked constructors; the
/// rewound mesh is revalidated and any [`mesh_types::MeshError`] is passed on.
///
/// # Example
///
/// ```
/// use mesh_region::{NormalParams, compute_normals};
/// use mesh_types::{Cell, SurfaceMesh};
///
/// // Turn two faces of the cube inside out.
/// let cube = SurfaceMesh::unit_cube();
/// let cells = cube.cells().iter().enumerate().map(|(i, c)| {
///     if i == 4 || i == 9 {
///         Cell::polygon(c.ids().iter().rev().copied())
///     } else {
///         c.clone()
///     }
/// });
/// let damaged = SurfaceMesh::from_parts(cube.positions().to_vec(), cells.collect()).unwrap();
///
/// let normals = compute_normals(&damaged, &NormalParams::default()).unwrap();
/// assert_eq!(normals.flipped_cells, 2);
/// assert_eq!(normals.mesh, cube);
/// ```
pub fn compute_normals(mesh: &SurfaceMesh, params: &NormalParams) -> RegionResult<MeshNormals> {
    let mut flipped = vec![false; mesh.cell_count()];
    if params.consistent || params.auto_orient {
        let adjacency = MeshAdjacency::build(mesh);
        let mut visited = vec![false; mesh.cell_count()];
        let mut components = 0usize;
        for seed in 0..mesh.cell_count() {
            if visited[seed] || mesh.cells()[seed].kind() != CellKind::Polygon {
                continue;
            }
            let component =
                walk_component(mesh, &adjacency, seed, params, &mut visited, &mut flipped);
            components += 1;
            if params.auto_orient
                && is_closed(mesh, &adjacency, &component)
                && signed_volume(mesh, &component, &flipped) < 0.0
            {
                for &c in &component {
                    flipped[c] = !flipped[c];
                }
            }
        }
        debug!(components, "oriented polygon components");
    }

    let cells: Vec<Cell> = mesh
        .cells()
        .iter()
        .zip(&flipped)
        .map(|(cell, &flip)| {
            if flip {
                Cell::new(cell.kind(), cell.ids().iter().rev().copied())
            } else {
                cell.clone()
            }
        })
        .collect();
    let oriented = SurfaceMesh::from_parts(mesh.positions().to_vec(), cells)?;

    let mut cell_normals = Vec::with_capacity(oriented.cell_count());
    let mut vertex_sums = vec![Vector3::zeros(); oriented.vertex_count()];
    for (id, cell) in (0u32..).zip(oriented.cells()) {
        let area = oriented.polygon_area_vector(id).unwrap_or_else(Vector3::zeros);
        for &v in cell.ids() {
            vertex_sums[v as usize] += area;
        }
        cell_normals.push(area.try_normalize(0.0).unwrap_or_else(Vector3::zeros));
    }
    let vertex_normals = vertex_sums
        .into_iter()
        .map(|n| n.try_normalize(0.0).unwrap_or_else(Vector3::zeros))
        .collect();

    let flipped_cells = flipped.iter().filter(|&&f| f).count();
    debug!(cells = oriented.cell_count(), flipped_cells, "computed mesh normals");

    Ok(MeshNormals {
        mesh: oriented,
        cell_normals,
        vertex_normals,
        flipped_cells,
    })
}

/// Visit the polygons reachable from `seed` and decide which to reverse.
fn walk_component(
    mesh: &SurfaceMesh,
    adjacency: &MeshAdjacency,
    seed: usize,
    params: &NormalParams,
    visited: &mut [bool],
    flipped: &mut [bool],
) -> Vec<usize> {
    let cells = mesh.cells();
    let mut component = Vec::new();
    let mut queue = VecDeque::from([seed]);
    visited[seed] = true;

    while let Some(current) = queue.pop_front() {
        component.push(current);
        for [p, q] in cells[current].edges() {
            let (a, b) = if flipped[current] { (q, p) } else { (p, q) };
            for &next in adjacency.cells_for_edge(a, b) {
                let next = next as usize;
                if visited[next] {
                    continue;
                }
                visited[next] = true;
                flipped[next] = params.consistent && cells[next].edges().any(|e| e == [a, b]);
                queue.push_back(next);
            }
        }
    }
    component
}

/// True if every edge of the component is shared by exactly two polygons.
fn is_closed(mesh: &SurfaceMesh, adjacency: &MeshAdjacency, component: &[usize]) -> bool {
    component.iter().all(|&c| {
        mesh.cells()[c]
            .edges()
            .all(|[a, b]| adjacency.cells_for_edge(a, b).len() == 2)
    })
}

/// Six times the signed volume enclosed by the component as currently wound.
fn signed_volume(mesh: &SurfaceMesh, component: &[usize], flipped: &[bool]) -> f64 {
    let position = |v: u32| mesh.position(v).copied().unwrap_or_else(Point3::origin);
    component
        .iter()
        .map(|&c| {
            let volume: f64 = mesh.cells()[c]
                .fan_triangles()
                .map(|[a, b, d]| {
                    let (pa, pb, pd) = (position(a), position(b), position(d));
                    pa.coords.dot(&pb.coords.cross(&pd.coords))
                })
                .sum();
            if flipped[c] { -volume } else { volume }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rewound(mesh: &SurfaceMesh, reverse: &[usize]) -> SurfaceMesh {
        let cells = mesh
            .cells()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if reverse.contains(&i) {
                    Cell::new(c.kind(), c.ids().iter().rev().copied())
                } else {
                    c.clone()
                }
            })
            .collect();
        SurfaceMesh::from_parts(mesh.positions().to_vec(), cells).unwrap()
    }

    #[test]
    fn cube_normals_point_outward() {
        let cube = SurfaceMesh::unit_cube();
        let normals = compute_normals(&cube, &NormalParams::default()).unwrap();
        assert_eq!(normals.flipped_cells, 0);
        for ((_, tri), n) in cube.triangles().zip(&normals.cell_normals) {
            assert!(tri.centroid().coords.dot(n) > 0.0);
        }
        for (p, n) in cube.positions().iter().zip(&normals.vertex_normals) {
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
            assert!(p.coords.dot(n) > 0.0);
        }
    }

    #[test]
    fn inside_out_cube_is_turned_around() {
        let cube = SurfaceMesh::unit_cube();
        let all: Vec<usize> = (0..12).collect();
        let inverted = rewound(&cube, &all);

        let params = NormalParams::default().with_auto_orient(false);
        let kept = compute_normals(&inverted, &params).unwrap();
        assert_eq!(kept.flipped_cells, 0);
        assert_relative_eq!(kept.cell_normals[0], Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);

        let turned = compute_normals(&inverted, &NormalParams::default()).unwrap();
        assert_eq!(turned.flipped_cells, 12);
        assert_relative_eq!(
            turned.cell_normals[0],
            Vector3::new(0.0, 0.0, -1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn open_grid_follows_lowest_cell() {
        let grid = SurfaceMesh::planar_grid(4, 4, 1.0);
        let damaged = rewound(&grid, &[3, 5, 18]);

        let normals = compute_normals(&damaged, &NormalParams::default()).unwrap();
        assert_eq!(normals.flipped_cells, 3);
        assert_eq!(normals.mesh, grid);
        for n in normals.cell_normals.iter().chain(&normals.vertex_normals) {
            assert_relative_eq!(*n, Vector3::z(), epsilon = 1e-12);
        }
    }

    #[test]
    fn as_wound_reports_raw_normals() {
        let grid = SurfaceMesh::planar_grid(2, 2, 1.0);
        let damaged = rewound(&grid, &[1]);
        let normals = compute_normals(&damaged, &NormalParams::as_wound()).unwrap();
        assert_eq!(normals.flipped_cells, 0);
        assert_relative_eq!(normals.cell_normals[1], -Vector3::z(), epsilon = 1e-12);
        assert_eq!(normals.mesh, damaged);
    }

    #[test]
    fn lines_and_loose_vertices_get_zero() {
        let mut mesh = SurfaceMesh::planar_grid(1, 1, 1.0);
        let loose = mesh.push_vertex(Point3::new(5.0, 5.0, 5.0));
        mesh.push_cell(Cell::line(0, loose)).unwrap();

        let normals = compute_normals(&mesh, &NormalParams::default()).unwrap();
        assert_eq!(normals.cell_normals[2], Vector3::zeros());
        assert_eq!(normals.vertex_normals[loose as usize], Vector3::zeros());
        assert_relative_eq!(normals.vertex_normals[0], Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn empty_mesh_has_no_normals() {
        let normals = compute_normals(&SurfaceMesh::new(), &NormalParams::default()).unwrap();
        assert!(normals.cell_normals.is_empty());
        assert!(normals.vertex_normals.is_empty());
        assert!(normals.mesh.is_empty());
    }
}
