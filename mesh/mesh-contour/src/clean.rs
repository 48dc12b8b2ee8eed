//! Mesh normalization: vertex merging, degenerate demotion, duplicate cell
//! removal and triangulation.

use hashbrown::{HashMap, HashSet};
use mesh_types::{Cell, CellIds, CellKind, Point3, SurfaceMesh};
use tracing::info;

use crate::error::{ContourError, ContourResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for [`clean_mesh`].
///
/// # Example
///
/// ```
/// use mesh_contour::CleanParams;
///
/// // Exact merging, duplicates removed, everything split to simplices.
/// let params = CleanParams::default();
/// assert_eq!(params.tolerance, 0.0);
///
/// // Merge points within 1% of the bounding box diagonal.
/// let params = CleanParams::default().with_tolerance(0.01);
///
/// // Merge points within 0.5 model units, keep cell shapes.
/// let params = CleanParams::default()
///     .with_absolute_tolerance(0.5)
///     .with_triangulate(false);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CleanParams {
    /// Merge distance. Zero merges only bit-identical positions.
    ///
    /// Default: `0.0`
    pub tolerance: f64,

    /// Whether `tolerance` is in model units rather than a fraction of the
    /// bounding box diagonal.
    ///
    /// Default: `false`
    pub tolerance_is_absolute: bool,

    /// Remove cells with the same kind and the same set of vertex ids.
    ///
    /// Default: `true`
    pub remove_duplicate_cells: bool,

    /// Fan-triangulate polygons and split polylines into two-point lines.
    ///
    /// Default: `true`
    pub triangulate: bool,
}

impl Default for CleanParams {
    fn default() -> Self {
        Self {
            tolerance: 0.0,
            tolerance_is_absolute: false,
            remove_duplicate_cells: true,
            triangulate: true,
        }
    }
}

impl CleanParams {
    /// Merge only exact duplicates and leave cells as they are, apart from
    /// degenerate demotion.
    #[must_use]
    pub fn merge_only() -> Self {
        Self {
            remove_duplicate_cells: false,
            triangulate: false,
            ..Self::default()
        }
    }

    /// Set a merge tolerance relative to the bounding box diagonal.
    #[must_use]
    pub const fn with_tolerance(mut self, fraction: f64) -> Self {
        self.tolerance = fraction;
        self.tolerance_is_absolute = false;
        self
    }

    /// Set a merge tolerance in model units.
    #[must_use]
    pub const fn with_absolute_tolerance(mut self, distance: f64) -> Self {
        self.tolerance = distance;
        self.tolerance_is_absolute = true;
        self
    }

    /// Enable or disable duplicate cell removal.
    #[must_use]
    pub const fn with_remove_duplicate_cells(mut self, remove: bool) -> Self {
        self.remove_duplicate_cells = remove;
        self
    }

    /// Enable or disable triangulation.
    #[must_use]
    pub const fn with_triangulate(mut self, triangulate: bool) -> Self {
        self.triangulate = triangulate;
        self
    }

    /// Check the tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`ContourError::InvalidTolerance`] for a negative or
    /// non-finite tolerance.
    pub fn validate(&self) -> ContourResult<()> {
        if self.tolerance >= 0.0 && self.tolerance.is_finite() {
            Ok(())
        } else {
            Err(ContourError::InvalidTolerance(self.tolerance))
        }
    }

    /// Merge distance in model units for `mesh`.
    #[must_use]
    pub fn absolute_tolerance(&self, mesh: &SurfaceMesh) -> f64 {
        if self.tolerance_is_absolute {
            self.tolerance
        } else {
            let bounds = mesh.bounds();
            if bounds.is_empty() {
                0.0
            } else {
                self.tolerance * bounds.diagonal()
            }
        }
    }
}

/// A cleaned mesh and what changed on the way.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    /// The cleaned mesh.
    pub mesh: SurfaceMesh,
    /// Vertices folded into an earlier coincident vertex.
    pub merged_vertices: usize,
    /// Cells demoted to a lower kind after merging collapsed them.
    pub demoted_cells: usize,
    /// Duplicate cells removed.
    pub removed_cells: usize,
    /// Vertices dropped because no cell referenced them.
    pub removed_vertices: usize,
}

impl CleanOutcome {
    /// True if cleaning changed nothing but cell splitting.
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        self.merged_vertices == 0
            && self.demoted_cells == 0
            && self.removed_cells == 0
            && self.removed_vertices == 0
    }
}

/// Normalize a mesh.
///
/// Steps, in order:
/// 1. Merge vertices within the tolerance. The first vertex of a cluster is
///    its representative and keeps its position.
/// 2. Collapse repeated consecutive ids inside each cell (for polygons, the
///    wrap-around too). Polygons left with fewer than three ids become
///    lines, lines left with one id become vertex cells.
/// 3. Triangulate, if enabled.
/// 4. Remove duplicate cells, if enabled. Two cells are duplicates when they
///    have the same kind and the same set of ids, regardless of order.
/// 5. Drop vertices no remaining cell references, renumbering the rest in
///    their original order.
///
/// # Errors
///
/// Returns [`ContourError::InvalidTolerance`] for invalid parameters.
///
/// # Example
///
/// ```
/// use mesh_contour::{CleanParams, clean_mesh};
/// use mesh_types::{Cell, Point3, SurfaceMesh};
///
/// // Two segments whose shared corner was emitted twice.
/// let mesh = SurfaceMesh::from_parts(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(1.0, 1.0, 0.0),
///     ],
///     vec![Cell::line(0, 1), Cell::line(2, 3)],
/// )
/// .unwrap();
///
/// let outcome = clean_mesh(&mesh, &CleanParams::default()).unwrap();
/// assert_eq!(outcome.merged_vertices, 1);
/// assert_eq!(outcome.mesh.vertex_count(), 3);
/// assert_eq!(outcome.mesh.cell(1).unwrap().ids(), &[1, 2]);
/// ```
pub fn clean_mesh(mesh: &SurfaceMesh, params: &CleanParams) -> ContourResult<CleanOutcome> {
    params.validate()?;
    let tolerance = params.absolute_tolerance(mesh);

    let remap = if tolerance > 0.0 {
        merge_within(mesh.positions(), tolerance)
    } else {
        merge_exact(mesh.positions())
    };
    let merged_vertices = remap
        .iter()
        .enumerate()
        .filter(|&(i, &r)| r as usize != i)
        .count();

    let mut demoted_cells = 0usize;
    let mut cells: Vec<Cell> = Vec::with_capacity(mesh.cell_count());
    for cell in mesh.cells() {
        let (collapsed, demoted) = collapse(cell, &remap);
        if demoted {
            demoted_cells += 1;
        }
        if params.triangulate {
            split(collapsed, &mut cells);
        } else {
            cells.push(collapsed);
        }
    }

    let mut removed_cells = 0usize;
    if params.remove_duplicate_cells {
        let mut seen: HashSet<(CellKind, CellIds)> = HashSet::with_capacity(cells.len());
        cells.retain(|cell| {
            let mut key: CellIds = cell.ids().iter().copied().collect();
            key.sort_unstable();
            let fresh = seen.insert((cell.kind(), key));
            if !fresh {
                removed_cells += 1;
            }
            fresh
        });
    }

    let (positions, cells) = compact(mesh.positions(), cells);
    let removed_vertices = mesh.vertex_count() - merged_vertices - positions.len();
    let cleaned = SurfaceMesh::from_parts(positions, cells)?;

    info!(
        vertices = cleaned.vertex_count(),
        cells = cleaned.cell_count(),
        merged_vertices,
        demoted_cells,
        removed_cells,
        removed_vertices,
        tolerance,
        "cleaned mesh"
    );

    Ok(CleanOutcome {
        mesh: cleaned,
        merged_vertices,
        demoted_cells,
        removed_cells,
        removed_vertices,
    })
}

/// Map each vertex to the first vertex with a bit-identical position.
#[allow(clippy::cast_possible_truncation)] // vertex ids are u32 by contract
fn merge_exact(positions: &[Point3<f64>]) -> Vec<u32> {
    let mut first: HashMap<[u64; 3], u32> = HashMap::with_capacity(positions.len());
    positions
        .iter()
        .enumerate()
        .map(|(i, p)| *first.entry(bit_key(p)).or_insert(i as u32))
        .collect()
}

/// Bit pattern of a position, with `-0.0` folded into `0.0`.
fn bit_key(p: &Point3<f64>) -> [u64; 3] {
    [
        (p.x + 0.0).to_bits(),
        (p.y + 0.0).to_bits(),
        (p.z + 0.0).to_bits(),
    ]
}

/// Map each vertex to the earliest representative within `tolerance`.
///
/// Representatives are hashed into cubes of side `tolerance`, so a match can
/// only sit in the surrounding 3x3x3 block. Keys saturate for tolerances far
/// below the coordinate scale; saturated keys still differ by at most one
/// between neighbours, and out-of-range neighbour keys are skipped.
#[allow(clippy::cast_possible_truncation)] // vertex ids are u32 by contract
fn merge_within(positions: &[Point3<f64>], tolerance: f64) -> Vec<u32> {
    let mut buckets: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    let mut remap: Vec<u32> = Vec::with_capacity(positions.len());

    for (i, p) in positions.iter().enumerate() {
        let key = bucket_key(p, tolerance);
        let mut representative: Option<u32> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(neighbor) = neighbor_key(key, (dx, dy, dz)) else {
                        continue;
                    };
                    let Some(candidates) = buckets.get(&neighbor) else {
                        continue;
                    };
                    for &r in candidates {
                        if (positions[r as usize] - p).norm() <= tolerance
                            && representative.is_none_or(|best| r < best)
                        {
                            representative = Some(r);
                        }
                    }
                }
            }
        }
        let id = i as u32;
        match representative {
            Some(r) => remap.push(r),
            None => {
                buckets.entry(key).or_default().push(id);
                remap.push(id);
            }
        }
    }
    remap
}

#[allow(clippy::cast_possible_truncation)] // saturating float to int
fn bucket_key(p: &Point3<f64>, side: f64) -> (i64, i64, i64) {
    (
        (p.x / side).floor() as i64,
        (p.y / side).floor() as i64,
        (p.z / side).floor() as i64,
    )
}

fn neighbor_key(key: (i64, i64, i64), offset: (i64, i64, i64)) -> Option<(i64, i64, i64)> {
    Some((
        key.0.checked_add(offset.0)?,
        key.1.checked_add(offset.1)?,
        key.2.checked_add(offset.2)?,
    ))
}

/// Remap a cell, collapse repeated ids and demote it if it lost its shape.
fn collapse(cell: &Cell, remap: &[u32]) -> (Cell, bool) {
    let mut ids: CellIds = CellIds::with_capacity(cell.len());
    for &v in cell.ids() {
        let r = remap[v as usize];
        if ids.last() != Some(&r) {
            ids.push(r);
        }
    }

    let kind = cell.kind();
    if kind == CellKind::Polygon {
        while ids.len() > 1 && ids.first() == ids.last() {
            ids.pop();
        }
    }

    let demoted_kind = match kind {
        CellKind::Polygon if ids.len() == 2 => CellKind::Line,
        CellKind::Polygon | CellKind::Line if ids.len() == 1 => CellKind::Vertex,
        other => other,
    };
    (Cell::new(demoted_kind, ids), demoted_kind != kind)
}

/// Push a cell split into triangles, two-point lines or single vertices.
fn split(cell: Cell, out: &mut Vec<Cell>) {
    let ids = cell.ids();
    match cell.kind() {
        CellKind::Polygon if ids.len() > 3 => {
            out.extend(cell.fan_triangles().map(Cell::triangle));
        }
        CellKind::Line if ids.len() > 2 => {
            out.extend(ids.windows(2).map(|w| Cell::line(w[0], w[1])));
        }
        CellKind::Vertex if ids.len() > 1 => {
            out.extend(ids.iter().map(|&v| Cell::vertex(v)));
        }
        _ => out.push(cell),
    }
}

/// Keep only referenced vertices, renumbered in ascending original order.
#[allow(clippy::cast_possible_truncation)] // vertex ids are u32 by contract
fn compact(positions: &[Point3<f64>], cells: Vec<Cell>) -> (Vec<Point3<f64>>, Vec<Cell>) {
    let mut used = vec![false; positions.len()];
    for cell in &cells {
        for &v in cell.ids() {
            used[v as usize] = true;
        }
    }

    let mut new_id = vec![u32::MAX; positions.len()];
    let mut kept = Vec::new();
    for (old, p) in positions.iter().enumerate() {
        if used[old] {
            new_id[old] = kept.len() as u32;
            kept.push(*p);
        }
    }

    let cells = cells
        .into_iter()
        .map(|cell| Cell::new(cell.kind(), cell.ids().iter().map(|&v| new_id[v as usize])))
        .collect();
    (kept, cells)
}
