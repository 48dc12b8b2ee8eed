//! Mesh cells: vertices, lines/polylines and polygons.

use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inline storage for the vertex ids of one cell.
///
/// Triangles and segments fit without a heap allocation.
pub type CellIds = SmallVec<[u32; 3]>;

/// Topological kind of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellKind {
    /// A single point.
    Vertex,
    /// An open chain of one or more segments (a plain line has two ids).
    Line,
    /// A closed polygon; three ids make a triangle.
    Polygon,
}

impl CellKind {
    /// Minimum number of distinct ids for a non-degenerate cell of this kind.
    #[must_use]
    pub const fn min_ids(self) -> usize {
        match self {
            Self::Vertex => 1,
            Self::Line => 2,
            Self::Polygon => 3,
        }
    }

    /// Lowercase name for listings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Line => "line",
            Self::Polygon => "polygon",
        }
    }
}

/// A cell as an ordered list of vertex ids.
///
/// # Example
///
/// ```
/// use mesh_types::{Cell, CellKind};
///
/// let tri = Cell::triangle([0, 1, 2]);
/// assert!(tri.is_triangle());
/// assert_eq!(tri.edges().count(), 3);
///
/// let seg = Cell::line(4, 5);
/// assert_eq!(seg.kind(), CellKind::Line);
/// assert_eq!(seg.edges().collect::<Vec<_>>(), vec![[4, 5]]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    kind: CellKind,
    ids: CellIds,
}

impl Cell {
    /// Create a cell of the given kind.
    #[must_use]
    pub fn new(kind: CellKind, ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            kind,
            ids: ids.into_iter().collect(),
        }
    }

    /// A single-point cell.
    #[must_use]
    pub fn vertex(id: u32) -> Self {
        Self::new(CellKind::Vertex, [id])
    }

    /// A two-point line segment.
    #[must_use]
    pub fn line(a: u32, b: u32) -> Self {
        Self::new(CellKind::Line, [a, b])
    }

    /// An open polyline through `ids`.
    #[must_use]
    pub fn polyline(ids: impl IntoIterator<Item = u32>) -> Self {
        Self::new(CellKind::Line, ids)
    }

    /// A triangle with counter-clockwise winding.
    #[must_use]
    pub fn triangle(ids: [u32; 3]) -> Self {
        Self::new(CellKind::Polygon, ids)
    }

    /// A closed polygon through `ids`.
    #[must_use]
    pub fn polygon(ids: impl IntoIterator<Item = u32>) -> Self {
        Self::new(CellKind::Polygon, ids)
    }

    /// Kind of this cell.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    /// Vertex ids in cell order.
    #[inline]
    #[must_use]
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// Number of vertex ids.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if the cell has no ids.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// True for a polygon with exactly three ids.
    #[inline]
    #[must_use]
    pub fn is_triangle(&self) -> bool {
        self.kind == CellKind::Polygon && self.ids.len() == 3
    }

    /// The three ids of a triangle cell.
    #[must_use]
    pub fn as_triangle(&self) -> Option<[u32; 3]> {
        if self.is_triangle() {
            Some([self.ids[0], self.ids[1], self.ids[2]])
        } else {
            None
        }
    }

    /// Fan triangulation of a polygon around its first id.
    ///
    /// A triangle yields itself; lines, vertex cells and polygons with fewer
    /// than three ids yield nothing.
    pub fn fan_triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        let count = match self.kind {
            CellKind::Polygon => self.ids.len().saturating_sub(2),
            CellKind::Vertex | CellKind::Line => 0,
        };
        (1..=count).map(move |i| [self.ids[0], self.ids[i], self.ids[i + 1]])
    }

    /// Edges of the cell as id pairs in cell order.
    ///
    /// Polygons are closed (last id back to first), lines are open and
    /// vertex cells have no edges.
    pub fn edges(&self) -> impl Iterator<Item = [u32; 2]> + '_ {
        let n = self.ids.len();
        let count = match self.kind {
            CellKind::Vertex => 0,
            CellKind::Line => n.saturating_sub(1),
            CellKind::Polygon if n >= 2 => n,
            CellKind::Polygon => 0,
        };
        (0..count).map(move |i| [self.ids[i], self.ids[(i + 1) % n]])
    }

    /// Number of distinct ids.
    #[must_use]
    pub fn distinct_len(&self) -> usize {
        let mut sorted: CellIds = self.ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        sorted.len()
    }

    /// True if the cell has fewer distinct ids than its kind requires.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.distinct_len() < self.kind.min_ids()
    }
}
