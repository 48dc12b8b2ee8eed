//! Ordering unordered segments into a loop.

use std::collections::BTreeMap;

use hashbrown::HashSet;
use mesh_types::{Point3, SurfaceMesh};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::error::{ContourError, ContourResult};

/// Undirected vertex pairing built from a segment soup.
///
/// Each vertex lists its partners in segment order. For a simple cycle every
/// vertex has exactly two; anything else marks branching, dangling or
/// duplicated input.
///
/// Keys are ordered, so the walk always starts at the smallest vertex id.
#[derive(Debug, Clone, Default)]
pub struct EdgeGraph {
    neighbors: BTreeMap<u32, SmallVec<[u32; 2]>>,
    segments: usize,
}

impl EdgeGraph {
    /// Pair up the endpoints of every segment.
    ///
    /// Segments joining a vertex to itself carry no direction and are skipped.
    #[must_use]
    pub fn from_segments(segments: impl IntoIterator<Item = [u32; 2]>) -> Self {
        let mut graph = Self::default();
        let mut skipped = 0usize;
        for [a, b] in segments {
            if a == b {
                skipped += 1;
                continue;
            }
            graph.neighbors.entry(a).or_default().push(b);
            graph.neighbors.entry(b).or_default().push(a);
            graph.segments += 1;
        }
        if skipped > 0 {
            debug!(skipped, "skipped zero-length segments");
        }
        graph
    }

    /// Number of distinct vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of segments kept.
    #[must_use]
    pub const fn segment_count(&self) -> usize {
        self.segments
    }

    /// Number of partners of `v`.
    #[must_use]
    pub fn degree(&self, v: u32) -> usize {
        self.neighbors.get(&v).map_or(0, SmallVec::len)
    }

    /// Vertices whose degree is not two, in ascending order.
    #[must_use]
    pub fn irregular_vertices(&self) -> Vec<u32> {
        self.neighbors
            .iter()
            .filter(|(_, n)| n.len() != 2)
            .map(|(&v, _)| v)
            .collect()
    }

    /// Walk the graph from its smallest vertex.
    ///
    /// The walk first moves to the start's first partner, then always to the
    /// partner it did not arrive from. It stops when it returns to the start
    /// (closed loop), reaches a vertex with nowhere else to go, or meets a
    /// vertex it has already visited.
    #[must_use]
    pub fn walk(&self) -> ContourLoop {
        let Some((&start, _)) = self.neighbors.first_key_value() else {
            return ContourLoop::default();
        };

        let mut vertices = vec![start];
        let mut visited: HashSet<u32> = HashSet::from_iter([start]);
        let mut previous: Option<u32> = None;
        let mut current = start;
        let mut closed = false;

        loop {
            let Some(next) = self.next_from(current, previous) else {
                break;
            };
            if next == start {
                closed = true;
                break;
            }
            if !visited.insert(next) {
                break;
            }
            vertices.push(next);
            previous = Some(current);
            current = next;
        }

        ContourLoop { vertices, closed }
    }

    /// First partner of `current`, skipping one occurrence of `previous`.
    fn next_from(&self, current: u32, previous: Option<u32>) -> Option<u32> {
        let partners = self.neighbors.get(&current)?;
        match previous {
            None => partners.first().copied(),
            Some(prev) => {
                let skip = partners.iter().position(|&p| p == prev);
                partners
                    .iter()
                    .enumerate()
                    .find(|&(i, _)| Some(i) != skip)
                    .map(|(_, &p)| p)
            }
        }
    }
}

/// An ordered vertex cycle, or the part of one that could be walked.
///
/// # Example
///
/// ```
/// use mesh_contour::order_loop;
///
/// let contour = order_loop([[2, 3], [1, 0], [3, 0], [2, 1]]);
/// assert!(contour.is_closed());
/// assert!(contour.matches_cycle(&[0, 1, 2, 3]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContourLoop {
    vertices: Vec<u32>,
    closed: bool,
}

impl ContourLoop {
    /// Vertex ids in walk order. The closing edge back to the first vertex is
    /// implied, not repeated.
    #[must_use]
    pub fn vertices(&self) -> &[u32] {
        &self.vertices
    }

    /// Take ownership of the vertex ids.
    #[must_use]
    pub fn into_vertices(self) -> Vec<u32> {
        self.vertices
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True if nothing was walked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// True if the walk returned to its starting vertex.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Require a closed loop covering `vertex_count` vertices.
    ///
    /// # Errors
    ///
    /// Returns [`ContourError::OpenLoop`] if the walk stopped early or left
    /// vertices unvisited.
    pub fn into_closed(self, vertex_count: usize) -> ContourResult<Self> {
        if self.closed && self.vertices.len() == vertex_count {
            Ok(self)
        } else {
            Err(ContourError::OpenLoop {
                visited: self.vertices.len(),
                vertices: vertex_count,
            })
        }
    }

    /// Positions of the loop's vertices in `mesh`. Unknown ids are skipped.
    #[must_use]
    pub fn points(&self, mesh: &SurfaceMesh) -> Vec<Point3<f64>> {
        self.vertices
            .iter()
            .filter_map(|&v| mesh.position(v).copied())
            .collect()
    }

    /// True if this loop traces `cycle`, read forwards or backwards from any
    /// starting vertex.
    #[must_use]
    pub fn matches_cycle(&self, cycle: &[u32]) -> bool {
        let n = cycle.len();
        if n != self.vertices.len() {
            return false;
        }
        if n == 0 {
            return true;
        }
        let Some(offset) = cycle.iter().position(|&v| v == self.vertices[0]) else {
            return false;
        };
        let forward = (0..n).all(|i| self.vertices[i] == cycle[(offset + i) % n]);
        let backward = (0..n).all(|i| self.vertices[i] == cycle[(offset + n - i) % n]);
        forward || backward
    }
}

/// Order an unordered set of segments into a vertex loop.
///
/// The input should be a cleaned edge set tracing exactly one simple cycle.
/// Segment order and endpoint order do not matter. Malformed input is not
/// rejected: the walk stops where it cannot continue and the result reports
/// `is_closed() == false` or covers fewer vertices than the segments mention.
///
/// # Example
///
/// ```
/// use mesh_contour::order_loop;
///
/// let open = order_loop([[0, 1], [1, 2]]);
/// assert!(!open.is_closed());
/// assert_eq!(open.vertices(), &[0, 1, 2]);
///
/// assert!(order_loop(std::iter::empty()).is_empty());
/// ```
#[must_use]
pub fn order_loop(segments: impl IntoIterator<Item = [u32; 2]>) -> ContourLoop {
    let graph = EdgeGraph::from_segments(segments);
    let contour = graph.walk();

    if !contour.is_empty() && (!contour.is_closed() || contour.len() != graph.vertex_count()) {
        warn!(
            walked = contour.len(),
            vertices = graph.vertex_count(),
            closed = contour.is_closed(),
            irregular = graph.irregular_vertices().len(),
            "segments do not form a single closed loop"
        );
    } else {
        debug!(vertices = contour.len(), segments = graph.segment_count(), "ordered loop");
    }
    contour
}
