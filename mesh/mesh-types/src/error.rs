//! Error types for mesh construction.

use thiserror::Error;

/// Errors raised while building or editing a [`SurfaceMesh`](crate::SurfaceMesh).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MeshError {
    /// A cell references a vertex that does not exist.
    #[error("cell references vertex {index}, but the mesh has only {vertex_count} vertices")]
    InvalidVertexIndex {
        /// The offending vertex id.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A cell has no vertex ids at all.
    #[error("cell {cell} has no vertex ids")]
    EmptyCell {
        /// Position of the cell in the input.
        cell: usize,
    },

    /// The mesh has more cells than `u32` ids can address.
    #[error("cell count exceeds the u32 id range")]
    TooManyCells,
}

/// Result type for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_vertex_index_message() {
        let err = MeshError::InvalidVertexIndex {
            index: 7,
            vertex_count: 3,
        };
        assert_eq!(
            err.to_string(),
            "cell references vertex 7, but the mesh has only 3 vertices"
        );
    }

    #[test]
    fn empty_cell_message() {
        let err = MeshError::EmptyCell { cell: 2 };
        assert!(err.to_string().contains("cell 2"));
    }
}
