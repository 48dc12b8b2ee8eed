//! Mesh operations as values.

use mesh_contour::{
    CleanOutcome, CleanParams, ContourResult, LoopExtraction, clean_mesh, extract_loop,
};
use mesh_region::{aggregate_normal, cells_fully_within};
use mesh_types::{Point3, SurfaceMesh, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One operation on a surface mesh.
///
/// # Example
///
/// ```
/// use mesh::MeshOperation;
/// use mesh::types::{Point3, SurfaceMesh};
///
/// let grid = SurfaceMesh::planar_grid(4, 4, 1.0);
/// let pick = MeshOperation::RegionGrow {
///     center: Point3::new(1.0, 1.0, 0.0),
///     radius: 1.5,
/// };
///
/// let output = pick.apply(&grid).unwrap();
/// assert_eq!(output.as_cells().map(<[u32]>::len), Some(8));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MeshOperation {
    /// Cells lying entirely within `radius` of `center`.
    RegionGrow {
        /// Pick point.
        center: Point3<f64>,
        /// Pick radius. Non-positive radii select nothing.
        radius: f64,
    },
    /// Clean an edge mesh and order it into a loop.
    LoopExtract(CleanParams),
    /// Area-weighted unit normal of the listed cells.
    NormalEstimate {
        /// Cell ids to aggregate. Non-triangles and unknown ids are skipped.
        cells: Vec<u32>,
    },
    /// Merge, demote, deduplicate and triangulate.
    Clean(CleanParams),
}

impl MeshOperation {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RegionGrow { .. } => "region_grow",
            Self::LoopExtract(_) => "loop_extract",
            Self::NormalEstimate { .. } => "normal_estimate",
            Self::Clean(_) => "clean",
        }
    }

    /// True if the output carries a mesh another operation can consume.
    #[must_use]
    pub const fn produces_mesh(&self) -> bool {
        matches!(self, Self::Clean(_))
    }

    /// Run the operation on `mesh`.
    ///
    /// # Errors
    ///
    /// Fails if the cleaning parameters of a `Clean` or `LoopExtract`
    /// operation are invalid.
    pub fn apply(&self, mesh: &SurfaceMesh) -> ContourResult<OperationOutput> {
        Ok(match self {
            Self::RegionGrow { center, radius } => {
                OperationOutput::Cells(cells_fully_within(mesh, center, *radius).sorted_ids())
            }
            Self::LoopExtract(params) => OperationOutput::Contour(extract_loop(mesh, params)?),
            Self::NormalEstimate { cells } => {
                OperationOutput::Normal(aggregate_normal(mesh, cells.iter().copied()))
            }
            Self::Clean(params) => OperationOutput::Mesh(clean_mesh(mesh, params)?),
        })
    }
}

/// Result of a [`MeshOperation`].
#[derive(Debug, Clone)]
pub enum OperationOutput {
    /// Selected cell ids, ascending.
    Cells(Vec<u32>),
    /// A cleaned edge mesh and its ordered loop.
    Contour(LoopExtraction),
    /// A unit normal, or zero if nothing contributed.
    Normal(Vector3<f64>),
    /// A cleaned mesh with statistics.
    Mesh(CleanOutcome),
}

impl OperationOutput {
    /// Cell ids, if this is a selection.
    #[must_use]
    pub fn as_cells(&self) -> Option<&[u32]> {
        match self {
            Self::Cells(cells) => Some(cells.as_slice()),
            _ => None,
        }
    }

    /// The loop extraction, if this is a contour.
    #[must_use]
    pub const fn as_contour(&self) -> Option<&LoopExtraction> {
        match self {
            Self::Contour(extraction) => Some(extraction),
            _ => None,
        }
    }

    /// The normal, if this is a normal estimate.
    #[must_use]
    pub const fn as_normal(&self) -> Option<&Vector3<f64>> {
        match self {
            Self::Normal(normal) => Some(normal),
            _ => None,
        }
    }

    /// The produced mesh, if any.
    #[must_use]
    pub const fn as_mesh(&self) -> Option<&SurfaceMesh> {
        match self {
            Self::Mesh(outcome) => Some(&outcome.mesh),
            _ => None,
        }
    }
}
