//! Revision-cached stages and stage chains.

use mesh_contour::{CleanParams, ContourResult};
use mesh_types::SurfaceMesh;
use tracing::{debug, info};

use crate::ops::{MeshOperation, OperationOutput};

/// An operation plus its last output.
///
/// The output is tagged with the revision of the mesh it was computed from.
/// [`Stage::compute`] reuses it while the input keeps that revision and
/// recomputes after any mutation.
///
/// # Example
///
/// ```
/// use mesh::{MeshOperation, Stage};
/// use mesh::types::{Point3, SurfaceMesh, Vector3};
///
/// let mut mesh = SurfaceMesh::planar_grid(4, 4, 1.0);
/// let mut stage = Stage::new(MeshOperation::RegionGrow {
///     center: Point3::new(1.0, 1.0, 0.0),
///     radius: 1.5,
/// });
///
/// stage.compute(&mesh).unwrap();
/// stage.compute(&mesh).unwrap();
/// assert_eq!(stage.computations(), 1);
///
/// mesh.translate(Vector3::new(10.0, 0.0, 0.0));
/// assert!(!stage.is_fresh(&mesh));
/// let cells = stage.compute(&mesh).unwrap().as_cells().unwrap();
/// assert!(cells.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Stage {
    operation: MeshOperation,
    cached: Option<(u64, OperationOutput)>,
    computations: u64,
}

impl Stage {
    /// Create a stage with an empty cache.
    #[must_use]
    pub const fn new(operation: MeshOperation) -> Self {
        Self {
            operation,
            cached: None,
            computations: 0,
        }
    }

    /// The operation this stage runs.
    #[must_use]
    pub const fn operation(&self) -> &MeshOperation {
        &self.operation
    }

    /// Replace the operation and drop the cache.
    pub fn set_operation(&mut self, operation: MeshOperation) {
        self.operation = operation;
        self.invalidate();
    }

    /// Output for `input`, recomputed only if `input` has changed.
    ///
    /// # Errors
    ///
    /// Propagates the operation's error. The cache is left empty.
    pub fn compute(&mut self, input: &SurfaceMesh) -> ContourResult<&OperationOutput> {
        let revision = input.revision();
        let entry = match self.cached.take() {
            Some(entry) if entry.0 == revision => entry,
            _ => {
                let output = self.operation.apply(input)?;
                self.computations += 1;
                debug!(stage = self.operation.name(), revision, "recomputed stage");
                (revision, output)
            }
        };
        Ok(&self.cached.insert(entry).1)
    }

    /// Cached output, if any, regardless of freshness.
    #[must_use]
    pub fn output(&self) -> Option<&OperationOutput> {
        self.cached.as_ref().map(|(_, output)| output)
    }

    /// True if the cache was computed from `input`'s current revision.
    #[must_use]
    pub fn is_fresh(&self, input: &SurfaceMesh) -> bool {
        self.cached
            .as_ref()
            .is_some_and(|(revision, _)| *revision == input.revision())
    }

    /// Drop the cached output.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Number of times the operation has run.
    #[must_use]
    pub const fn computations(&self) -> u64 {
        self.computations
    }
}

/// A chain of cleaning stages feeding one terminal stage.
///
/// Each stage owns its output. A clean stage's output mesh carries its own
/// revision, so a downstream stage recomputes exactly when something
/// upstream did.
///
/// # Example
///
/// ```
/// use mesh::{CleanParams, MeshOperation, Pipeline};
/// use mesh::contour::{Plane, cut_with_plane};
/// use mesh::types::SurfaceMesh;
///
/// let section = cut_with_plane(&SurfaceMesh::unit_cube(), &Plane::horizontal(0.2)).unwrap();
///
/// let mut pipeline = Pipeline::new(MeshOperation::LoopExtract(CleanParams::merge_only()))
///     .with_clean(CleanParams::default());
///
/// let output = pipeline.compute(&section).unwrap();
/// assert!(output.as_contour().is_some_and(|c| c.is_complete()));
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    cleaners: Vec<Stage>,
    terminal: Stage,
}

impl Pipeline {
    /// A pipeline that runs `terminal` directly on its input.
    #[must_use]
    pub const fn new(terminal: MeshOperation) -> Self {
        Self {
            cleaners: Vec::new(),
            terminal: Stage::new(terminal),
        }
    }

    /// Append a cleaning stage ahead of the terminal stage.
    #[must_use]
    pub fn with_clean(mut self, params: CleanParams) -> Self {
        self.cleaners.push(Stage::new(MeshOperation::Clean(params)));
        self.terminal.invalidate();
        self
    }

    /// Number of stages, terminal included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cleaners.len() + 1
    }

    /// Always false: a pipeline has at least its terminal stage.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The terminal stage.
    #[must_use]
    pub const fn terminal(&self) -> &Stage {
        &self.terminal
    }

    /// All stages in execution order.
    pub fn stages(&self) -> impl Iterator<Item = &Stage> {
        self.cleaners.iter().chain(std::iter::once(&self.terminal))
    }

    /// Pull `input` through every stage and return the terminal output.
    ///
    /// # Errors
    ///
    /// Returns the first stage error.
    pub fn compute(&mut self, input: &SurfaceMesh) -> ContourResult<&OperationOutput> {
        let stages = self.len();
        let mut recomputed = 0usize;

        let mut current = input;
        for stage in &mut self.cleaners {
            if !stage.is_fresh(current) {
                recomputed += 1;
            }
            // Cleaning always yields a mesh.
            if let Some(mesh) = stage.compute(current)?.as_mesh() {
                current = mesh;
            }
        }
        if !self.terminal.is_fresh(current) {
            recomputed += 1;
        }
        let output = self.terminal.compute(current)?;

        if recomputed > 0 {
            info!(stages, recomputed, "pipeline recomputed");
        }
        Ok(output)
    }

    /// Drop every cached output.
    pub fn invalidate(&mut self) {
        for stage in &mut self.cleaners {
            stage.invalidate();
        }
        self.terminal.invalidate();
    }
}
