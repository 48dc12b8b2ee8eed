//! Accumulating selection state.
//!
//! [`SelectionAccumulator`] keeps two regions across repeated picks:
//!
//! - the *last* region, replaced by every valid pick;
//! - the *cumulative* region, the union of every non-empty append pick.
//!
//! Pick points of non-empty appends are kept in call order. A change in the
//! mesh revision discards everything, because cell ids from an older revision
//! no longer mean anything.

use mesh_spatial::IndexParams;
use mesh_types::{Point3, SurfaceMesh, Vector3};
use tracing::{debug, warn};

use crate::error::{RegionError, RegionResult};
use crate::grow::RegionIndex;
use crate::region::CellRegion;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether a pick extends the cumulative selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SelectionMode {
    /// Update only the last region.
    #[default]
    Replace,
    /// Update the last region and merge it into the cumulative region.
    Append,
}

impl SelectionMode {
    /// Map an `append` flag to a mode.
    #[must_use]
    pub const fn from_append(append: bool) -> Self {
        if append { Self::Append } else { Self::Replace }
    }
}

/// Lifecycle of a [`SelectionAccumulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionState {
    /// Nothing selected since construction, the last clear or the last reset.
    #[default]
    Idle,
    /// At least one valid pick ran, even if it matched no cells.
    Selected,
}

/// One pick: a center, a radius and a mode.
///
/// # Example
///
/// ```
/// use mesh_region::{SelectionMode, SelectionRequest};
/// use mesh_types::Point3;
///
/// let req = SelectionRequest::append(Point3::new(1.0, 2.0, 3.0), 0.5);
/// assert_eq!(req.mode, SelectionMode::Append);
/// assert!(req.validate().is_ok());
///
/// assert!(SelectionRequest::replace(Point3::origin(), 0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectionRequest {
    /// Pick point in world coordinates.
    pub center: Point3<f64>,
    /// Sphere radius.
    pub radius: f64,
    /// Append or replace.
    pub mode: SelectionMode,
}

impl SelectionRequest {
    /// Create a request.
    #[must_use]
    pub const fn new(center: Point3<f64>, radius: f64, mode: SelectionMode) -> Self {
        Self {
            center,
            radius,
            mode,
        }
    }

    /// An append request.
    #[must_use]
    pub const fn append(center: Point3<f64>, radius: f64) -> Self {
        Self::new(center, radius, SelectionMode::Append)
    }

    /// A replace request.
    #[must_use]
    pub const fn replace(center: Point3<f64>, radius: f64) -> Self {
        Self::new(center, radius, SelectionMode::Replace)
    }

    /// Check that the request can select anything.
    ///
    /// # Errors
    ///
    /// [`RegionError::InvalidRadius`] for a non-positive or non-finite radius,
    /// [`RegionError::NonFinitePoint`] for a NaN or infinite center.
    pub fn validate(&self) -> RegionResult<()> {
        if !(self.radius > 0.0 && self.radius.is_finite()) {
            return Err(RegionError::InvalidRadius(self.radius));
        }
        if !self.center.iter().all(|c| c.is_finite()) {
            return Err(RegionError::NonFinitePoint);
        }
        Ok(())
    }
}

/// Selection state machine over one mesh.
///
/// Invariant: the cumulative region contains every region produced by an
/// append since the last clear or reset.
///
/// The accumulator does not own the mesh. Every call takes the mesh and
/// compares its [`revision`](SurfaceMesh::revision) with the one the state
/// was built against; a mismatch resets the state before the call proceeds.
/// Output accessors given a mismatched mesh return empty results.
///
/// Mutating calls take `&mut self`, so one pick or clear can never interleave
/// with another.
///
/// # Example
///
/// ```
/// use mesh_region::{SelectionAccumulator, SelectionMode, SelectionState};
/// use mesh_types::{Point3, SurfaceMesh};
///
/// let mesh = SurfaceMesh::planar_grid(8, 8, 1.0);
/// let mut selection = SelectionAccumulator::new();
///
/// selection.select(&mesh, &Point3::new(2.0, 2.0, 0.0), 1.5, SelectionMode::Append);
/// let painted = selection.cumulative_region().len();
///
/// // Replace moves the last region but keeps the painted history.
/// selection.select(&mesh, &Point3::new(6.0, 6.0, 0.0), 1.5, SelectionMode::Replace);
/// assert_eq!(selection.cumulative_region().len(), painted);
/// assert_eq!(selection.selected_centers(&mesh).len(), 1);
///
/// selection.clear();
/// assert_eq!(selection.state(), SelectionState::Idle);
/// assert!(selection.cumulative_region().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectionAccumulator {
    state: SelectionState,
    last: CellRegion,
    cumulative: CellRegion,
    centers: Vec<Point3<f64>>,
    index: Option<RegionIndex>,
    index_params: IndexParams,
    version: u64,
}

impl SelectionAccumulator {
    /// Create an idle accumulator with default index parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an idle accumulator with custom index parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Index`] if the parameters are invalid.
    pub fn with_index_params(params: IndexParams) -> RegionResult<Self> {
        params.validate()?;
        Ok(Self {
            index_params: params,
            ..Self::default()
        })
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SelectionState {
        self.state
    }

    /// Counter bumped by every change to the selection state.
    ///
    /// Two reads returning the same value saw the same regions and centers.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Revision of the mesh the current state refers to, if any.
    #[must_use]
    pub fn tracked_revision(&self) -> Option<u64> {
        self.index.as_ref().map(RegionIndex::revision)
    }

    /// Region produced by the most recent valid pick.
    ///
    /// This is raw state for [`tracked_revision`](Self::tracked_revision).
    /// After the mesh changes it still holds the old ids until the next pick
    /// resets it; check [`is_current`](Self::is_current) before using them.
    #[must_use]
    pub const fn last_region(&self) -> &CellRegion {
        &self.last
    }

    /// Union of every non-empty append since the last clear.
    ///
    /// Raw state, with the same caveat as [`last_region`](Self::last_region).
    #[must_use]
    pub const fn cumulative_region(&self) -> &CellRegion {
        &self.cumulative
    }

    /// Pick points of the non-empty appends, in call order.
    ///
    /// Empty if `mesh` is not the tracked revision.
    #[must_use]
    pub fn selected_centers(&self, mesh: &SurfaceMesh) -> Vec<Point3<f64>> {
        if self.is_current(mesh) {
            self.centers.clone()
        } else {
            Vec::new()
        }
    }

    /// Cumulative cell ids in ascending order.
    ///
    /// Empty if `mesh` is not the tracked revision.
    #[must_use]
    pub fn applied_cell_ids(&self, mesh: &SurfaceMesh) -> Vec<u32> {
        if self.is_current(mesh) {
            self.cumulative.sorted_ids()
        } else {
            Vec::new()
        }
    }

    /// Run one pick against `mesh` and return the new last region.
    ///
    /// An invalid radius or center leaves every piece of state untouched.
    /// Otherwise the last region is replaced; in [`SelectionMode::Append`] a
    /// non-empty result is merged into the cumulative region and its center
    /// recorded.
    pub fn select(
        &mut self,
        mesh: &SurfaceMesh,
        point: &Point3<f64>,
        radius: f64,
        mode: SelectionMode,
    ) -> &CellRegion {
        self.apply(mesh, &SelectionRequest::new(*point, radius, mode))
    }

    /// [`select`](Self::select) with a boolean append flag.
    pub fn select_with_flag(
        &mut self,
        mesh: &SurfaceMesh,
        point: &Point3<f64>,
        radius: f64,
        append: bool,
    ) -> &CellRegion {
        self.select(mesh, point, radius, SelectionMode::from_append(append))
    }

    /// Run one pick described by a [`SelectionRequest`].
    pub fn apply(&mut self, mesh: &SurfaceMesh, request: &SelectionRequest) -> &CellRegion {
        if let Err(err) = request.validate() {
            debug!(%err, "ignoring selection request");
            return &self.last;
        }

        self.sync(mesh);
        let region = match self.index.as_ref().and_then(|index| index.grower(mesh)) {
            Some(grower) => grower.cells_fully_within(&request.center, request.radius),
            None => CellRegion::new(),
        };

        if request.mode == SelectionMode::Append && !region.is_empty() {
            let added = self.cumulative.union_with(&region);
            self.centers.push(request.center);
            debug!(
                cells = region.len(),
                added,
                cumulative = self.cumulative.len(),
                "appended selection"
            );
        }
        self.last = region;
        self.state = SelectionState::Selected;
        self.bump();
        &self.last
    }

    /// Drop every region and center and return to [`SelectionState::Idle`].
    ///
    /// The spatial index is kept; it stays valid while the mesh is unchanged.
    pub fn clear(&mut self) {
        self.last.clear();
        self.cumulative.clear();
        self.centers.clear();
        self.state = SelectionState::Idle;
        self.bump();
    }

    /// True if the state refers to this revision of `mesh`.
    #[must_use]
    pub fn is_current(&self, mesh: &SurfaceMesh) -> bool {
        self.index.as_ref().is_some_and(|index| index.is_current(mesh))
    }

    /// Submesh of the last region, empty if `mesh` is not the tracked revision.
    #[must_use]
    pub fn last_selection_mesh(&self, mesh: &SurfaceMesh) -> SurfaceMesh {
        self.region_mesh(&self.last, mesh)
    }

    /// Submesh of the cumulative region, empty if `mesh` is not the tracked
    /// revision.
    #[must_use]
    pub fn cumulative_selection_mesh(&self, mesh: &SurfaceMesh) -> SurfaceMesh {
        self.region_mesh(&self.cumulative, mesh)
    }

    /// Area-weighted normal of the cumulative region.
    ///
    /// Zero if nothing is selected or `mesh` is not the tracked revision.
    #[must_use]
    pub fn selection_normal(&self, mesh: &SurfaceMesh) -> Vector3<f64> {
        if self.is_current(mesh) {
            self.cumulative.normal(mesh)
        } else {
            Vector3::zeros()
        }
    }

    fn region_mesh(&self, region: &CellRegion, mesh: &SurfaceMesh) -> SurfaceMesh {
        if self.is_current(mesh) {
            region.to_mesh(mesh)
        } else {
            SurfaceMesh::new()
        }
    }

    /// Make the index match `mesh`, discarding state built on another revision.
    fn sync(&mut self, mesh: &SurfaceMesh) {
        match self.index.as_ref().map(RegionIndex::revision) {
            Some(revision) if revision == mesh.revision() => return,
            Some(revision) => {
                warn!(
                    previous = revision,
                    current = mesh.revision(),
                    "mesh changed, discarding selection"
                );
                self.reset();
            }
            None => {}
        }
        // Parameters were validated on construction.
        self.index = RegionIndex::build(mesh, &self.index_params).ok();
    }

    fn reset(&mut self) {
        self.last.clear();
        self.cumulative.clear();
        self.centers.clear();
        self.index = None;
        self.state = SelectionState::Idle;
        self.bump();
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}
