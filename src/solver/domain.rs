//! Assembled solver domain: state stores, face units and boundary roles.
//!
//! Built once from a [`GridTopology`] and per-cell inputs. Geometry terms
//! and the interior unit table never change afterwards; boundary conditions
//! only turn wall faces into open ones.
//!
//! One iteration is two barrier-separated sweeps:
//! 1. [`LiaDomain::update_fluxes`] writes every face flux into a scratch
//!    buffer from committed heads and fluxes, then commits
//! 2. [`LiaDomain::update_heads`] updates every real head from the committed
//!    fluxes

use log::{debug, warn};

use crate::boundary::{FaceRole, GhostBoundaryRegistry, single_neighbour};
use crate::error::{CellField, ConfigError};
use crate::flux::{FaceUpdateUnit, LiaParams, UnitStencil};
use crate::mesh::GridTopology;
use crate::solver::state::{FluxState, NodeRef, NodeState};
use crate::source::CellSource;
use crate::types::{CellFaces, CellIndex, FaceIndex, GhostIndex};

/// Per-cell inputs, indexed by cell. NaN marks a missing (nodata) value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellInputs {
    /// Bed elevation
    pub elevation: Vec<f64>,
    /// Initial water-surface head
    pub head: Vec<f64>,
    /// Manning roughness
    pub roughness: Vec<f64>,
}

impl CellInputs {
    pub fn new(elevation: Vec<f64>, head: Vec<f64>, roughness: Vec<f64>) -> Self {
        Self {
            elevation,
            head,
            roughness,
        }
    }

    /// Same elevation, head and roughness in every cell.
    pub fn uniform(n_cells: usize, elevation: f64, head: f64, roughness: f64) -> Self {
        Self::new(
            vec![elevation; n_cells],
            vec![head; n_cells],
            vec![roughness; n_cells],
        )
    }
}

/// Outcome of one head sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeadUpdate {
    /// Largest |Δh| over real cells
    pub residual: f64,
    /// Water added by the source term (negative for a net sink)
    pub source_volume: f64,
}

/// The local inertial solver domain.
#[derive(Clone, Debug)]
pub struct LiaDomain {
    dx: f64,
    cell_faces: Vec<CellFaces>,
    face_neighbours: Vec<[Option<CellIndex>; 2]>,
    nodes: NodeState,
    fluxes: FluxState,
    units: Vec<FaceUpdateUnit>,
    roles: Vec<FaceRole>,
    boundaries: GhostBoundaryRegistry,
}

impl LiaDomain {
    /// Assemble the domain from mesh topology and per-cell inputs.
    ///
    /// Every active cell needs an elevation, head and roughness; the first
    /// missing one is reported as [`ConfigError::MissingCellValue`]. Infinite
    /// values and negative roughness are [`ConfigError::InvalidCellValue`].
    pub fn build<T: GridTopology + ?Sized>(topology: &T, inputs: &CellInputs) -> Result<Self, ConfigError> {
        let n_cells = topology.n_cells();
        let n_faces = topology.n_faces();
        let dx = topology.cell_width();
        if !(dx.is_finite() && dx > 0.0) {
            return Err(ConfigError::InvalidGrid(format!(
                "cell width must be positive, got {}",
                dx
            )));
        }

        let z = required_field(CellField::Elevation, &inputs.elevation, n_cells)?;
        let h = required_field(CellField::Head, &inputs.head, n_cells)?;
        let n = required_field(CellField::Roughness, &inputs.roughness, n_cells)?;
        if let Some(position) = n.iter().position(|&v| v < 0.0) {
            return Err(ConfigError::InvalidCellValue {
                field: CellField::Roughness,
                cell: CellIndex::new(position),
                value: n[position],
                reason: "must be non-negative",
            });
        }
        let nodes = NodeState::new(z, h, n);

        let cell_faces: Vec<CellFaces> = CellIndex::iter(n_cells)
            .map(|c| topology.cell_faces(c))
            .collect();
        for faces in &cell_faces {
            for face in faces.to_array() {
                if face.get() >= n_faces {
                    return Err(ConfigError::FaceOutOfRange { face, n_faces });
                }
            }
        }

        let mut face_neighbours = Vec::with_capacity(n_faces);
        let mut roles = Vec::with_capacity(n_faces);
        let mut units = Vec::new();

        for face in FaceIndex::iter(n_faces) {
            let neighbours = topology.face_neighbours(face);
            if let Some(cell) = neighbours.iter().flatten().find(|c| c.get() >= n_cells) {
                return Err(ConfigError::InconsistentTopology {
                    face,
                    reason: format!("neighbour {} is not an active cell", cell),
                });
            }

            let role = match neighbours {
                [Some(lo), Some(hi)] => {
                    let primary = topology.face_is_primary_axis(face);
                    check_orientation(topology, face, primary, lo, hi, &cell_faces)?;
                    let unit = FaceUpdateUnit::new(
                        face,
                        [NodeRef::Real(lo), NodeRef::Real(hi)],
                        [nodes.z[lo], nodes.z[hi]],
                        [nodes.n[lo], nodes.n[hi]],
                        interior_stencil(primary, &cell_faces[lo], &cell_faces[hi]),
                    );
                    units.push(unit);
                    FaceRole::Interior(units.len() - 1)
                }
                [None, None] => FaceRole::Inert,
                _ => FaceRole::Wall,
            };
            face_neighbours.push(neighbours);
            roles.push(role);
        }

        debug!(
            "Built LIA domain: {} cells, {} faces, {} interior units, dx = {}",
            n_cells,
            n_faces,
            units.len(),
            dx
        );

        Ok(Self {
            dx,
            cell_faces,
            face_neighbours,
            nodes,
            fluxes: FluxState::zeros(n_faces),
            units,
            roles,
            boundaries: GhostBoundaryRegistry::new(),
        })
    }

    // =========================================================================
    // Boundary conditions
    // =========================================================================

    /// Prescribe the head behind a boundary face through a new ghost node.
    pub fn set_head_boundary(&mut self, face: FaceIndex, head: f64) -> Result<GhostIndex, ConfigError> {
        self.check_face(face)?;
        check_finite("head", head)?;
        let (cell, slot) = single_neighbour(face, self.face_neighbours[face])?;
        match self.roles[face] {
            FaceRole::Wall => {}
            FaceRole::PrescribedHead(_) => return Err(ConfigError::DuplicateHeadBoundary { face }),
            other => {
                return Err(ConfigError::FaceAlreadyClaimed {
                    face,
                    role: other.name(),
                });
            }
        }

        let ghost = self
            .boundaries
            .add_head(face, cell, slot, self.nodes.z[cell], self.nodes.n[cell], head)?;
        self.roles[face] = FaceRole::PrescribedHead(ghost);
        self.warn_if_below_bed(face, head);
        debug!("Prescribed head {} at face {} (ghost {} for cell {})", head, face, ghost, cell);
        Ok(ghost)
    }

    /// Prescribe the flux through a boundary face.
    ///
    /// A positive `magnitude` drains the domain: the committed flux is
    /// `magnitude` when the real cell is on side 0 and `-magnitude` when it is
    /// on side 1. Calling again on the same face replaces the value.
    pub fn set_flux_boundary(&mut self, face: FaceIndex, magnitude: f64) -> Result<(), ConfigError> {
        self.check_face(face)?;
        check_finite("flux", magnitude)?;
        let (_, slot) = single_neighbour(face, self.face_neighbours[face])?;
        match self.roles[face] {
            FaceRole::Wall | FaceRole::PrescribedFlux => {}
            other => {
                return Err(ConfigError::FaceAlreadyClaimed {
                    face,
                    role: other.name(),
                });
            }
        }

        let value = if slot == 1 { -magnitude } else { magnitude };
        self.fluxes.set(face, value);
        self.roles[face] = FaceRole::PrescribedFlux;
        self.boundaries.add_flux(face, slot);
        debug!("Prescribed flux {} at face {}", value, face);
        Ok(())
    }

    /// Return a prescribed-flux face to a closed wall.
    pub fn clear_flux_boundary(&mut self, face: FaceIndex) -> Result<(), ConfigError> {
        self.check_face(face)?;
        if self.roles[face] != FaceRole::PrescribedFlux {
            return Err(ConfigError::NoFluxBoundary { face });
        }
        self.fluxes.set(face, 0.0);
        self.roles[face] = FaceRole::Wall;
        self.boundaries.remove_flux(face);
        Ok(())
    }

    /// Overwrite the head of the ghost node registered at `face`.
    ///
    /// Touches nothing else; the new head takes effect at the next flux sweep.
    pub fn set_ghost_head(&mut self, face: FaceIndex, head: f64) -> Result<(), ConfigError> {
        self.check_face(face)?;
        check_finite("head", head)?;
        self.boundaries.set_head(face, head)?;
        self.warn_if_below_bed(face, head);
        Ok(())
    }

    fn warn_if_below_bed(&self, face: FaceIndex, head: f64) {
        if let Some(ghost) = self.boundaries.ghost_at(face).map(|g| self.boundaries.ghost(g))
            && head < ghost.z
        {
            warn!("Ghost head {} at face {} is below its bed {}; face stays dry", head, face, ghost.z);
        }
    }

    fn check_face(&self, face: FaceIndex) -> Result<(), ConfigError> {
        if face.get() >= self.roles.len() {
            return Err(ConfigError::FaceOutOfRange {
                face,
                n_faces: self.roles.len(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Update sweeps
    // =========================================================================

    /// Phase 1: recompute every face flux from committed state, then commit.
    pub fn update_fluxes(&mut self, params: &LiaParams) {
        self.sweep_fluxes(params, cfg!(feature = "parallel"));
    }

    fn sweep_fluxes(&mut self, params: &LiaParams, parallel: bool) {
        let nodes = &self.nodes;
        let boundaries = &self.boundaries;
        let units = &self.units;
        let roles = &self.roles;
        let (committed, scratch) = self.fluxes.split();

        let head_of = |node: NodeRef| match node {
            NodeRef::Real(c) => nodes.h[c],
            NodeRef::Ghost(g) => boundaries.head(g),
        };
        let face_flux = |(face, out): (usize, &mut f64)| {
            let unit = match roles[face] {
                FaceRole::Interior(u) => &units[u],
                FaceRole::PrescribedHead(g) => boundaries.unit(g),
                FaceRole::Inert | FaceRole::Wall | FaceRole::PrescribedFlux => {
                    *out = committed[face];
                    return;
                }
            };
            let heads = [head_of(unit.nodes[0]), head_of(unit.nodes[1])];
            *out = unit.update(committed, heads, params);
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            if parallel {
                scratch.par_iter_mut().enumerate().for_each(face_flux);
            } else {
                scratch.iter_mut().enumerate().for_each(face_flux);
            }
        }
        #[cfg(not(feature = "parallel"))]
        {
            let _ = parallel;
            scratch.iter_mut().enumerate().for_each(face_flux);
        }

        self.fluxes.commit();
    }

    /// Phase 2: advance every real head from the committed fluxes.
    ///
    /// `Δh = dt/dx (q_left - q_right + q_bottom - q_top) + rate dt`, where the
    /// source part is limited so a sink never drains below the bed. A NaN
    /// change in any cell makes the residual NaN.
    pub fn update_heads(&mut self, dt: f64, source: Option<&dyn CellSource>, time: f64) -> HeadUpdate {
        self.sweep_heads(dt, source, time, cfg!(feature = "parallel"))
    }

    fn sweep_heads(&mut self, dt: f64, source: Option<&dyn CellSource>, time: f64, parallel: bool) -> HeadUpdate {
        let factor = dt / self.dx;
        let flux = self.fluxes.committed();
        let cell_faces = &self.cell_faces;
        let z = &self.nodes.z;

        let cell_update = |(c, h): (usize, &mut f64)| -> (f64, f64) {
            let faces = &cell_faces[c];
            let mut dh = factor * (flux[faces.left] - flux[faces.right] + flux[faces.bottom] - flux[faces.top]);
            let mut added = 0.0;
            if let Some(source) = source {
                let depth = *h + dh - z[c];
                added = (source.rate(CellIndex::new(c), time) * dt).max(-depth.max(0.0));
                dh += added;
            }
            *h += dh;
            (dh.abs(), added)
        };

        let combine = |a: (f64, f64), b: (f64, f64)| (nan_max(a.0, b.0), a.1 + b.1);

        #[cfg(feature = "parallel")]
        let (residual, source_volume) = {
            use rayon::prelude::*;
            if parallel {
                self.nodes
                    .h
                    .par_iter_mut()
                    .enumerate()
                    .map(cell_update)
                    .reduce(|| (0.0, 0.0), combine)
            } else {
                self.nodes.h.iter_mut().enumerate().map(cell_update).fold((0.0, 0.0), combine)
            }
        };
        #[cfg(not(feature = "parallel"))]
        let (residual, source_volume) = {
            let _ = parallel;
            self.nodes.h.iter_mut().enumerate().map(cell_update).fold((0.0, 0.0), combine)
        };

        HeadUpdate {
            residual,
            source_volume,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Uniform cell width.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn n_cells(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_faces(&self) -> usize {
        self.roles.len()
    }

    /// Real-node store.
    pub fn nodes(&self) -> &NodeState {
        &self.nodes
    }

    /// Current head of every real cell.
    pub fn heads(&self) -> &[f64] {
        &self.nodes.h
    }

    /// Committed flux of every face.
    pub fn fluxes(&self) -> &[f64] {
        self.fluxes.committed()
    }

    pub fn flux(&self, face: FaceIndex) -> f64 {
        self.fluxes.get(face)
    }

    pub fn cell_faces(&self, cell: CellIndex) -> CellFaces {
        self.cell_faces[cell]
    }

    pub fn face_neighbours(&self, face: FaceIndex) -> [Option<CellIndex>; 2] {
        self.face_neighbours[face]
    }

    pub fn role(&self, face: FaceIndex) -> FaceRole {
        self.roles[face]
    }

    /// Interior face units, one per face with two real neighbours.
    pub fn units(&self) -> &[FaceUpdateUnit] {
        &self.units
    }

    /// Faces owned by a prescribed-head or prescribed-flux condition.
    pub fn n_open_boundaries(&self) -> usize {
        self.roles.iter().filter(|r| r.is_open_boundary()).count()
    }

    pub fn boundaries(&self) -> &GhostBoundaryRegistry {
        &self.boundaries
    }

    /// Total stored water, Σ max(h - z, 0) over real cells.
    pub fn stored_volume(&self) -> f64 {
        self.nodes.stored_volume()
    }

    /// Net flux into the domain through open boundary faces (per unit width).
    pub fn boundary_inflow(&self) -> f64 {
        self.boundaries.inflow(self.fluxes.committed())
    }
}

/// Maximum that keeps NaN instead of dropping it.
fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.max(b) }
}

fn required_field(field: CellField, values: &[f64], n_cells: usize) -> Result<Vec<f64>, ConfigError> {
    for (position, &value) in values.iter().take(n_cells).enumerate() {
        let cell = CellIndex::new(position);
        if value.is_nan() {
            return Err(ConfigError::MissingCellValue { field, cell });
        }
        if value.is_infinite() {
            return Err(ConfigError::InvalidCellValue {
                field,
                cell,
                value,
                reason: "must be finite",
            });
        }
    }
    if values.len() < n_cells {
        return Err(ConfigError::MissingCellValue {
            field,
            cell: CellIndex::new(values.len()),
        });
    }
    if values.len() > n_cells {
        return Err(ConfigError::InputLength {
            field,
            expected: n_cells,
            actual: values.len(),
        });
    }
    Ok(values.to_vec())
}

fn check_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}

/// In-line and orthogonal faces for a face between `lo` (side 0) and `hi` (side 1).
fn interior_stencil(primary: bool, lo: &CellFaces, hi: &CellFaces) -> UnitStencil {
    if primary {
        UnitStencil::Interior {
            inline: [lo.left, hi.right],
            orth: [lo.bottom, lo.top, hi.bottom, hi.top],
        }
    } else {
        UnitStencil::Interior {
            inline: [lo.bottom, hi.top],
            orth: [lo.left, lo.right, hi.left, hi.right],
        }
    }
}

/// Side 0 must be the low-coordinate cell and both cells must list the face
/// on the matching sides.
fn check_orientation<T: GridTopology + ?Sized>(
    topology: &T,
    face: FaceIndex,
    primary: bool,
    lo: CellIndex,
    hi: CellIndex,
    cell_faces: &[CellFaces],
) -> Result<(), ConfigError> {
    let (lo_face, hi_face) = if primary {
        (cell_faces[lo].right, cell_faces[hi].left)
    } else {
        (cell_faces[lo].top, cell_faces[hi].bottom)
    };
    if lo_face != face || hi_face != face {
        return Err(ConfigError::InconsistentTopology {
            face,
            reason: format!("cells {} and {} do not share it on facing sides", lo, hi),
        });
    }

    let dx = topology.cell_width();
    let (x0, y0) = topology.cell_centre(lo);
    let (x1, y1) = topology.cell_centre(hi);
    let (along, across) = if primary { (x1 - x0, y1 - y0) } else { (y1 - y0, x1 - x0) };
    let tol = 1e-6 * dx;
    if (along - dx).abs() > tol || across.abs() > tol {
        return Err(ConfigError::InconsistentTopology {
            face,
            reason: "neighbour centres are not one cell apart along the face normal".to_string(),
        });
    }
    Ok(())
}
