//! Ghost nodes for prescribed-head boundaries.
//!
//! Each prescribed-head face gets one ghost node standing in for the absent
//! neighbour. The ghost copies bed and roughness from its real neighbour
//! (bed lowered by [`GHOST_BED_OFFSET`]) and carries an externally controlled
//! head, so the ordinary kernel handles the boundary face.
//!
//! Ghosts are append-only: a face keeps its ghost for the life of the domain.

use std::collections::{BTreeMap, HashMap};

use crate::constants::GHOST_BED_OFFSET;
use crate::error::ConfigError;
use crate::flux::{FaceUpdateUnit, UnitStencil};
use crate::solver::state::NodeRef;
use crate::types::{CellIndex, FaceIndex, GhostIndex};

/// A synthetic node outside the domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostNode {
    /// Boundary face this ghost sits behind
    pub face: FaceIndex,
    /// Real neighbour across the face
    pub cell: CellIndex,
    pub z: f64,
    pub h: f64,
    pub n: f64,
}

/// Registry of ghost nodes, their boundary units and every open boundary face.
#[derive(Clone, Debug, Default)]
pub struct GhostBoundaryRegistry {
    ghosts: Vec<GhostNode>,
    units: Vec<FaceUpdateUnit>,
    by_face: HashMap<FaceIndex, GhostIndex>,
    /// Open faces with the sign that turns face flux into domain inflow
    inward: BTreeMap<FaceIndex, f64>,
}

impl GhostBoundaryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ghost nodes.
    pub fn len(&self) -> usize {
        self.ghosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ghosts.is_empty()
    }

    /// Append a ghost node behind `face` and build its boundary unit.
    ///
    /// `slot` is the side (0 or 1) of the face the real cell occupies; the
    /// ghost takes the other side.
    pub fn add_head(
        &mut self,
        face: FaceIndex,
        cell: CellIndex,
        slot: usize,
        z: f64,
        n: f64,
        head: f64,
    ) -> Result<GhostIndex, ConfigError> {
        if self.by_face.contains_key(&face) {
            return Err(ConfigError::DuplicateHeadBoundary { face });
        }

        let index = GhostIndex::new(self.ghosts.len());
        let ghost = GhostNode {
            face,
            cell,
            z: z - GHOST_BED_OFFSET,
            h: head,
            n,
        };

        let (nodes, zs) = if slot == 0 {
            ([NodeRef::Real(cell), NodeRef::Ghost(index)], [z, ghost.z])
        } else {
            ([NodeRef::Ghost(index), NodeRef::Real(cell)], [ghost.z, z])
        };
        let unit = FaceUpdateUnit::new(face, nodes, zs, [n, n], UnitStencil::Boundary);

        self.ghosts.push(ghost);
        self.units.push(unit);
        self.by_face.insert(face, index);
        self.inward.insert(face, inward_sign(slot));
        Ok(index)
    }

    /// Record a prescribed-flux face whose real cell occupies `slot`.
    pub(crate) fn add_flux(&mut self, face: FaceIndex, slot: usize) {
        self.inward.insert(face, inward_sign(slot));
    }

    /// Forget a prescribed-flux face.
    pub(crate) fn remove_flux(&mut self, face: FaceIndex) {
        self.inward.remove(&face);
    }

    /// Overwrite the head of the ghost node behind `face`.
    pub fn set_head(&mut self, face: FaceIndex, head: f64) -> Result<(), ConfigError> {
        let index = self
            .by_face
            .get(&face)
            .copied()
            .ok_or(ConfigError::NoGhostNode { face })?;
        self.ghosts[index.get()].h = head;
        Ok(())
    }

    /// Ghost node behind a face, if any.
    pub fn ghost_at(&self, face: FaceIndex) -> Option<GhostIndex> {
        self.by_face.get(&face).copied()
    }

    pub fn ghost(&self, index: GhostIndex) -> &GhostNode {
        &self.ghosts[index.get()]
    }

    #[inline]
    pub fn head(&self, index: GhostIndex) -> f64 {
        self.ghosts[index.get()].h
    }

    #[inline]
    pub fn unit(&self, index: GhostIndex) -> &FaceUpdateUnit {
        &self.units[index.get()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &GhostNode> {
        self.ghosts.iter()
    }

    /// Net flux into the domain through all open faces (per unit width).
    pub fn inflow(&self, flux: &[f64]) -> f64 {
        self.inward
            .iter()
            .map(|(&face, &sign)| sign * flux[face])
            .sum()
    }

    /// Sign converting face flux to domain inflow for an open face.
    pub fn inward_sign(&self, face: FaceIndex) -> Option<f64> {
        self.inward.get(&face).copied()
    }
}

/// Positive flux runs from side 0 to side 1, so it enters the domain when
/// the real cell sits on side 1.
fn inward_sign(slot: usize) -> f64 {
    if slot == 1 { 1.0 } else { -1.0 }
}
