//! What each face does during the flux sweep.

use crate::types::GhostIndex;

/// Role of a face in the flux update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceRole {
    /// No real neighbour; flux is permanently zero.
    Inert,
    /// Domain edge with one real neighbour and no boundary condition (closed).
    Wall,
    /// Both neighbours real; index into the interior unit table.
    Interior(usize),
    /// Prescribed head through a ghost node.
    PrescribedHead(GhostIndex),
    /// Prescribed flux; the committed value is left as set by the caller.
    PrescribedFlux,
}

impl FaceRole {
    /// Short name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            FaceRole::Inert => "inert",
            FaceRole::Wall => "wall",
            FaceRole::Interior(_) => "interior",
            FaceRole::PrescribedHead(_) => "prescribed-head",
            FaceRole::PrescribedFlux => "prescribed-flux",
        }
    }

    /// True if a boundary condition owns this face.
    pub fn is_open_boundary(self) -> bool {
        matches!(self, FaceRole::PrescribedHead(_) | FaceRole::PrescribedFlux)
    }
}
