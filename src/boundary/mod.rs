//! Boundary conditions for the local inertial solver.
//!
//! | Boundary | Realisation |
//! |----------|-------------|
//! | Closed (default) | Face keeps zero flux ([`FaceRole::Wall`]) |
//! | Prescribed head | Ghost node behind the face, ordinary kernel ([`GhostBoundaryRegistry`]) |
//! | Prescribed flux | Caller-set face flux, skipped by the sweep ([`FaceRole::PrescribedFlux`]) |
//!
//! Every boundary condition needs a face with exactly one real neighbour.

mod ghost;
mod roles;

pub use ghost::{GhostBoundaryRegistry, GhostNode};
pub use roles::FaceRole;

use crate::error::ConfigError;
use crate::types::{CellIndex, FaceIndex};

/// The single present neighbour of a boundary face and the side it occupies.
pub fn single_neighbour(
    face: FaceIndex,
    neighbours: [Option<CellIndex>; 2],
) -> Result<(CellIndex, usize), ConfigError> {
    match neighbours {
        [Some(cell), None] => Ok((cell, 0)),
        [None, Some(cell)] => Ok((cell, 1)),
        [None, None] => Err(ConfigError::BoundaryNeighbours { face, present: 0 }),
        [Some(_), Some(_)] => Err(ConfigError::BoundaryNeighbours { face, present: 2 }),
    }
}
