//! LIA solver components.
//!
//! # Submodules
//!
//! - [`state`]: Node and flux stores (NodeState, FluxState)
//! - [`domain`]: Assembled domain and the two update sweeps
//! - [`diagnostics`]: Velocity recovery, mass balance and snapshots

pub mod diagnostics;
pub mod domain;
pub mod state;

pub use diagnostics::{DomainDiagnostics, MassBalance, cell_velocity, velocities};
pub use domain::{CellInputs, HeadUpdate, LiaDomain};
pub use state::{FluxState, NodeRef, NodeState};
