//! State stores mutated by the solver.
//!
//! - [`NodeState`]: per-cell elevation, head, roughness
//! - [`FluxState`]: per-face signed flux, double-buffered
//! - [`NodeRef`]: tagged address of a real or ghost node

mod fluxes;
mod nodes;

pub use fluxes::FluxState;
pub use nodes::{NodeRef, NodeState};
