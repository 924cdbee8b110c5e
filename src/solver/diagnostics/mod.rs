//! Runtime diagnostics.
//!
//! - [`cell_velocity`] / [`velocities`]: velocity recovered from face fluxes
//! - [`MassBalance`]: water budget over a run
//! - [`DomainDiagnostics`]: one-line domain snapshot

mod diagnostics;

pub use diagnostics::{DomainDiagnostics, MassBalance, cell_velocity, velocities};
