//! # lia-rs
//!
//! A local inertial approximation (LIA) solver for 2D shallow water flow on
//! regular grids.
//!
//! This crate provides:
//! - Grid topology (structured rasters with inactive-cell masks)
//! - Typed node/face arenas with ghost nodes for prescribed-head boundaries
//! - The local inertial flux kernel with implicit Manning friction
//! - A two-phase Jacobi update, data-parallel with the `parallel` feature
//! - Steady, fixed-duration and transient run modes
//! - Velocity recovery and mass-balance diagnostics
//!
//! # Example
//!
//! ```
//! use lia_rs::{CellInputs, LiaConfig, LiaDomain, LiaSolver, StructuredGrid};
//!
//! let grid = StructuredGrid::new(3, 1, 1.0).unwrap();
//! let inputs = CellInputs::new(vec![0.0; 3], vec![1.0, 0.5, 0.5], vec![0.03; 3]);
//! let domain = LiaDomain::build(&grid, &inputs).unwrap();
//!
//! let mut solver = LiaSolver::new(domain, LiaConfig::default()).unwrap();
//! let report = solver.run_for(1.0).unwrap();
//! assert_eq!(report.simulated_time, 1.0);
//! ```

pub mod boundary;
pub mod constants;
pub mod error;
pub mod flux;
pub mod mesh;
pub mod simulation;
pub mod solver;
pub mod source;
pub mod time;
pub mod types;

pub use boundary::{FaceRole, GhostBoundaryRegistry, GhostNode};
pub use error::{CellField, ConfigError, LiaError, Result};
pub use flux::{FaceUpdateUnit, LiaParams, lia_flux};
pub use mesh::{GridTopology, StructuredGrid};
pub use simulation::{LiaConfig, LiaSolver, RunReport, SolverState, Termination};
pub use solver::{CellInputs, DomainDiagnostics, LiaDomain, MassBalance, cell_velocity, velocities};
pub use source::{CellRates, CellSource, UniformRate};
pub use time::{SimulationClock, compute_dt};
pub use types::{CellFaces, CellIndex, FaceIndex, GhostIndex, Side};
