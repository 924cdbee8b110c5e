//! Solver runner.
//!
//! Ties the assembled domain to run configuration and exposes the three run
//! modes:
//! - [`LiaSolver::run_steady`]: iterate to a steady state
//! - [`LiaSolver::run_for`]: advance a fixed simulated duration
//! - [`LiaSolver::run_transient`]: fixed duration with time-varying ghost heads
//!
//! # Example
//! ```ignore
//! use lia_rs::mesh::StructuredGrid;
//! use lia_rs::simulation::{LiaConfig, LiaSolver};
//! use lia_rs::solver::{CellInputs, LiaDomain};
//!
//! let grid = StructuredGrid::new(3, 1, 1.0)?;
//! let inputs = CellInputs::new(vec![0.0; 3], vec![1.0, 0.5, 0.5], vec![0.03; 3]);
//! let domain = LiaDomain::build(&grid, &inputs)?;
//!
//! let mut solver = LiaSolver::new(domain, LiaConfig::default())?;
//! let report = solver.run_steady()?;
//! println!("converged in {} iterations", report.iterations);
//! ```

mod config;
mod runner;

pub use config::LiaConfig;
pub use runner::{LiaSolver, RunReport, SolverState, Termination};
