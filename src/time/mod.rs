//! Timestep control and simulated-time bookkeeping.

mod timestep;

pub use timestep::{SimulationClock, compute_dt};
