//! Adaptive timestep from the gravity-wave stability limit.

use crate::constants::GRAVITY;
use crate::solver::state::NodeState;

/// Stable timestep for the current state.
///
/// `dt = alpha * dx / sqrt(g * d_max)` where `d_max` is the largest real-cell
/// depth, floored at `min_depth` so a dry domain still gets a finite step.
pub fn compute_dt(nodes: &NodeState, dx: f64, alpha: f64, min_depth: f64) -> f64 {
    let d_max = nodes.max_raw_depth().max(min_depth);
    alpha * dx / (GRAVITY * d_max).sqrt()
}

/// Cumulative simulated time with a landing clamp for fixed-duration runs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationClock {
    elapsed: f64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time advanced so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Shorten `dt` so the clock never passes `end`.
    pub fn clamp_to(&self, dt: f64, end: f64) -> f64 {
        dt.min(end - self.elapsed)
    }

    /// Advance by `dt`; lands exactly on `end` when the step reaches it.
    pub fn advance(&mut self, dt: f64, end: Option<f64>) {
        self.elapsed += dt;
        if let Some(end) = end
            && self.elapsed >= end
        {
            self.elapsed = end;
        }
    }

    /// True once the clock has reached `end`.
    pub fn reached(&self, end: f64) -> bool {
        self.elapsed >= end
    }
}
