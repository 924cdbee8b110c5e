//! Run-level solver configuration.

use crate::error::ConfigError;

/// Configuration for a solver run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LiaConfig {
    /// Flux blending weight θ in (0, 1]; 1 disables the neighbour average.
    pub theta: f64,
    /// Timestep safety factor α.
    pub alpha: f64,
    /// Steady runs stop once max |Δh| falls below this.
    pub convergence_threshold: f64,
    /// Iteration cap for steady runs.
    pub max_iterations: usize,
    /// Depth floor used by the timestep controller.
    pub min_depth: f64,
    /// Maximum time step (overrides the stability limit if smaller).
    pub dt_max: Option<f64>,
    /// Relative mass-balance error above which a run logs a warning.
    pub mass_balance_tolerance: f64,
    /// Iterations between progress log lines.
    pub log_interval: usize,
}

impl Default for LiaConfig {
    fn default() -> Self {
        Self {
            theta: 0.7,
            alpha: 0.5,
            convergence_threshold: 1e-9,
            max_iterations: 100_000,
            min_depth: 1e-4,
            dt_max: None,
            mass_balance_tolerance: 1e-5,
            log_interval: 1000,
        }
    }
}

impl LiaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flux blending weight θ.
    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    /// Set the timestep safety factor α.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_min_depth(mut self, min_depth: f64) -> Self {
        self.min_depth = min_depth;
        self
    }

    /// Set the maximum time step.
    pub fn with_dt_max(mut self, dt_max: f64) -> Self {
        self.dt_max = Some(dt_max);
        self
    }

    pub fn with_mass_balance_tolerance(mut self, tolerance: f64) -> Self {
        self.mass_balance_tolerance = tolerance;
        self
    }

    pub fn with_log_interval(mut self, interval: usize) -> Self {
        self.log_interval = interval;
        self
    }

    /// Check every parameter is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.theta > 0.0 && self.theta <= 1.0) {
            return Err(invalid("theta", self.theta, "must lie in (0, 1]"));
        }
        positive("alpha", self.alpha)?;
        positive("convergence_threshold", self.convergence_threshold)?;
        positive("min_depth", self.min_depth)?;
        positive("mass_balance_tolerance", self.mass_balance_tolerance)?;
        if let Some(dt_max) = self.dt_max {
            positive("dt_max", dt_max)?;
        }
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations", 0.0, "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: f64, reason: &'static str) -> ConfigError {
    ConfigError::InvalidParameter { name, value, reason }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(name, value, "must be positive and finite"))
    }
}
