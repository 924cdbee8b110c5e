//! Solver loop and run modes.
//!
//! All three modes share one iteration: compute dt, sweep fluxes, sweep heads.
//! They differ only in when they stop and whether ghost heads are forced.

use std::time::Instant;

use log::{debug, info, trace, warn};

use super::config::LiaConfig;
use crate::error::{ConfigError, LiaError, Result};
use crate::flux::LiaParams;
use crate::solver::{DomainDiagnostics, HeadUpdate, LiaDomain, MassBalance, velocities};
use crate::source::CellSource;
use crate::time::{SimulationClock, compute_dt};
use crate::types::{FaceIndex, GhostIndex};

// =============================================================================
// Run Report
// =============================================================================

/// Where the solver loop is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SolverState {
    #[default]
    Idle,
    Stepping,
    Converged,
    TimeReached,
}

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Residual fell below the convergence threshold.
    Converged,
    /// Simulated time reached the requested duration.
    TimeReached,
}

/// Result of a run.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub termination: Termination,
    /// Iterations taken in this run.
    pub iterations: usize,
    /// Simulated time advanced in this run.
    pub simulated_time: f64,
    /// Residual of the last iteration.
    pub final_residual: f64,
    /// Minimum time step used.
    pub dt_min: f64,
    /// Maximum time step used.
    pub dt_max: f64,
    /// Total wall-clock time in seconds.
    pub wall_time: f64,
    pub mass_balance: MassBalance,
    /// Head of every real cell at the end of the run.
    pub heads: Vec<f64>,
}

#[derive(Clone, Copy, Debug)]
enum RunMode {
    Steady,
    FixedDuration(f64),
    Transient(f64),
}

impl RunMode {
    fn name(self) -> &'static str {
        match self {
            RunMode::Steady => "steady",
            RunMode::FixedDuration(_) => "fixed-duration",
            RunMode::Transient(_) => "transient",
        }
    }

    fn end(self) -> Option<f64> {
        match self {
            RunMode::Steady => None,
            RunMode::FixedDuration(end) | RunMode::Transient(end) => Some(end),
        }
    }
}

// =============================================================================
// Solver
// =============================================================================

/// Local inertial solver: a domain plus run configuration.
pub struct LiaSolver {
    domain: LiaDomain,
    config: LiaConfig,
    source: Option<Box<dyn CellSource>>,
    state: SolverState,
    /// Simulated time over every run so far
    total_time: f64,
}

impl LiaSolver {
    /// Wrap a built domain; fails if `config` is out of range.
    pub fn new(domain: LiaDomain, config: LiaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            domain,
            config,
            source: None,
            state: SolverState::Idle,
            total_time: 0.0,
        })
    }

    /// Add a per-cell source term applied in every head sweep.
    pub fn with_source<S: CellSource + 'static>(mut self, source: S) -> Self {
        debug!("Using source term: {}", source.name());
        self.source = Some(Box::new(source));
        self
    }

    pub fn domain(&self) -> &LiaDomain {
        &self.domain
    }

    pub fn into_domain(self) -> LiaDomain {
        self.domain
    }

    pub fn config(&self) -> &LiaConfig {
        &self.config
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    /// Simulated time accumulated over every run.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn heads(&self) -> &[f64] {
        self.domain.heads()
    }

    /// Velocity magnitude of every real cell.
    pub fn velocities(&self) -> Vec<f64> {
        velocities(&self.domain)
    }

    // =========================================================================
    // Boundary conditions
    // =========================================================================

    pub fn set_head_boundary(&mut self, face: FaceIndex, head: f64) -> std::result::Result<GhostIndex, ConfigError> {
        self.domain.set_head_boundary(face, head)
    }

    pub fn set_flux_boundary(&mut self, face: FaceIndex, magnitude: f64) -> std::result::Result<(), ConfigError> {
        self.domain.set_flux_boundary(face, magnitude)
    }

    pub fn clear_flux_boundary(&mut self, face: FaceIndex) -> std::result::Result<(), ConfigError> {
        self.domain.clear_flux_boundary(face)
    }

    pub fn set_ghost_head(&mut self, face: FaceIndex, head: f64) -> std::result::Result<(), ConfigError> {
        self.domain.set_ghost_head(face, head)
    }

    // =========================================================================
    // Run modes
    // =========================================================================

    /// Iterate until max |Δh| falls below the convergence threshold.
    ///
    /// Returns [`LiaError::NotConverged`] after `max_iterations`; the domain
    /// keeps the last state. Every mode returns [`LiaError::Diverged`] once
    /// the time step or the residual stops being finite.
    pub fn run_steady(&mut self) -> Result<RunReport> {
        self.run(RunMode::Steady, |_| Vec::new())
    }

    /// Advance exactly `duration` of simulated time.
    pub fn run_for(&mut self, duration: f64) -> Result<RunReport> {
        check_duration(duration)?;
        self.run(RunMode::FixedDuration(duration), |_| Vec::new())
    }

    /// Advance exactly `duration`, forcing ghost heads before every iteration.
    ///
    /// `forcing` receives the simulated time elapsed in this run and returns
    /// `(face, head)` pairs applied to the ghost nodes at those faces.
    pub fn run_transient<F>(&mut self, duration: f64, forcing: F) -> Result<RunReport>
    where
        F: FnMut(f64) -> Vec<(FaceIndex, f64)>,
    {
        check_duration(duration)?;
        self.run(RunMode::Transient(duration), forcing)
    }

    fn run<F>(&mut self, mode: RunMode, mut forcing: F) -> Result<RunReport>
    where
        F: FnMut(f64) -> Vec<(FaceIndex, f64)>,
    {
        let start_wall = Instant::now();
        let end = mode.end();

        self.state = SolverState::Stepping;
        let mut clock = SimulationClock::new();
        let mut balance = MassBalance::new(self.domain.stored_volume());
        let mut iterations = 0;
        let mut residual: f64;
        let mut dt_min_used = f64::INFINITY;
        let mut dt_max_used: f64 = 0.0;

        info!(
            "Starting {} run: {} cells, {} open boundary faces ({} ghost), initial volume {:.6e}",
            mode.name(),
            self.domain.n_cells(),
            self.domain.n_open_boundaries(),
            self.domain.boundaries().len(),
            balance.initial
        );

        let termination = loop {
            if let RunMode::Transient(_) = mode {
                for (face, head) in forcing(clock.elapsed()) {
                    if let Err(err) = self.domain.set_ghost_head(face, head) {
                        self.stop_early(&clock, &mut balance);
                        return Err(err.into());
                    }
                }
            }

            let mut dt = compute_dt(
                self.domain.nodes(),
                self.domain.dx(),
                self.config.alpha,
                self.config.min_depth,
            );
            if let Some(dt_max) = self.config.dt_max {
                dt = dt.min(dt_max);
            }
            if !(dt.is_finite() && dt > 0.0) {
                return Err(self.diverged(iterations, &clock, &mut balance, "time step", dt));
            }
            if let Some(end) = end {
                dt = clock.clamp_to(dt, end);
            }

            let (update, inflow) = self.iterate(dt, clock.elapsed());
            balance.boundary_inflow += inflow;
            balance.source += update.source_volume;
            residual = update.residual;

            clock.advance(dt, end);
            iterations += 1;
            if !residual.is_finite() {
                return Err(self.diverged(iterations, &clock, &mut balance, "residual", residual));
            }
            dt_min_used = dt_min_used.min(dt);
            dt_max_used = dt_max_used.max(dt);

            trace!(
                "Iteration {}: t = {:.6}, dt = {:.3e}, residual = {:.3e}",
                iterations,
                clock.elapsed(),
                dt,
                residual
            );
            if self.config.log_interval > 0 && iterations % self.config.log_interval == 0 {
                debug!(
                    "Iteration {}: t = {:.4} {}",
                    iterations,
                    clock.elapsed(),
                    DomainDiagnostics::compute(&self.domain, residual).summary_line()
                );
            }

            match end {
                Some(end) if clock.reached(end) => break Termination::TimeReached,
                Some(_) => {}
                None if residual < self.config.convergence_threshold => break Termination::Converged,
                None if iterations >= self.config.max_iterations => {
                    self.stop_early(&clock, &mut balance);
                    warn!(
                        "Steady run stopped after {} iterations, residual {:.3e}",
                        iterations, residual
                    );
                    return Err(LiaError::NotConverged {
                        iterations,
                        residual,
                    });
                }
                None => {}
            }
        };

        self.total_time += clock.elapsed();
        self.state = match termination {
            Termination::Converged => SolverState::Converged,
            Termination::TimeReached => SolverState::TimeReached,
        };
        self.check_mass_balance(&mut balance);

        let wall_time = start_wall.elapsed().as_secs_f64();
        info!(
            "Finished {} run: {} iterations, t = {:.4}, residual {:.3e}, volume {:.6e} -> {:.6e}, wall {:.2}s",
            mode.name(),
            iterations,
            clock.elapsed(),
            residual,
            balance.initial,
            balance.final_volume,
            wall_time
        );

        Ok(RunReport {
            termination,
            iterations,
            simulated_time: clock.elapsed(),
            final_residual: residual,
            dt_min: dt_min_used,
            dt_max: dt_max_used,
            wall_time,
            mass_balance: balance,
            heads: self.domain.heads().to_vec(),
        })
    }

    /// One iteration; returns the head update and the boundary inflow volume.
    fn iterate(&mut self, dt: f64, time: f64) -> (HeadUpdate, f64) {
        let dx = self.domain.dx();
        let params = LiaParams {
            theta: self.config.theta,
            dt,
            dx,
        };
        self.domain.update_fluxes(&params);
        let inflow = self.domain.boundary_inflow() * dt / dx;
        let update = self.domain.update_heads(dt, self.source.as_deref(), time);
        (update, inflow)
    }

    /// Book the partial run before returning an error.
    fn stop_early(&mut self, clock: &SimulationClock, balance: &mut MassBalance) {
        self.total_time += clock.elapsed();
        self.state = SolverState::Idle;
        self.check_mass_balance(balance);
    }

    fn diverged(
        &mut self,
        iterations: usize,
        clock: &SimulationClock,
        balance: &mut MassBalance,
        what: &str,
        value: f64,
    ) -> LiaError {
        self.stop_early(clock, balance);
        warn!(
            "Run diverged after {} iterations at t = {:.6e}: {} is {}",
            iterations,
            clock.elapsed(),
            what,
            value
        );
        LiaError::Diverged {
            iterations,
            time: clock.elapsed(),
        }
    }

    fn check_mass_balance(&self, balance: &mut MassBalance) {
        balance.final_volume = self.domain.stored_volume();
        if balance.exceeds(self.config.mass_balance_tolerance) {
            warn!(
                "Mass balance error {:.3e} exceeds tolerance {:.1e} (volume {:.6e} -> {:.6e}, inflow {:.6e}, source {:.6e})",
                balance.relative_error(),
                self.config.mass_balance_tolerance,
                balance.initial,
                balance.final_volume,
                balance.boundary_inflow,
                balance.source
            );
        }
    }
}

fn check_duration(duration: f64) -> Result<()> {
    if duration.is_finite() && duration > 0.0 {
        Ok(())
    } else {
        Err(LiaError::InvalidDuration(duration))
    }
}
