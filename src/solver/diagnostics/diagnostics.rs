//! Runtime diagnostics for the local inertial solver.
//!
//! Provides:
//! - Per-cell velocity recovered from face fluxes
//! - Mass-balance accounting over a run
//! - A one-line domain snapshot for progress logging
//!
//! # Example
//!
//! ```ignore
//! use lia_rs::solver::{DomainDiagnostics, velocities};
//!
//! let diag = DomainDiagnostics::compute(&domain, residual);
//! log::debug!("{}", diag.summary_line());
//! let speed = velocities(&domain);
//! ```

use crate::constants::{DRYING_THRESHOLD, VELOCITY_DEPTH_FACTOR};
use crate::solver::domain::LiaDomain;
use crate::types::CellIndex;

/// Velocity magnitude of one cell.
///
/// Averages opposite face fluxes into a cell-centred unit discharge and
/// divides by depth. Cells no deeper than `0.002 dx` report exactly 0.
pub fn cell_velocity(domain: &LiaDomain, cell: CellIndex) -> f64 {
    let depth = domain.nodes().depth(cell);
    if depth <= VELOCITY_DEPTH_FACTOR * domain.dx() {
        return 0.0;
    }
    let faces = domain.cell_faces(cell);
    let qx = 0.5 * (domain.flux(faces.left) + domain.flux(faces.right));
    let qy = 0.5 * (domain.flux(faces.bottom) + domain.flux(faces.top));
    qx.hypot(qy) / depth
}

/// Velocity magnitude of every real cell.
pub fn velocities(domain: &LiaDomain) -> Vec<f64> {
    CellIndex::iter(domain.n_cells())
        .map(|c| cell_velocity(domain, c))
        .collect()
}

/// Water budget over a run, in stored-depth units (Σ depth over cells).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MassBalance {
    /// Stored volume before the run
    pub initial: f64,
    /// Stored volume after the run
    pub final_volume: f64,
    /// Net water that entered through open boundary faces
    pub boundary_inflow: f64,
    /// Net water added by the source term
    pub source: f64,
}

impl MassBalance {
    pub fn new(initial: f64) -> Self {
        Self {
            initial,
            ..Self::default()
        }
    }

    /// Unexplained change in stored volume.
    pub fn imbalance(&self) -> f64 {
        self.final_volume - self.initial - self.boundary_inflow - self.source
    }

    /// Imbalance relative to the larger stored volume.
    ///
    /// Falls back to the absolute imbalance for a domain that is dry both
    /// before and after.
    pub fn relative_error(&self) -> f64 {
        let scale = self.initial.max(self.final_volume);
        if scale > 0.0 {
            self.imbalance().abs() / scale
        } else {
            self.imbalance().abs()
        }
    }

    /// True when the relative error is above `tolerance` or not finite.
    pub fn exceeds(&self, tolerance: f64) -> bool {
        let error = self.relative_error();
        !error.is_finite() || error > tolerance
    }
}

/// Snapshot of the domain state.
#[derive(Clone, Debug, PartialEq)]
pub struct DomainDiagnostics {
    /// Σ max(h - z, 0) over real cells
    pub stored_volume: f64,
    pub max_depth: f64,
    /// Cells with depth above the drying threshold
    pub wet_cells: usize,
    pub max_velocity: f64,
    /// Last head residual, max |Δh|
    pub residual: f64,
}

impl DomainDiagnostics {
    pub fn compute(domain: &LiaDomain, residual: f64) -> Self {
        let nodes = domain.nodes();
        let mut max_depth = 0.0_f64;
        let mut wet_cells = 0;
        let mut max_velocity = 0.0_f64;

        for c in CellIndex::iter(domain.n_cells()) {
            let depth = nodes.depth(c);
            max_depth = max_depth.max(depth);
            if depth > DRYING_THRESHOLD {
                wet_cells += 1;
                max_velocity = max_velocity.max(cell_velocity(domain, c));
            }
        }

        Self {
            stored_volume: nodes.stored_volume(),
            max_depth,
            wet_cells,
            max_velocity,
            residual,
        }
    }

    /// Format diagnostics as a single-line summary.
    pub fn summary_line(&self) -> String {
        format!(
            "V={:.6e} h_max={:.4} wet={} |u|_max={:.4} res={:.3e}",
            self.stored_volume, self.max_depth, self.wet_cells, self.max_velocity, self.residual
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::StructuredGrid;
    use crate::solver::domain::CellInputs;

    #[test]
    fn test_velocity_zero_when_shallow() {
        let grid = StructuredGrid::new(2, 1, 10.0).unwrap();
        // Threshold is 0.002 * 10 = 0.02
        let inputs = CellInputs::new(vec![0.0, 0.0], vec![0.02, 0.5], vec![0.03; 2]);
        let mut domain = LiaDomain::build(&grid, &inputs).unwrap();
        let right = domain.cell_faces(CellIndex::new(1)).right;
        domain.set_flux_boundary(right, 0.2).unwrap();

        assert_eq!(cell_velocity(&domain, CellIndex::new(0)), 0.0);
        // Only the right face carries flux: mean is 0.1, depth 0.5
        assert!((cell_velocity(&domain, CellIndex::new(1)) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_mass_balance_relative_error() {
        let balance = MassBalance {
            initial: 10.0,
            final_volume: 12.0,
            boundary_inflow: 1.5,
            source: 0.5,
        };
        assert!(balance.relative_error() < 1e-15);
        assert!(!balance.exceeds(1e-5));

        let drift = MassBalance {
            final_volume: 12.1,
            ..balance
        };
        assert!((drift.relative_error() - 0.1 / 12.1).abs() < 1e-12);
        assert!(drift.exceeds(1e-5));

        let dry = MassBalance::new(0.0);
        assert_eq!(dry.relative_error(), 0.0);

        let blown_up = MassBalance {
            final_volume: f64::NAN,
            ..balance
        };
        assert!(blown_up.exceeds(1e-5));
    }

    #[test]
    fn test_domain_snapshot() {
        let grid = StructuredGrid::new(3, 1, 1.0).unwrap();
        let inputs = CellInputs::new(vec![0.0, 0.0, 1.0], vec![0.5, 0.2, 0.5], vec![0.03; 3]);
        let domain = LiaDomain::build(&grid, &inputs).unwrap();
        let diag = DomainDiagnostics::compute(&domain, 1e-3);

        assert!((diag.stored_volume - 0.7).abs() < 1e-12);
        assert_eq!(diag.max_depth, 0.5);
        assert_eq!(diag.wet_cells, 2);
        assert_eq!(diag.max_velocity, 0.0);
        assert!(diag.summary_line().contains("wet=2"));
    }
}
