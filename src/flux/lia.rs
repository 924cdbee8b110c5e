//! Local inertial flux kernel.
//!
//! The momentum equation without advective acceleration, discretised on a
//! face:
//!
//! ```text
//! q_new = [θ q + (1-θ)(q_prev + q_next)/2 - g hf dt (h1 - h0)/dx]
//!         / [1 + g dt n² |q| / hf^(7/3)]
//! ```
//!
//! Friction is implicit (denominator), the water-surface slope explicit.
//! `hf = max(h0, h1) - zx` is the flow depth above the sill.
//!
//! # References
//! - Bates, Horritt & Fewtrell (2010), "A simple inertial formulation of the
//!   shallow water equations for efficient two-dimensional flood inundation
//!   modelling"
//! - de Almeida, Bates, Freer & Souvignet (2012), "Improving the stability of a
//!   simple formulation of the shallow water equations for 2-D flood modeling"

use crate::constants::{DRYING_THRESHOLD, FRICTION_DEPTH_EXPONENT, GRAVITY};

/// Run-level values shared by every face in one iteration.
#[derive(Clone, Copy, Debug)]
pub struct LiaParams {
    /// Temporal blending weight, 0 < θ ≤ 1
    pub theta: f64,
    /// Timestep
    pub dt: f64,
    /// Cell width
    pub dx: f64,
}

/// Neighbouring fluxes available to an interior face.
#[derive(Clone, Copy, Debug, Default)]
pub struct Transverse {
    /// Previous in-line flux (upstream face of neighbour 0)
    pub q_prev: f64,
    /// Next in-line flux (downstream face of neighbour 1)
    pub q_next: f64,
    /// Mean of the four orthogonal fluxes
    pub q_orth: f64,
}

/// Updated flux for one face.
///
/// `transverse` is `None` for ghost/boundary faces, which is the same as
/// θ = 1 with the orthogonal term dropped.
#[inline]
pub fn lia_flux(
    q: f64,
    h: [f64; 2],
    zx: f64,
    n2: f64,
    transverse: Option<Transverse>,
    params: &LiaParams,
) -> f64 {
    let hf = h[0].max(h[1]) - zx;
    if hf <= DRYING_THRESHOLD {
        return 0.0;
    }

    let slope = GRAVITY * hf * params.dt * (h[1] - h[0]) / params.dx;
    let (numerator, q_mag) = match transverse {
        Some(t) => (
            params.theta * q + (1.0 - params.theta) * 0.5 * (t.q_prev + t.q_next) - slope,
            q.hypot(t.q_orth),
        ),
        None => (q - slope, q.abs()),
    };

    numerator / (1.0 + GRAVITY * params.dt * n2 * q_mag / hf.powf(FRICTION_DEPTH_EXPONENT))
}
