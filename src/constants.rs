//! Physical and numerical constants.

/// Standard gravitational acceleration (m/s²).
pub const GRAVITY: f64 = 9.80665;

/// Interface depth at or below which a face carries no flux (m).
pub const DRYING_THRESHOLD: f64 = 1e-6;

/// Cells shallower than this fraction of the cell width report zero velocity.
pub const VELOCITY_DEPTH_FACTOR: f64 = 0.002;

/// Ghost-node bed sits this far below its real neighbour's bed (m).
pub const GHOST_BED_OFFSET: f64 = 1e-9;

/// Friction denominator exponent on interface depth (Manning, 7/3).
pub const FRICTION_DEPTH_EXPONENT: f64 = 7.0 / 3.0;
