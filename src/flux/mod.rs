//! Face flux computation.
//!
//! - [`lia_flux`]: the local inertial kernel, a pure function of prior state
//! - [`FaceUpdateUnit`]: per-face index record feeding the kernel

mod lia;
mod unit;

pub use lia::{LiaParams, Transverse, lia_flux};
pub use unit::{FaceUpdateUnit, UnitStencil};
