//! Mesh representation.
//!
//! The solver only sees the [`GridTopology`] trait. [`StructuredGrid`] is the
//! raster implementation used for regular DEM-style inputs.

mod structured;
mod topology;

pub use structured::StructuredGrid;
pub use topology::GridTopology;
