//! Error types for domain configuration and solving.

use thiserror::Error;

use crate::types::{CellIndex, FaceIndex};

/// Per-cell input field, used to name the offending field in errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellField {
    Elevation,
    Head,
    Roughness,
}

impl std::fmt::Display for CellField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CellField::Elevation => "elevation",
            CellField::Head => "head",
            CellField::Roughness => "roughness",
        };
        f.write_str(name)
    }
}

/// Configuration errors, all raised before any iteration runs.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// An active cell has no value (or a nodata NaN) for a required field.
    #[error("Missing {field} value for active cell {cell}")]
    MissingCellValue { field: CellField, cell: CellIndex },

    /// An active cell has a value no physical input can take.
    #[error("Invalid {field} value {value} for active cell {cell}: {reason}")]
    InvalidCellValue {
        field: CellField,
        cell: CellIndex,
        value: f64,
        reason: &'static str,
    },

    /// An input vector does not cover every active cell.
    #[error("{field} input has {actual} values, expected {expected}")]
    InputLength {
        field: CellField,
        expected: usize,
        actual: usize,
    },

    /// A run-level parameter is out of range.
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A boundary condition needs exactly one present neighbour.
    #[error("Boundary condition on face {face} requires exactly one neighbour, found {present}")]
    BoundaryNeighbours { face: FaceIndex, present: usize },

    /// A prescribed-head boundary already exists on this face.
    #[error("Face {face} already has a prescribed-head boundary")]
    DuplicateHeadBoundary { face: FaceIndex },

    /// The face is already claimed by a boundary condition of another kind.
    #[error("Face {face} is already claimed by a {role} boundary")]
    FaceAlreadyClaimed { face: FaceIndex, role: &'static str },

    /// A ghost-head override targets a face without a ghost node.
    #[error("No ghost node registered at face {face}")]
    NoGhostNode { face: FaceIndex },

    /// A flux reset targets a face without a prescribed flux.
    #[error("No prescribed-flux boundary registered at face {face}")]
    NoFluxBoundary { face: FaceIndex },

    /// A face index outside the face table.
    #[error("Face {face} out of range (mesh has {n_faces} faces)")]
    FaceOutOfRange { face: FaceIndex, n_faces: usize },

    /// The grid definition itself is unusable.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// The topology contradicts itself (orientation or adjacency).
    #[error("Inconsistent topology at face {face}: {reason}")]
    InconsistentTopology { face: FaceIndex, reason: String },
}

/// Top-level error type.
#[derive(Debug, Error, PartialEq)]
pub enum LiaError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Steady-state iteration hit the iteration cap.
    #[error("Steady state not reached after {iterations} iterations (residual {residual:.3e})")]
    NotConverged { iterations: usize, residual: f64 },

    /// The state stopped being finite (time step or residual blew up).
    #[error("Solution diverged at iteration {iterations} (t = {time:.6e})")]
    Diverged { iterations: usize, time: f64 },

    /// Requested simulated duration is not a positive finite number.
    #[error("Invalid run duration: {0}")]
    InvalidDuration(f64),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LiaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::MissingCellValue {
            field: CellField::Roughness,
            cell: CellIndex::new(3),
        };
        assert_eq!(err.to_string(), "Missing roughness value for active cell C3");

        let err: LiaError = ConfigError::NoGhostNode {
            face: FaceIndex::new(9),
        }
        .into();
        assert_eq!(err.to_string(), "No ghost node registered at face F9");
    }

    #[test]
    fn test_not_converged_message() {
        let err = LiaError::NotConverged {
            iterations: 10,
            residual: 0.5,
        };
        assert!(err.to_string().contains("10 iterations"));
    }

    #[test]
    fn test_diverged_message() {
        let err = LiaError::Diverged {
            iterations: 42,
            time: 1.5,
        };
        assert!(err.to_string().contains("iteration 42"));
    }
}
