//! Per-cell node store: bed elevation, head and roughness.

use crate::types::{CellIndex, GhostIndex};

/// Address of a node slot on a face.
///
/// Real nodes belong to mesh cells; ghost nodes belong to the boundary
/// registry and are never reached through cell indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Real(CellIndex),
    Ghost(GhostIndex),
}

impl NodeRef {
    /// The cell behind a real node.
    pub fn cell(self) -> Option<CellIndex> {
        match self {
            NodeRef::Real(c) => Some(c),
            NodeRef::Ghost(_) => None,
        }
    }

    pub fn is_ghost(self) -> bool {
        matches!(self, NodeRef::Ghost(_))
    }
}

/// Real-node store, one entry per active cell (struct-of-arrays).
///
/// `z` and `n` are fixed after construction; `h` is updated every iteration.
#[derive(Clone, Debug)]
pub struct NodeState {
    /// Bed elevation
    pub z: Vec<f64>,
    /// Water-surface head
    pub h: Vec<f64>,
    /// Manning roughness coefficient
    pub n: Vec<f64>,
}

impl NodeState {
    pub fn new(z: Vec<f64>, h: Vec<f64>, n: Vec<f64>) -> Self {
        debug_assert!(z.len() == h.len() && h.len() == n.len());
        Self { z, h, n }
    }

    /// Number of real nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.h.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.h.is_empty()
    }

    /// Water depth, possibly negative during iteration.
    #[inline]
    pub fn raw_depth(&self, cell: CellIndex) -> f64 {
        self.h[cell] - self.z[cell]
    }

    /// Water depth clamped at zero.
    #[inline]
    pub fn depth(&self, cell: CellIndex) -> f64 {
        self.raw_depth(cell).max(0.0)
    }

    /// Total stored water, Σ max(h - z, 0) over real nodes.
    pub fn stored_volume(&self) -> f64 {
        self.h
            .iter()
            .zip(&self.z)
            .map(|(h, z)| (h - z).max(0.0))
            .sum()
    }

    /// Largest raw depth over real nodes (`f64::NEG_INFINITY` when empty).
    pub fn max_raw_depth(&self) -> f64 {
        self.h
            .iter()
            .zip(&self.z)
            .map(|(h, z)| h - z)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}
