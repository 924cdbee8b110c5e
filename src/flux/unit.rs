//! Precomputed per-face update records.

use super::lia::{LiaParams, Transverse, lia_flux};
use crate::solver::state::NodeRef;
use crate::types::FaceIndex;

/// Which neighbouring fluxes a face reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UnitStencil {
    /// Face between two real cells.
    Interior {
        /// [previous, next] along the face normal
        inline: [FaceIndex; 2],
        /// Transverse faces of both neighbour cells
        orth: [FaceIndex; 4],
    },
    /// Face between a real cell and a ghost node.
    Boundary,
}

/// Index record for one face: its own flux slot, its two node slots and the
/// constant geometry terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceUpdateUnit {
    pub face: FaceIndex,
    /// Node on side 0 and side 1 of the face
    pub nodes: [NodeRef; 2],
    /// Sill elevation, max(z0, z1)
    pub zx: f64,
    /// Friction term, mean(n0, n1)²
    pub n2: f64,
    pub stencil: UnitStencil,
}

impl FaceUpdateUnit {
    /// Build a unit from the bed elevation and roughness of both node slots.
    pub fn new(face: FaceIndex, nodes: [NodeRef; 2], z: [f64; 2], n: [f64; 2], stencil: UnitStencil) -> Self {
        let n_mean = 0.5 * (n[0] + n[1]);
        Self {
            face,
            nodes,
            zx: z[0].max(z[1]),
            n2: n_mean * n_mean,
            stencil,
        }
    }

    /// New flux from committed state.
    ///
    /// `flux` is the committed flux array; `heads` holds the two node heads.
    #[inline]
    pub fn update(&self, flux: &[f64], heads: [f64; 2], params: &LiaParams) -> f64 {
        let transverse = match self.stencil {
            UnitStencil::Interior { inline, orth } => Some(Transverse {
                q_prev: flux[inline[0]],
                q_next: flux[inline[1]],
                q_orth: 0.25 * orth.iter().map(|&f| flux[f]).sum::<f64>(),
            }),
            UnitStencil::Boundary => None,
        };
        lia_flux(flux[self.face], heads, self.zx, self.n2, transverse, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellIndex, GhostIndex};

    fn f(i: usize) -> FaceIndex {
        FaceIndex::new(i)
    }

    #[test]
    fn test_geometry_terms() {
        let unit = FaceUpdateUnit::new(
            f(0),
            [NodeRef::Real(CellIndex::new(0)), NodeRef::Real(CellIndex::new(1))],
            [0.2, 0.5],
            [0.02, 0.04],
            UnitStencil::Boundary,
        );
        assert_eq!(unit.zx, 0.5);
        assert!((unit.n2 - 0.0009).abs() < 1e-15);
    }

    #[test]
    fn test_interior_reads_stencil() {
        let unit = FaceUpdateUnit::new(
            f(1),
            [NodeRef::Real(CellIndex::new(0)), NodeRef::Real(CellIndex::new(1))],
            [0.0, 0.0],
            [0.0, 0.0],
            UnitStencil::Interior {
                inline: [f(0), f(2)],
                orth: [f(3), f(4), f(5), f(6)],
            },
        );
        let flux = [1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0];
        let params = LiaParams {
            theta: 0.5,
            dt: 0.1,
            dx: 1.0,
        };
        // Flat surface, frictionless: 0.5 * 2 + 0.5 * (1 + 3) / 2
        let q = unit.update(&flux, [1.0, 1.0], &params);
        assert!((q - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_boundary_ignores_theta() {
        let unit = FaceUpdateUnit::new(
            f(0),
            [NodeRef::Ghost(GhostIndex::new(0)), NodeRef::Real(CellIndex::new(0))],
            [0.0, 0.0],
            [0.0, 0.0],
            UnitStencil::Boundary,
        );
        let params = LiaParams {
            theta: 0.1,
            dt: 0.1,
            dx: 1.0,
        };
        let q = unit.update(&[4.0], [1.0, 1.0], &params);
        assert!((q - 4.0).abs() < 1e-12);
    }
}
