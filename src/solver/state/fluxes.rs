//! Per-face flux store with a scratch buffer for Jacobi-style updates.

use crate::types::FaceIndex;

/// One signed scalar flux per face (discharge per unit width, m²/s).
///
/// Positive flux runs from a face's neighbour 0 to neighbour 1. New values
/// are written to `scratch` while `q` holds the committed state, then
/// [`FluxState::commit`] swaps the two.
#[derive(Clone, Debug)]
pub struct FluxState {
    q: Vec<f64>,
    scratch: Vec<f64>,
}

impl FluxState {
    /// All fluxes zero.
    pub fn zeros(n_faces: usize) -> Self {
        Self {
            q: vec![0.0; n_faces],
            scratch: vec![0.0; n_faces],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.q.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    /// Committed flux of one face.
    #[inline]
    pub fn get(&self, face: FaceIndex) -> f64 {
        self.q[face]
    }

    /// Overwrite a committed flux directly (boundary conditions only).
    #[inline]
    pub fn set(&mut self, face: FaceIndex, value: f64) {
        self.q[face] = value;
    }

    /// All committed fluxes.
    pub fn committed(&self) -> &[f64] {
        &self.q
    }

    /// Committed fluxes (read) and the scratch buffer (write) at once.
    pub fn split(&mut self) -> (&[f64], &mut [f64]) {
        (&self.q, &mut self.scratch)
    }

    /// Publish the scratch buffer as the new committed state.
    pub fn commit(&mut self) {
        std::mem::swap(&mut self.q, &mut self.scratch);
    }
}
