//! Read-only face/cell adjacency consumed by the solver.

use crate::types::{CellFaces, CellIndex, FaceIndex};

/// Cell and face adjacency of a uniform rectangular grid.
///
/// Sign convention: a face's neighbour 0 lies on the low-coordinate side
/// (left for primary-axis faces, below for the others), neighbour 1 on the
/// high-coordinate side. Positive flux runs from neighbour 0 to neighbour 1.
pub trait GridTopology {
    /// Number of active cells.
    fn n_cells(&self) -> usize;

    /// Number of faces, including faces with no active neighbour.
    fn n_faces(&self) -> usize;

    /// The four faces of a cell.
    fn cell_faces(&self, cell: CellIndex) -> CellFaces;

    /// Neighbour cells of a face; `None` marks an absent neighbour.
    fn face_neighbours(&self, face: FaceIndex) -> [Option<CellIndex>; 2];

    /// True if the face normal lies along the primary (x) axis.
    fn face_is_primary_axis(&self, face: FaceIndex) -> bool;

    /// Uniform cell width.
    fn cell_width(&self) -> f64;

    /// Cell centre coordinates.
    fn cell_centre(&self, cell: CellIndex) -> (f64, f64);

    /// Number of present neighbours of a face.
    fn present_neighbours(&self, face: FaceIndex) -> usize {
        self.face_neighbours(face)
            .iter()
            .filter(|n| n.is_some())
            .count()
    }
}
