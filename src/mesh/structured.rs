//! Structured raster grid with an optional active-cell mask.
//!
//! Face numbering:
//! - Primary-axis (x) faces first: face `j * (nx + 1) + i` is the vertical
//!   line left of raster column `i` in row `j`
//! - Then secondary-axis (y) faces: face `n_x_faces + j * nx + i` is the
//!   horizontal line below raster column `i` in row `j`
//!
//! Inactive raster cells produce no cell. Faces touching them lose that
//! neighbour, and faces between two inactive cells keep no neighbour at all.

use super::topology::GridTopology;
use crate::error::ConfigError;
use crate::types::{CellFaces, CellIndex, FaceIndex, Side};

/// Rectangular raster of square cells.
#[derive(Clone, Debug)]
pub struct StructuredGrid {
    /// Raster columns
    pub nx: usize,
    /// Raster rows
    pub ny: usize,
    /// Cell width
    pub dx: f64,
    /// Lower-left corner of the raster
    pub origin: (f64, f64),
    /// Raster position (i, j) of each active cell
    cell_ij: Vec<(usize, usize)>,
    /// Active cell at each raster position, row-major
    raster_to_cell: Vec<Option<CellIndex>>,
    cell_faces: Vec<CellFaces>,
    face_neighbours: Vec<[Option<CellIndex>; 2]>,
    n_x_faces: usize,
}

impl StructuredGrid {
    /// Create a fully active `nx × ny` grid of width-`dx` cells.
    pub fn new(nx: usize, ny: usize, dx: f64) -> Result<Self, ConfigError> {
        Self::with_mask(nx, ny, dx, vec![true; nx * ny])
    }

    /// Create a grid where only cells with `mask[j * nx + i] == true` are active.
    pub fn with_mask(nx: usize, ny: usize, dx: f64, mask: Vec<bool>) -> Result<Self, ConfigError> {
        if nx == 0 || ny == 0 {
            return Err(ConfigError::InvalidGrid(format!(
                "need at least one cell in each direction, got {}x{}",
                nx, ny
            )));
        }
        if !(dx.is_finite() && dx > 0.0) {
            return Err(ConfigError::InvalidGrid(format!(
                "cell width must be positive, got {}",
                dx
            )));
        }
        if mask.len() != nx * ny {
            return Err(ConfigError::InvalidGrid(format!(
                "mask has {} entries, expected {}",
                mask.len(),
                nx * ny
            )));
        }

        let mut cell_ij = Vec::new();
        let mut raster_to_cell = vec![None; nx * ny];
        for j in 0..ny {
            for i in 0..nx {
                if mask[j * nx + i] {
                    raster_to_cell[j * nx + i] = Some(CellIndex::new(cell_ij.len()));
                    cell_ij.push((i, j));
                }
            }
        }

        let n_x_faces = (nx + 1) * ny;
        let n_y_faces = nx * (ny + 1);
        let at = |i: isize, j: isize| -> Option<CellIndex> {
            if i < 0 || j < 0 || i as usize >= nx || j as usize >= ny {
                None
            } else {
                raster_to_cell[j as usize * nx + i as usize]
            }
        };

        let mut face_neighbours = Vec::with_capacity(n_x_faces + n_y_faces);
        for j in 0..ny as isize {
            for i in 0..=nx as isize {
                face_neighbours.push([at(i - 1, j), at(i, j)]);
            }
        }
        for j in 0..=ny as isize {
            for i in 0..nx as isize {
                face_neighbours.push([at(i, j - 1), at(i, j)]);
            }
        }

        let x_face = |i: usize, j: usize| FaceIndex::new(j * (nx + 1) + i);
        let y_face = |i: usize, j: usize| FaceIndex::new(n_x_faces + j * nx + i);
        let cell_faces = cell_ij
            .iter()
            .map(|&(i, j)| CellFaces::new(x_face(i, j), x_face(i + 1, j), y_face(i, j), y_face(i, j + 1)))
            .collect();

        Ok(Self {
            nx,
            ny,
            dx,
            origin: (0.0, 0.0),
            cell_ij,
            raster_to_cell,
            cell_faces,
            face_neighbours,
            n_x_faces,
        })
    }

    /// Place the lower-left raster corner at `(x0, y0)`.
    pub fn with_origin(mut self, x0: f64, y0: f64) -> Self {
        self.origin = (x0, y0);
        self
    }

    /// Active cell at raster position `(i, j)`, if any.
    pub fn cell_at(&self, i: usize, j: usize) -> Option<CellIndex> {
        if i >= self.nx || j >= self.ny {
            return None;
        }
        self.raster_to_cell[j * self.nx + i]
    }

    /// Raster position of an active cell.
    pub fn cell_position(&self, cell: CellIndex) -> (usize, usize) {
        self.cell_ij[cell]
    }

    /// Face on the given side of the cell at raster position `(i, j)`.
    ///
    /// Works for inactive raster positions too, which is how callers reach
    /// faces that have no active neighbour.
    pub fn face_at(&self, i: usize, j: usize, side: Side) -> Option<FaceIndex> {
        if i >= self.nx || j >= self.ny {
            return None;
        }
        let face = match side {
            Side::Left => j * (self.nx + 1) + i,
            Side::Right => j * (self.nx + 1) + i + 1,
            Side::Bottom => self.n_x_faces + j * self.nx + i,
            Side::Top => self.n_x_faces + (j + 1) * self.nx + i,
        };
        Some(FaceIndex::new(face))
    }

    /// Cell values laid out row-major over the full raster, `fill` where inactive.
    pub fn to_raster(&self, values: &[f64], fill: f64) -> Vec<f64> {
        self.raster_to_cell
            .iter()
            .map(|&c| c.and_then(|c| values.get(c.get()).copied()).unwrap_or(fill))
            .collect()
    }
}

impl GridTopology for StructuredGrid {
    fn n_cells(&self) -> usize {
        self.cell_ij.len()
    }

    fn n_faces(&self) -> usize {
        self.face_neighbours.len()
    }

    fn cell_faces(&self, cell: CellIndex) -> CellFaces {
        self.cell_faces[cell]
    }

    fn face_neighbours(&self, face: FaceIndex) -> [Option<CellIndex>; 2] {
        self.face_neighbours[face]
    }

    fn face_is_primary_axis(&self, face: FaceIndex) -> bool {
        face.get() < self.n_x_faces
    }

    fn cell_width(&self) -> f64 {
        self.dx
    }

    fn cell_centre(&self, cell: CellIndex) -> (f64, f64) {
        let (i, j) = self.cell_ij[cell];
        (
            self.origin.0 + (i as f64 + 0.5) * self.dx,
            self.origin.1 + (j as f64 + 0.5) * self.dx,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_counts() {
        let grid = StructuredGrid::new(3, 2, 1.0).unwrap();
        assert_eq!(grid.n_cells(), 6);
        // (nx+1)*ny + nx*(ny+1)
        assert_eq!(grid.n_faces(), 4 * 2 + 3 * 3);
    }

    #[test]
    fn test_row_adjacency() {
        let grid = StructuredGrid::new(3, 1, 1.0).unwrap();
        let c0 = grid.cell_faces(CellIndex::new(0));
        let c1 = grid.cell_faces(CellIndex::new(1));

        // Shared face between cells 0 and 1
        assert_eq!(c0.right, c1.left);
        assert_eq!(
            grid.face_neighbours(c0.right),
            [Some(CellIndex::new(0)), Some(CellIndex::new(1))]
        );
        assert!(grid.face_is_primary_axis(c0.right));

        // Domain boundary faces have one neighbour
        assert_eq!(grid.face_neighbours(c0.left), [None, Some(CellIndex::new(0))]);
        assert_eq!(grid.present_neighbours(c0.bottom), 1);
        assert!(!grid.face_is_primary_axis(c0.top));
    }

    #[test]
    fn test_column_adjacency() {
        let grid = StructuredGrid::new(1, 2, 2.0).unwrap();
        let lower = grid.cell_faces(CellIndex::new(0));
        let upper = grid.cell_faces(CellIndex::new(1));
        assert_eq!(lower.top, upper.bottom);
        assert_eq!(
            grid.face_neighbours(lower.top),
            [Some(CellIndex::new(0)), Some(CellIndex::new(1))]
        );
        assert_eq!(grid.cell_centre(CellIndex::new(1)), (1.0, 3.0));
    }

    #[test]
    fn test_mask_drops_cells() {
        // Middle cell of a 3x1 row inactive
        let grid = StructuredGrid::with_mask(3, 1, 1.0, vec![true, false, true]).unwrap();
        assert_eq!(grid.n_cells(), 2);
        assert_eq!(grid.cell_at(1, 0), None);
        assert_eq!(grid.cell_at(2, 0), Some(CellIndex::new(1)));

        // Top face of the inactive cell has no neighbour at all
        let face = grid.face_at(1, 0, Side::Top).unwrap();
        assert_eq!(grid.present_neighbours(face), 0);

        let raster = grid.to_raster(&[1.0, 3.0], f64::NAN);
        assert_eq!(raster[0], 1.0);
        assert!(raster[1].is_nan());
        assert_eq!(raster[2], 3.0);
    }

    #[test]
    fn test_invalid_grid() {
        assert!(StructuredGrid::new(0, 2, 1.0).is_err());
        assert!(StructuredGrid::new(2, 2, -1.0).is_err());
        assert!(StructuredGrid::with_mask(2, 2, 1.0, vec![true; 3]).is_err());
    }
}
