//! Named cell sides.
//!
//! Every cell owns exactly four faces, always stored in the order
//! Left, Right, Bottom, Top. [`CellFaces`] gives those slots names so call
//! sites never depend on the array order.

use std::fmt;

use super::FaceIndex;

/// One of the four sides of a rectangular cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// x = x_min face
    Left,
    /// x = x_max face
    Right,
    /// y = y_min face
    Bottom,
    /// y = y_max face
    Top,
}

impl Side {
    /// All sides in storage order.
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Bottom, Side::Top];

    /// Position of this side in the four-face tuple.
    #[inline]
    pub const fn slot(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
            Side::Bottom => 2,
            Side::Top => 3,
        }
    }

    /// The opposite side.
    pub const fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Top => Side::Bottom,
        }
    }

    /// True for Left/Right faces, whose normal lies along the primary (x) axis.
    pub const fn is_primary_axis(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Top => "top",
        };
        f.write_str(name)
    }
}

/// The four face identifiers of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellFaces {
    pub left: FaceIndex,
    pub right: FaceIndex,
    pub bottom: FaceIndex,
    pub top: FaceIndex,
}

impl CellFaces {
    pub fn new(left: FaceIndex, right: FaceIndex, bottom: FaceIndex, top: FaceIndex) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    /// Face on the given side.
    #[inline]
    pub fn get(&self, side: Side) -> FaceIndex {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Top => self.top,
        }
    }

    /// Convert to array [left, right, bottom, top].
    pub fn to_array(self) -> [FaceIndex; 4] {
        [self.left, self.right, self.bottom, self.top]
    }

    /// Create from array [left, right, bottom, top].
    pub fn from_array([left, right, bottom, top]: [FaceIndex; 4]) -> Self {
        Self::new(left, right, bottom, top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_follow_storage_order() {
        for (i, side) in Side::ALL.iter().enumerate() {
            assert_eq!(side.slot(), i);
        }
    }

    #[test]
    fn test_opposite() {
        for side in Side::ALL {
            assert_eq!(side.opposite().opposite(), side);
            assert_eq!(side.opposite().is_primary_axis(), side.is_primary_axis());
        }
    }

    #[test]
    fn test_cell_faces_named_access() {
        let faces = CellFaces::from_array([
            FaceIndex::new(4),
            FaceIndex::new(5),
            FaceIndex::new(0),
            FaceIndex::new(2),
        ]);
        assert_eq!(faces.get(Side::Left), FaceIndex::new(4));
        assert_eq!(faces.get(Side::Top), FaceIndex::new(2));
        assert_eq!(faces.to_array()[Side::Bottom.slot()], FaceIndex::new(0));
    }
}
