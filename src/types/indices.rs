//! Strongly-typed index newtypes.
//!
//! These types prevent mixing up cell, face and ghost-node indices, which
//! all live in separate flat arrays.

use std::fmt;

/// Macro to generate index newtypes with common functionality.
macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Create a new index.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Get the raw index value.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// Create an iterator over [0, n) indices.
            pub fn iter(n: usize) -> impl Iterator<Item = $name> + ExactSizeIterator {
                (0..n).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize {
                idx.0
            }
        }

        impl<T> std::ops::Index<$name> for [T] {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for [T] {
            #[inline]
            fn index_mut(&mut self, idx: $name) -> &mut T {
                &mut self[idx.0]
            }
        }

        impl<T> std::ops::Index<$name> for Vec<T> {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for Vec<T> {
            #[inline]
            fn index_mut(&mut self, idx: $name) -> &mut T {
                &mut self[idx.0]
            }
        }
    };
}

define_index!(
    /// Index of an active cell in the mesh.
    ///
    /// Real nodes share this index: node `C3` is the node of cell 3.
    ///
    /// # Example
    ///
    /// ```
    /// use lia_rs::types::CellIndex;
    ///
    /// let cell = CellIndex::new(42);
    /// assert_eq!(cell.get(), 42);
    /// ```
    CellIndex,
    "C"
);

define_index!(
    /// Index of a face (cell edge) in the mesh face table.
    ///
    /// # Example
    ///
    /// ```
    /// use lia_rs::types::FaceIndex;
    ///
    /// let face = FaceIndex::new(10);
    /// assert_eq!(face.get(), 10);
    /// ```
    FaceIndex,
    "F"
);

define_index!(
    /// Index of a ghost node in the boundary registry.
    GhostIndex,
    "G"
);
