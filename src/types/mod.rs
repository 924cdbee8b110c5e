//! Strongly-typed domain types for safer APIs.
//!
//! - **Newtypes prevent mix-ups**: a `CellIndex` cannot be passed where a
//!   `FaceIndex` is expected
//! - **Named fields over positional**: `CellFaces { left, right, bottom, top }`
//!
//! # Example
//!
//! ```
//! use lia_rs::types::{CellFaces, FaceIndex, Side};
//!
//! let faces = CellFaces::new(
//!     FaceIndex::new(0),
//!     FaceIndex::new(1),
//!     FaceIndex::new(7),
//!     FaceIndex::new(8),
//! );
//! assert_eq!(faces.get(Side::Right), FaceIndex::new(1));
//! ```

mod indices;
mod sides;

pub use indices::{CellIndex, FaceIndex, GhostIndex};
pub use sides::{CellFaces, Side};
