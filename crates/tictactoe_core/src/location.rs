//! Row/column addressing into the board grid.

use serde::{Deserialize, Serialize};

/// A cell address on an N×N board.
///
/// Both coordinates are zero-based. A location carries no dimension of its
/// own, so range checks happen against the board it is used with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Row, counted from the top.
    pub row: usize,
    /// Column, counted from the left.
    pub col: usize,
}

impl Location {
    /// Creates a location from a row and a column.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns true if both coordinates fall inside `[0, dimension)`.
    pub fn is_within(self, dimension: usize) -> bool {
        self.row < dimension && self.col < dimension
    }

    /// Row-major index of this location, or `None` when out of range.
    pub fn to_index(self, dimension: usize) -> Option<usize> {
        self.is_within(dimension).then(|| self.row * dimension + self.col)
    }

    /// Inverse of [`Location::to_index`].
    pub fn from_index(index: usize, dimension: usize) -> Option<Self> {
        if dimension == 0 || index >= dimension * dimension {
            return None;
        }
        Some(Self::new(index / dimension, index % dimension))
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
