//! Text positions and ranges
//!
//! Positions order row-major: row first, then column. A `TextRange` is
//! inclusive at both ends and always normalized so that `start <= end`.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell position in the terminal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextPosition {
    pub column: usize,
    pub row: usize,
}

impl TextPosition {
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Shift down by `rows` (view-relative to buffer-relative)
    pub fn offset_rows(self, rows: usize) -> Self {
        Self {
            column: self.column,
            row: self.row + rows,
        }
    }
}

impl Ord for TextPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.row, self.column).cmp(&(other.row, other.column))
    }
}

impl PartialOrd for TextPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.column, self.row)
    }
}

/// An inclusive, normalized range of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    start: TextPosition,
    end: TextPosition,
}

impl TextRange {
    /// Build a range from two corners in any order
    pub fn new(a: TextPosition, b: TextPosition) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn start(&self) -> TextPosition {
        self.start
    }

    pub fn end(&self) -> TextPosition {
        self.end
    }

    /// Check if the cell at (column, row) is within the range
    pub fn contains(&self, column: usize, row: usize) -> bool {
        let p = TextPosition::new(column, row);
        self.start <= p && p <= self.end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}
