//! Buffer line representation
//!
//! A line is a row of cells in the terminal buffer, together with the
//! DEC double-width/double-height rendering flags for that row.

use serde::{Deserialize, Serialize};

use super::cell::{Cell, TerminalAttribute};

/// A row of cells in the terminal buffer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferLine {
    /// The cells in this line
    cells: Vec<Cell>,
    /// DECDWL - row is rendered at double width
    pub double_width: bool,
    /// DECDHL top half
    pub double_height_top: bool,
    /// DECDHL bottom half
    pub double_height_bottom: bool,
}

impl BufferLine {
    /// Create a new blank line with the specified number of columns
    pub fn new(cols: usize) -> Self {
        Self {
            cells: vec![Cell::default(); cols],
            ..Default::default()
        }
    }

    /// Create a line from existing cells
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            ..Default::default()
        }
    }

    /// Create a line from text, one cell per char, all sharing `attributes`
    pub fn from_text(text: &str, attributes: TerminalAttribute) -> Self {
        Self::from_cells(
            text.chars()
                .map(|c| Cell::with_attributes(c, attributes))
                .collect(),
        )
    }

    /// Get the number of cells in this line
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the line has no cells at all
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a reference to a cell at the given column
    pub fn cell(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    /// Get a mutable reference to a cell at the given column
    pub fn cell_mut(&mut self, col: usize) -> Option<&mut Cell> {
        self.cells.get_mut(col)
    }

    /// Get all cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Any of the double-height flags is set
    pub fn is_double_height(&self) -> bool {
        self.double_height_top || self.double_height_bottom
    }

    /// Resize the line to a new number of columns
    /// If growing, new cells are blank; if shrinking, cells are truncated
    pub fn resize(&mut self, cols: usize) {
        self.cells.resize_with(cols, Cell::default);
    }

    /// Extract the text between two columns (inclusive), trailing blanks trimmed
    pub fn text_between(&self, start: usize, end: usize) -> String {
        let mut s = String::new();
        if self.cells.is_empty() || start >= self.cells.len() {
            return s;
        }
        let end = end.min(self.cells.len() - 1);
        for cell in &self.cells[start..=end] {
            cell.push_text(&mut s);
        }
        s.truncate(s.trim_end_matches(' ').len());
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_new() {
        let line = BufferLine::new(80);
        assert_eq!(line.len(), 80);
        assert!(!line.double_width);
        assert!(line.cells().iter().all(Cell::is_blank));
    }

    #[test]
    fn test_line_resize() {
        let mut line = BufferLine::from_text("Hello", TerminalAttribute::default());
        line.resize(8);
        assert_eq!(line.len(), 8);
        line.resize(2);
        assert_eq!(line.text_between(0, 10), "He");
    }

    #[test]
    fn test_text_between_trims_trailing_blanks() {
        let line = BufferLine::from_text("ab  cd   ", TerminalAttribute::default());
        assert_eq!(line.text_between(0, 8), "ab  cd");
        assert_eq!(line.text_between(1, 3), "b");
        assert_eq!(line.text_between(20, 30), "");
    }
}
