//! Grid geometry
//!
//! Columns and rows follow from the drawing area and the measured cell size.

use super::geometry::CellSize;

/// Visible grid size and the pixel area it was computed from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub columns: usize,
    pub rows: usize,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl GridGeometry {
    /// Grid that fits `width` x `height` pixels after `padding` on every side
    ///
    /// Always at least one column and one row.
    pub fn fit(width: f64, height: f64, cell: CellSize, padding: f64) -> Self {
        let usable_width = (width - 2.0 * padding).max(0.0);
        let usable_height = (height - 2.0 * padding).max(0.0);
        let columns = (usable_width / cell.width).floor() as usize;
        let rows = (usable_height / cell.height).floor() as usize;
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
            pixel_width: width,
            pixel_height: height,
        }
    }

    /// Same column and row count
    pub fn same_grid(&self, other: &GridGeometry) -> bool {
        self.columns == other.columns && self.rows == other.rows
    }
}
