//! Pointer Mapper
//!
//! Pixel coordinates to grid cells.

use crate::core::TextPosition;
use crate::engine::Modifiers;
use crate::render::{CellSize, Point};

/// Buttons held during a pointer event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerButtons {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

impl PointerButtons {
    pub const NONE: Self = Self {
        left: false,
        right: false,
        middle: false,
    };

    pub const LEFT: Self = Self {
        left: true,
        right: false,
        middle: false,
    };

    pub const RIGHT: Self = Self {
        left: false,
        right: true,
        middle: false,
    };

    pub const MIDDLE: Self = Self {
        left: false,
        right: false,
        middle: true,
    };

    pub fn any(&self) -> bool {
        self.left || self.right || self.middle
    }
}

/// A pointer press, move or release in surface pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    /// Buttons down after the event
    pub buttons: PointerButtons,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64, buttons: PointerButtons) -> Self {
        Self {
            position: Point::new(x, y),
            buttons,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A wheel movement; 120 units per notch
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelEvent {
    pub delta_y: f64,
    pub modifiers: Modifiers,
}

impl WheelEvent {
    pub fn new(delta_y: f64) -> Self {
        Self {
            delta_y,
            modifiers: Modifiers::NONE,
        }
    }
}

/// Maps surface pixels onto the visible grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMapper {
    cell: CellSize,
    columns: usize,
    rows: usize,
    padding: f64,
}

impl PointerMapper {
    pub fn new(cell: CellSize, columns: usize, rows: usize, padding: f64) -> Self {
        Self {
            cell,
            columns: columns.max(1),
            rows: rows.max(1),
            padding,
        }
    }

    /// Cell under `point`, clamped into the grid
    ///
    /// The result is view-relative; add the view top for buffer coordinates.
    pub fn to_cell(&self, point: Point) -> TextPosition {
        let column = Self::axis(point.x - self.padding, self.cell.width, self.columns);
        let row = Self::axis(point.y - self.padding, self.cell.height, self.rows);
        TextPosition::new(column, row)
    }

    /// Is the raw point over the grid
    pub fn contains(&self, point: Point) -> bool {
        let x = point.x - self.padding;
        let y = point.y - self.padding;
        x >= 0.0
            && y >= 0.0
            && x < self.columns as f64 * self.cell.width
            && y < self.rows as f64 * self.cell.height
    }

    fn axis(offset: f64, size: f64, count: usize) -> usize {
        if !offset.is_finite() || offset <= 0.0 || size <= 0.0 {
            return 0;
        }
        let index = (offset / size).floor();
        if index >= count as f64 {
            count - 1
        } else {
            index as usize
        }
    }
}
