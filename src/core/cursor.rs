//! Cursor state as seen by the view layer

use serde::{Deserialize, Serialize};

use super::cell::TerminalAttribute;

/// Cursor position, visibility and the attributes used to paint it
///
/// `row` is relative to the engine's live top row, not to the start of
/// the scrollback buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorState {
    pub column: usize,
    pub row: usize,
    /// DECTCEM
    pub visible: bool,
    pub attributes: TerminalAttribute,
}

impl Default for CursorState {
    fn default() -> Self {
        Self {
            column: 0,
            row: 0,
            visible: true,
            attributes: TerminalAttribute::default(),
        }
    }
}
