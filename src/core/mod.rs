//! Terminal Core Module
//!
//! The value types shared between the terminal-state engine and the view
//! layer:
//! - Colors and cell attributes
//! - Cells and buffer lines
//! - Cursor state
//! - Text positions and ranges

mod cell;
mod color;
mod cursor;
mod line;
mod selection;

pub use cell::{Cell, TerminalAttribute};
pub use color::{AnsiColor, Rgb};
pub use cursor::CursorState;
pub use line::BufferLine;
pub use selection::{TextPosition, TextRange};
