//! Pointer and keyboard input
//!
//! Maps pointer coordinates to grid cells and encodes mouse reports for the
//! remote program. Key encoding lives with the engine contract; this module
//! only carries the host's key events.

mod keyboard;
mod mouse;
mod pointer;

pub use keyboard::KeyEvent;
pub use mouse::{encode_report, MouseButton, MouseEventType, MouseTranslator};
pub use pointer::{PointerButtons, PointerEvent, PointerMapper, WheelEvent};
