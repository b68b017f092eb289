//! Mouse Protocol Translator
//!
//! Encodes pointer activity as xterm mouse reports for whichever tracking
//! modes the remote program enabled. Modes combine: each enabled flag adds
//! the events it reports.
//!
//! - X10 (9): press only, no modifier bits
//! - Normal (1000): press and release
//! - Cell motion (1002): plus motion while a button is held
//! - All motion (1003): plus motion with no button
//!
//! Reports use the legacy `ESC [ M` encoding unless SGR (1006) is on.

use tracing::trace;

use super::pointer::PointerButtons;
use crate::core::TextPosition;
use crate::engine::{Modifiers, MouseModes};

/// Wire code for the first held button, by priority left, right, middle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// No button, also the legacy release code
    None,
}

impl MouseButton {
    /// Pick the reported button from the held set
    pub fn from_buttons(buttons: PointerButtons) -> Self {
        if buttons.left {
            MouseButton::Left
        } else if buttons.right {
            MouseButton::Right
        } else if buttons.middle {
            MouseButton::Middle
        } else {
            MouseButton::None
        }
    }

    pub fn code(self) -> u8 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
            MouseButton::None => 3,
        }
    }
}

/// Kind of pointer activity being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventType {
    Press,
    Release,
    Move,
}

const MOTION: u8 = 32;

/// Encode one report; `cell` is zero-based
///
/// Legacy coordinates are clamped to 223 so every byte stays printable.
pub fn encode_report(code: u8, cell: TextPosition, event: MouseEventType, sgr: bool) -> Vec<u8> {
    if sgr {
        let final_char = if event == MouseEventType::Release { 'm' } else { 'M' };
        return format!("\x1b[<{};{};{}{}", code, cell.column + 1, cell.row + 1, final_char).into_bytes();
    }

    let cx = (cell.column + 1).min(223) as u8 + 32;
    let cy = (cell.row + 1).min(223) as u8 + 32;
    vec![0x1b, b'[', b'M', code + 32, cx, cy]
}

fn modifier_bits(modifiers: Modifiers) -> u8 {
    let mut bits = 0;
    if modifiers.shift {
        bits |= 4;
    }
    if modifiers.alt {
        bits |= 8;
    }
    if modifiers.ctrl {
        bits |= 16;
    }
    bits
}

/// Tracks the pressed button and the last reported cell
#[derive(Debug, Clone, Default)]
pub struct MouseTranslator {
    pressed: Option<MouseButton>,
    last_cell: Option<TextPosition>,
}

impl MouseTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the pressed button and last cell
    pub fn reset(&mut self) {
        self.pressed = None;
        self.last_cell = None;
    }

    /// A button went down; `buttons` is the held set after the press
    pub fn press(
        &mut self,
        modes: MouseModes,
        buttons: PointerButtons,
        cell: TextPosition,
        modifiers: Modifiers,
    ) -> Option<Vec<u8>> {
        if !modes.tracking_active() {
            return None;
        }
        let button = MouseButton::from_buttons(buttons);
        if button == MouseButton::None {
            return None;
        }
        self.pressed = Some(button);
        self.last_cell = Some(cell);

        let code = button.code() | self.modifiers_for(modes, modifiers);
        trace!(?button, column = cell.column, row = cell.row, "mouse press report");
        Some(encode_report(code, cell, MouseEventType::Press, modes.sgr))
    }

    /// A button came up; `buttons` is the held set after the release
    pub fn release(
        &mut self,
        modes: MouseModes,
        buttons: PointerButtons,
        cell: TextPosition,
        modifiers: Modifiers,
    ) -> Option<Vec<u8>> {
        let released = self.pressed.take();
        if buttons.any() {
            self.pressed = Some(MouseButton::from_buttons(buttons));
        }
        if !(modes.x11 || modes.cell_motion || modes.all_motion) {
            return None;
        }

        // legacy releases do not say which button; SGR keeps the code
        let button = if modes.sgr {
            released.unwrap_or(MouseButton::None)
        } else {
            MouseButton::None
        };
        let code = button.code() | modifier_bits(modifiers);
        self.last_cell = Some(cell);
        trace!(column = cell.column, row = cell.row, "mouse release report");
        Some(encode_report(code, cell, MouseEventType::Release, modes.sgr))
    }

    /// The pointer moved; reported only on entering a new cell
    pub fn motion(
        &mut self,
        modes: MouseModes,
        buttons: PointerButtons,
        cell: TextPosition,
        modifiers: Modifiers,
    ) -> Option<Vec<u8>> {
        let button = MouseButton::from_buttons(buttons);
        let wanted = if button == MouseButton::None {
            modes.all_motion
        } else {
            modes.cell_motion || modes.all_motion
        };
        if !wanted || self.last_cell == Some(cell) {
            return None;
        }
        self.last_cell = Some(cell);

        let code = button.code() | MOTION | modifier_bits(modifiers);
        trace!(column = cell.column, row = cell.row, "mouse motion report");
        Some(encode_report(code, cell, MouseEventType::Move, modes.sgr))
    }

    fn modifiers_for(&self, modes: MouseModes, modifiers: Modifiers) -> u8 {
        let x10_only = modes.x10 && !modes.x11 && !modes.cell_motion && !modes.all_motion;
        if x10_only {
            0
        } else {
            modifier_bits(modifiers)
        }
    }
}
