//! Terminal-state engine contract
//!
//! The engine owns the byte-stream parser, the cell buffer (scrollback plus
//! the live screen), the cursor and the negotiated modes. The view layer only
//! reads it, resizes it, and asks it how to encode keys.
//!
//! Buffer rows are indexed from the oldest scrollback line. `top_row()` is the
//! index of the first row of the live screen, which is also the highest row
//! the view may scroll to.

mod keys;
mod memory;

use serde::{Deserialize, Serialize};

use crate::core::{BufferLine, CursorState};

pub use keys::{bracketed_paste_markers, encode_char, encode_key, Key, Modifiers};
pub use memory::MemoryTerminal;

/// Mouse tracking flags negotiated by the remote program
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseModes {
    /// DECSET 9 - press-only reporting
    pub x10: bool,
    /// DECSET 1000 - press and release
    pub x11: bool,
    /// DECSET 1002 - motion while a button is held
    pub cell_motion: bool,
    /// DECSET 1003 - all motion
    pub all_motion: bool,
    /// DECSET 1006 - SGR encoding
    pub sgr: bool,
}

impl MouseModes {
    /// The remote program owns the pointer
    ///
    /// SGR alone only selects an encoding, it does not enable reporting.
    pub fn tracking_active(&self) -> bool {
        self.x10 || self.x11 || self.cell_motion || self.all_motion
    }
}

/// Something the engine wants the host to act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Bytes to send to the remote end (key sequences, query replies)
    SendData(Vec<u8>),
    /// OSC 0/2 window title
    TitleChanged(String),
}

/// Engine debug switches the view can toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugChannel {
    /// Trace every parsed sequence
    Sequences,
    /// Engine internal state tracing
    Engine,
}

/// The terminal-state engine as consumed by the view layer
pub trait TerminalEngine: Send {
    /// Feed bytes received from the transport
    fn apply_incoming(&mut self, data: &[u8]);

    /// Has visible state changed since the last `clear_changes`
    fn has_changed(&self) -> bool;

    fn clear_changes(&mut self);

    /// Buffer row, or `None` past the end of the buffer
    fn line(&self, row: usize) -> Option<&BufferLine>;

    fn cursor(&self) -> CursorState;

    /// DECSCNM - whole-screen reverse video
    fn reverse_video(&self) -> bool;

    /// First row of the live screen
    fn top_row(&self) -> usize;

    /// Reflow to a new visible geometry
    fn resize_view(&mut self, columns: usize, rows: usize);

    /// Text between two buffer positions, both inclusive
    fn text(&self, start_column: usize, start_row: usize, end_column: usize, end_row: usize)
        -> String;

    fn mouse_modes(&self) -> MouseModes;

    /// DECSET 2004
    fn bracketed_paste(&self) -> bool {
        false
    }

    /// Bytes the key would produce, if the engine handles it at all
    fn key_sequence(&self, key: Key, ctrl: bool, shift: bool) -> Option<Vec<u8>>;

    /// Process a key press; the resulting bytes arrive as `EngineEvent::SendData`
    fn key_pressed(&mut self, key: Key, ctrl: bool, shift: bool) -> bool;

    /// Drain pending events
    fn take_events(&mut self) -> Vec<EngineEvent>;

    /// Characters rendered since the last call, for capture logs
    fn take_raw_text(&mut self) -> String {
        String::new()
    }

    fn set_debugging(&mut self, _channel: DebugChannel, _enabled: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_active() {
        assert!(!MouseModes::default().tracking_active());
        let sgr_only = MouseModes {
            sgr: true,
            ..Default::default()
        };
        assert!(!sgr_only.tracking_active());
        for modes in [
            MouseModes {
                x10: true,
                ..Default::default()
            },
            MouseModes {
                x11: true,
                ..Default::default()
            },
            MouseModes {
                cell_motion: true,
                ..Default::default()
            },
            MouseModes {
                all_motion: true,
                ..Default::default()
            },
        ] {
            assert!(modes.tracking_active());
        }
    }
}
