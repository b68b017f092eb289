//! Transport contract and event delivery
//!
//! A transport carries bytes to and from the remote program (a PTY, an SSH
//! channel, a test double). It reports inbound activity as `TerminalEvent`s
//! over a channel; the view drains that channel on its own thread.
//!
//! Outbound traffic never runs on the caller's thread: see `Outbox`.

mod outbox;

use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use outbox::{Outbox, OutboxSender};

/// Grid size reported to the remote end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub columns: u16,
    pub rows: u16,
    pub pixel_width: u16,
    pub pixel_height: u16,
}

impl WindowSize {
    /// Build from grid and pixel sizes, saturating at `u16::MAX`
    pub fn new(columns: usize, rows: usize, pixel_width: f64, pixel_height: f64) -> Self {
        let to_u16 = |value: usize| value.min(u16::MAX as usize) as u16;
        let pixels = |value: f64| {
            if value.is_finite() && value > 0.0 {
                value.min(u16::MAX as f64) as u16
            } else {
                0
            }
        };
        Self {
            columns: to_u16(columns),
            rows: to_u16(rows),
            pixel_width: pixels(pixel_width),
            pixel_height: pixels(pixel_height),
        }
    }
}

/// Inbound activity from a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    DataArrived(Vec<u8>),
    TitleChanged(String),
    Disconnected,
}

/// Handed to a transport on connect
///
/// Sends fail silently once the view has disconnected; each method reports
/// whether anyone is still listening.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<TerminalEvent>,
}

impl EventSender {
    pub(crate) fn new(tx: mpsc::Sender<TerminalEvent>) -> Self {
        Self { tx }
    }

    /// A new sender and the receiving end it feeds
    pub fn channel() -> (Self, mpsc::Receiver<TerminalEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(tx), rx)
    }

    pub fn data_arrived(&self, data: impl Into<Vec<u8>>) -> bool {
        self.send(TerminalEvent::DataArrived(data.into()))
    }

    pub fn title_changed(&self, title: impl Into<String>) -> bool {
        self.send(TerminalEvent::TitleChanged(title.into()))
    }

    pub fn disconnected(&self) -> bool {
        self.send(TerminalEvent::Disconnected)
    }

    pub fn send(&self, event: TerminalEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Byte carrier between the view and the remote program
pub trait Transport: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Start delivering events to `events`; false if the connection failed
    fn connect(&self, events: EventSender) -> bool;

    fn disconnect(&self);

    fn send_data(&self, data: &[u8]) -> Result<()>;

    /// Tell the remote end the grid changed size
    fn set_terminal_window_size(&self, size: WindowSize) -> Result<()>;
}
