//! Shared helpers for view integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use termview::config::ViewConfig;
use termview::engine::MemoryTerminal;
use termview::error::{Error, Result};
use termview::input::{PointerButtons, PointerEvent};
use termview::render::{CellSize, PaintRecorder};
use termview::transport::{EventSender, Transport, WindowSize};
use termview::{ClipboardSink, TerminalView};

pub const CELL: CellSize = CellSize::new(8.0, 16.0);

/// Transport double that records everything sent to it
#[derive(Default)]
pub struct RecordingTransport {
    connected: AtomicBool,
    refuse: AtomicBool,
    /// Milliseconds each `send_data` blocks for
    stall_ms: AtomicU64,
    sent: Mutex<Vec<Vec<u8>>>,
    sizes: Mutex<Vec<WindowSize>>,
    events: Mutex<Option<EventSender>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn refusing() -> Arc<Self> {
        let transport = Self::default();
        transport.refuse.store(true, Ordering::SeqCst);
        Arc::new(transport)
    }

    /// A transport whose every send hangs for `delay`
    pub fn stalling(delay: Duration) -> Arc<Self> {
        let transport = Self::default();
        transport
            .stall_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
        Arc::new(transport)
    }

    /// All data sent so far, concatenated
    pub fn sent_bytes(&self) -> Vec<u8> {
        self.sent.lock().concat()
    }

    pub fn sizes(&self) -> Vec<WindowSize> {
        self.sizes.lock().clone()
    }

    /// The sender the view handed over on connect
    pub fn events(&self) -> Option<EventSender> {
        self.events.lock().clone()
    }

    /// Simulate the remote end going away
    pub fn drop_connection(&self) {
        self.connected.store(false, Ordering::SeqCst);
        if let Some(events) = self.events() {
            events.disconnected();
        }
    }

    /// Wait until the sent bytes satisfy `done`
    pub fn wait_for_sent(&self, done: impl Fn(&[u8]) -> bool) -> Vec<u8> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let bytes = self.sent_bytes();
            if done(&bytes) || Instant::now() >= deadline {
                return bytes;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    /// Wait until at least `count` window sizes arrived
    pub fn wait_for_sizes(&self, count: usize) -> Vec<WindowSize> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let sizes = self.sizes();
            if sizes.len() >= count || Instant::now() >= deadline {
                return sizes;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}

impl Transport for RecordingTransport {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn connect(&self, events: EventSender) -> bool {
        if self.refuse.load(Ordering::SeqCst) {
            return false;
        }
        *self.events.lock() = Some(events);
        self.connected.store(true, Ordering::SeqCst);
        true
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    fn send_data(&self, data: &[u8]) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        let stall = self.stall_ms.load(Ordering::SeqCst);
        if stall > 0 {
            std::thread::sleep(Duration::from_millis(stall));
        }
        self.sent.lock().push(data.to_vec());
        Ok(())
    }

    fn set_terminal_window_size(&self, size: WindowSize) -> Result<()> {
        self.sizes.lock().push(size);
        Ok(())
    }
}

/// A view over a `columns` x `rows` engine, sized to fit it exactly and
/// rendered once so pointer mapping works
pub fn rendered_view(
    columns: usize,
    rows: usize,
    clipboard: impl ClipboardSink + 'static,
) -> (TerminalView<MemoryTerminal>, PaintRecorder) {
    let mut view = TerminalView::new(
        MemoryTerminal::new(columns, rows),
        ViewConfig::default(),
        Arc::new(clipboard),
    );
    view.set_bounds(columns as f64 * CELL.width, rows as f64 * CELL.height);
    let mut sink = PaintRecorder::new(CELL);
    assert!(view.render(&mut sink));
    sink.clear();
    (view, sink)
}

/// Pointer event at the middle of a cell
pub fn at_cell(column: usize, row: usize, buttons: PointerButtons) -> PointerEvent {
    PointerEvent::new(
        column as f64 * CELL.width + CELL.width / 2.0,
        row as f64 * CELL.height + CELL.height / 2.0,
        buttons,
    )
}

/// Clipboard whose every access fails
pub struct BrokenClipboard;

impl ClipboardSink for BrokenClipboard {
    fn get_text(&self) -> Result<String> {
        Err(Error::Clipboard("clipboard unavailable".into()))
    }

    fn set_text(&self, _text: &str) -> Result<()> {
        Err(Error::Clipboard("clipboard unavailable".into()))
    }
}
