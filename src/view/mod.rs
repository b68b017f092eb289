//! Terminal view
//!
//! `TerminalView` ties an engine, a transport and a clipboard to a host
//! surface. The host forwards input events, calls `process_events` and
//! `render` from its UI loop, and redraws when `take_redraw` says so.
//!
//! Threads involved:
//! - the host UI thread, which owns the view
//! - the outbox thread, one per connection, which talks to the transport
//! - detached paste threads reading the clipboard
//! - optionally a blink ticker and a host receive thread using `DataSink`

mod blink;
mod raw_text;
mod scroll;
mod selection;
mod shared;

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::clipboard::ClipboardSink;
use crate::config::ViewConfig;
use crate::core::{TextPosition, TextRange};
use crate::engine::{bracketed_paste_markers, DebugChannel, Key, TerminalEngine};
use crate::error::Result;
use crate::input::{KeyEvent, MouseTranslator, PointerEvent, PointerMapper, WheelEvent};
use crate::render::{
    paint_frame, AttributeResolver, CellMetrics, CursorDescriptor, FontSpec, Frame, GridGeometry,
    LayoutBuilder, PaintSink,
};
use crate::transport::{EventSender, Outbox, TerminalEvent, Transport, WindowSize};

pub use blink::{BlinkController, BlinkTicker};
pub use raw_text::RawTextLog;
pub use scroll::ScrollController;
pub use selection::{ReleaseOutcome, SelectionTracker};
pub use shared::DataSink;

use shared::Shared;

/// Grid size assumed until the first render measures the surface
const FALLBACK_GRID: (usize, usize) = (80, 24);

/// A terminal display bound to one engine
pub struct TerminalView<E: TerminalEngine + 'static> {
    shared: Arc<Shared<E>>,
    config: ViewConfig,
    font: FontSpec,
    metrics: CellMetrics,
    grid: Option<GridGeometry>,
    width: f64,
    height: f64,
    focused: bool,
    annotate: bool,
    debug_sequences: bool,
    debug_engine: bool,

    clipboard: Arc<dyn ClipboardSink>,
    transport: Option<Arc<dyn Transport>>,
    outbox: Option<Outbox>,
    events_tx: mpsc::Sender<TerminalEvent>,
    events: mpsc::Receiver<TerminalEvent>,

    selection: SelectionTracker,
    mouse: MouseTranslator,
    hover: Option<TextPosition>,
    scroll: ScrollController,
    blink: BlinkController,
}

impl<E: TerminalEngine + 'static> TerminalView<E> {
    pub fn new(engine: E, config: ViewConfig, clipboard: Arc<dyn ClipboardSink>) -> Self {
        let raw_text = config
            .raw_text_capture
            .then(|| RawTextLog::new(config.raw_text_batch));
        let (events_tx, events) = mpsc::channel();
        Self {
            shared: Arc::new(Shared::new(engine, raw_text)),
            font: config.font.clone(),
            metrics: CellMetrics::new(config.reference_glyph.clone()),
            grid: None,
            width: 0.0,
            height: 0.0,
            focused: false,
            annotate: config.debug.view,
            debug_sequences: false,
            debug_engine: false,
            clipboard,
            transport: None,
            outbox: None,
            events_tx,
            events,
            selection: SelectionTracker::new(),
            mouse: MouseTranslator::new(),
            hover: None,
            scroll: ScrollController::new(&config),
            blink: BlinkController::new(config.blink),
            config,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Current font, including zoom
    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    /// Replace the font; the cell size is re-measured on the next render
    pub fn set_font(&mut self, font: FontSpec) {
        if font != self.font {
            self.font = font;
            self.shared.mark_dirty();
        }
    }

    /// Size of the drawing surface in pixels
    pub fn set_bounds(&mut self, width: f64, height: f64) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.shared.mark_dirty();
        }
    }

    /// Grid in effect since the last render
    pub fn grid(&self) -> Option<GridGeometry> {
        self.grid
    }

    /// Read the engine under the view lock
    pub fn with_engine<R>(&self, f: impl FnOnce(&E) -> R) -> R {
        f(&self.shared.lock().engine)
    }

    /// Modify the engine under the view lock
    pub fn with_engine_mut<R>(&self, f: impl FnOnce(&mut E) -> R) -> R {
        let result = f(&mut self.shared.lock().engine);
        self.shared.mark_dirty();
        result
    }

    /// A handle for applying inbound bytes from another thread
    pub fn data_sink(&self) -> DataSink<E> {
        DataSink::new(self.shared.clone())
    }

    // ---- connection ----------------------------------------------------

    pub fn is_connected(&self) -> bool {
        self.transport.as_ref().is_some_and(|t| t.is_connected())
    }

    /// Attach to `transport` and start the connection
    ///
    /// Returns `Ok(false)` if already connected or the transport refused.
    pub fn connect(&mut self, transport: Arc<dyn Transport>) -> Result<bool> {
        if self.is_connected() {
            return Ok(false);
        }
        self.teardown();

        let outbox = Outbox::spawn(transport.clone())?;
        let (tx, rx) = mpsc::channel();
        self.events_tx = tx.clone();
        self.events = rx;

        if !transport.connect(EventSender::new(tx)) {
            warn!("transport refused connection");
            self.teardown();
            return Ok(false);
        }

        // the window size goes out ahead of any data
        let size = self.window_size();
        outbox.set_window_size(size);
        self.shared.set_outbound(outbox.sender());
        self.outbox = Some(outbox);
        self.transport = Some(transport);
        debug!(columns = size.columns, rows = size.rows, "connected");
        Ok(true)
    }

    pub fn disconnect(&mut self) {
        if !self.is_connected() {
            return;
        }
        if let Some(transport) = &self.transport {
            transport.disconnect();
        }
        self.teardown();
        debug!("disconnected");
    }

    /// Forget the transport and discard events still in flight
    fn teardown(&mut self) {
        self.shared.set_outbound(None);
        self.outbox = None;
        self.transport = None;
        self.mouse.reset();
        let (tx, rx) = mpsc::channel();
        self.events_tx = tx;
        self.events = rx;
    }

    /// Sender feeding this view's event queue
    pub fn event_sender(&self) -> EventSender {
        EventSender::new(self.events_tx.clone())
    }

    fn window_size(&self) -> WindowSize {
        match self.grid {
            Some(grid) => WindowSize::new(grid.columns, grid.rows, grid.pixel_width, grid.pixel_height),
            None => WindowSize::new(FALLBACK_GRID.0, FALLBACK_GRID.1, self.width, self.height),
        }
    }

    // ---- events --------------------------------------------------------

    /// Drain transport events; true if any arrived
    pub fn process_events(&mut self) -> bool {
        let pending: Vec<TerminalEvent> = self.events.try_iter().collect();
        if pending.is_empty() {
            return false;
        }
        for event in pending {
            match event {
                TerminalEvent::DataArrived(data) => self.shared.apply_batch(&data),
                TerminalEvent::TitleChanged(title) => self.shared.set_title(title),
                TerminalEvent::Disconnected => {
                    debug!("transport reported disconnect");
                    self.teardown();
                    self.shared.mark_dirty();
                    break;
                }
            }
        }
        true
    }

    pub fn title(&self) -> String {
        self.shared.title()
    }

    /// Text logged since the view was created; empty when capture is off
    pub fn raw_text(&self) -> Arc<str> {
        self.shared
            .raw_text()
            .map(|log| log.text())
            .unwrap_or_else(|| Arc::from(""))
    }

    /// When the last inbound batch was applied
    pub fn idle_since(&self) -> Instant {
        self.shared.idle_since()
    }

    /// Something changed since the last call
    pub fn take_redraw(&self) -> bool {
        self.shared.take_dirty()
    }

    // ---- scrolling -----------------------------------------------------

    pub fn view_top(&self) -> usize {
        self.shared.lock().view_top
    }

    /// Move the view top, clamped to `[0, top_row]`; returns the new top
    pub fn set_scroll(&mut self, requested: i64) -> usize {
        let (old, new) = {
            let mut state = self.shared.lock();
            let old = state.view_top;
            state.view_top = ScrollController::clamp(requested, state.engine.top_row());
            (old, state.view_top)
        };
        if old != new {
            self.shared.mark_dirty();
        }
        new
    }

    pub fn on_wheel(&mut self, event: WheelEvent) {
        if event.modifiers.ctrl {
            let size = self.scroll.zoom(self.font.size, event.delta_y);
            if size != self.font.size {
                debug!(from = self.font.size, to = size, "font zoom");
                self.font.size = size;
                self.shared.mark_dirty();
            }
            return;
        }

        let changed = {
            let mut state = self.shared.lock();
            let old = state.view_top;
            let top_row = state.engine.top_row();
            state.view_top = self.scroll.scrolled(old, top_row, event.delta_y);
            old != state.view_top
        };
        if changed {
            self.shared.mark_dirty();
        }
    }

    // ---- selection and pointer ----------------------------------------

    pub fn selection(&self) -> Option<TextRange> {
        self.selection.range()
    }

    fn mapper(&self) -> Option<PointerMapper> {
        let cell = self.metrics.cell_size()?;
        let (columns, rows) = self
            .grid
            .map(|g| (g.columns, g.rows))
            .unwrap_or(FALLBACK_GRID);
        Some(PointerMapper::new(cell, columns, rows, self.config.padding))
    }

    fn log_pointer(&self, what: &str, cell: TextPosition) {
        if self.config.debug.mouse {
            debug!(column = cell.column, row = cell.row, "pointer {}", what);
        } else {
            trace!(column = cell.column, row = cell.row, "pointer {}", what);
        }
    }

    pub fn on_pointer_pressed(&mut self, event: PointerEvent) {
        let Some(mapper) = self.mapper() else { return };
        let cell = mapper.to_cell(event.position);
        let (modes, view_top) = {
            let state = self.shared.lock();
            (state.engine.mouse_modes(), state.view_top)
        };
        self.log_pointer("pressed", cell);

        if !modes.tracking_active() {
            if event.buttons.left {
                self.selection.press(cell.offset_rows(view_top));
            } else if event.buttons.right {
                self.paste();
            }
        }

        if self.is_connected() && mapper.contains(event.position) {
            if let Some(report) = self.mouse.press(modes, event.buttons, cell, event.modifiers) {
                self.shared.send(report);
            }
        }
    }

    pub fn on_pointer_moved(&mut self, event: PointerEvent) {
        let Some(mapper) = self.mapper() else { return };
        let cell = mapper.to_cell(event.position);
        if self.hover == Some(cell) {
            return;
        }
        self.hover = Some(cell);

        let (modes, view_top) = {
            let state = self.shared.lock();
            (state.engine.mouse_modes(), state.view_top)
        };
        self.log_pointer("moved", cell);

        if event.buttons.left && !modes.tracking_active() && self.selection.drag(cell.offset_rows(view_top)) {
            if let Some(range) = self.selection.range() {
                if self.config.debug.select {
                    debug!(%range, "selection");
                } else {
                    trace!(%range, "selection");
                }
            }
            self.shared.mark_dirty();
        }

        if self.is_connected() && mapper.contains(event.position) {
            if let Some(report) = self.mouse.motion(modes, event.buttons, cell, event.modifiers) {
                self.shared.send(report);
            }
        }
    }

    /// `event.buttons` holds the buttons still down after the release
    pub fn on_pointer_released(&mut self, event: PointerEvent) {
        let Some(mapper) = self.mapper() else { return };
        let cell = mapper.to_cell(event.position);
        let modes = self.shared.lock().engine.mouse_modes();
        self.log_pointer("released", cell);

        if !event.buttons.left && !modes.tracking_active() {
            match self.selection.release() {
                ReleaseOutcome::Copy(range) => self.copy(range),
                ReleaseOutcome::Cleared => self.shared.mark_dirty(),
                ReleaseOutcome::Unchanged => {}
            }
        }

        if self.is_connected() && mapper.contains(event.position) {
            if let Some(report) = self.mouse.release(modes, event.buttons, cell, event.modifiers) {
                self.shared.send(report);
            }
        }
    }

    pub fn on_pointer_left(&mut self) {
        self.hover = None;
        self.shared.mark_dirty();
    }

    fn copy(&self, range: TextRange) {
        let (start, end) = (range.start(), range.end());
        let text = self
            .shared
            .lock()
            .engine
            .text(start.column, start.row, end.column, end.row);
        if self.config.debug.select {
            debug!(%range, captured = %text, "copy selection");
        }
        if let Err(err) = self.clipboard.set_text(&text) {
            debug!(error = %err, "clipboard write failed");
        }
    }

    /// Read the clipboard on a detached thread and queue it for sending
    fn paste(&self) {
        if !self.is_connected() {
            return;
        }
        let bracketed = self.shared.lock().engine.bracketed_paste();
        let clipboard = self.clipboard.clone();
        let shared = self.shared.clone();
        let spawned = thread::Builder::new()
            .name("termview-paste".into())
            .spawn(move || {
                let text = match clipboard.get_text() {
                    Ok(text) => text,
                    Err(err) => {
                        debug!(error = %err, "clipboard read failed");
                        return;
                    }
                };
                if text.is_empty() {
                    return;
                }
                let mut data = Vec::with_capacity(text.len() + 12);
                if bracketed {
                    let (start, end) = bracketed_paste_markers();
                    data.extend_from_slice(start);
                    data.extend_from_slice(text.as_bytes());
                    data.extend_from_slice(end);
                } else {
                    data.extend_from_slice(text.as_bytes());
                }
                shared.send(data);
            });
        if let Err(err) = spawned {
            warn!(error = %err, "could not start paste thread");
        }
    }

    // ---- keyboard ------------------------------------------------------

    /// Handle a key press; true if it was consumed
    ///
    /// Unmodified printable characters arrive through `on_text_input`
    /// instead, so they are left alone here.
    pub fn on_key_down(&mut self, event: KeyEvent) -> bool {
        if event.key == Key::Escape && self.selection.clear() {
            self.shared.mark_dirty();
        }
        if !self.is_connected() {
            return false;
        }
        let ctrl = event.modifiers.ctrl;
        let shift = event.modifiers.shift;

        if ctrl {
            match event.key {
                Key::F10 => {
                    self.debug_sequences = !self.debug_sequences;
                    let enabled = self.debug_sequences;
                    self.shared
                        .lock()
                        .engine
                        .set_debugging(DebugChannel::Sequences, enabled);
                    debug!(enabled, "sequence debugging");
                    return true;
                }
                Key::F11 => {
                    self.annotate = !self.annotate;
                    self.shared.mark_dirty();
                    return true;
                }
                Key::F12 => {
                    self.debug_engine = !self.debug_engine;
                    let enabled = self.debug_engine;
                    self.shared
                        .lock()
                        .engine
                        .set_debugging(DebugChannel::Engine, enabled);
                    debug!(enabled, "engine debugging");
                    return true;
                }
                _ => {}
            }
        }

        if matches!(event.key, Key::Char(_)) && !ctrl {
            return false;
        }

        let (handled, events) = {
            let mut state = self.shared.lock();
            if state.engine.key_sequence(event.key, ctrl, shift).is_none() {
                return false;
            }
            let handled = state.engine.key_pressed(event.key, ctrl, shift);
            if handled {
                state.view_top = state.engine.top_row();
            }
            (handled, state.engine.take_events())
        };
        self.shared.dispatch(events);
        if handled {
            self.shared.mark_dirty();
        }
        handled
    }

    /// Handle typed text; true if any character was sent
    ///
    /// Control characters are skipped; they come through `on_key_down`.
    pub fn on_text_input(&mut self, text: &str) -> bool {
        if !self.is_connected() {
            return false;
        }
        let (handled, events) = {
            let mut state = self.shared.lock();
            let mut handled = false;
            for c in text.chars().filter(|c| !c.is_control()) {
                handled |= state.engine.key_pressed(Key::Char(c), false, false);
            }
            if handled {
                state.view_top = state.engine.top_row();
            }
            (handled, state.engine.take_events())
        };
        self.shared.dispatch(events);
        if handled {
            self.shared.mark_dirty();
        }
        handled
    }

    pub fn on_focus_changed(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.shared.mark_dirty();
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    // ---- rendering -----------------------------------------------------

    /// Start a thread that requests a redraw every blink tick
    ///
    /// `on_tick` runs on that thread after the redraw flag is set.
    pub fn spawn_blink_ticker<F>(&self, mut on_tick: F) -> Result<BlinkTicker>
    where
        F: FnMut() + Send + 'static,
    {
        let shared = self.shared.clone();
        BlinkTicker::spawn(self.blink.tick_period(), move || {
            shared.mark_dirty();
            on_tick();
        })
    }

    pub fn blink(&self) -> &BlinkController {
        &self.blink
    }

    /// Measure, resize and snapshot everything needed to paint
    ///
    /// Returns `None` until the surface has a size and the sink produced a
    /// usable cell measurement.
    pub fn frame<P: PaintSink + ?Sized>(&mut self, sink: &mut P) -> Option<Frame> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let cell = self.metrics.refresh(&self.font, sink)?;
        let grid = GridGeometry::fit(self.width, self.height, cell, self.config.padding);
        let resized = self.grid.map_or(true, |current| !current.same_grid(&grid));
        let selection = self.selection.range();

        let frame = {
            let mut state = self.shared.lock();
            if resized {
                let old_top = state.engine.top_row();
                state.engine.resize_view(grid.columns, grid.rows);
                let new_top = state.engine.top_row();
                state.view_top = ScrollController::follow(state.view_top, old_top, new_top);
            }

            let resolver = AttributeResolver::new(state.engine.reverse_video());
            let builder = LayoutBuilder::new(resolver, selection.as_ref());
            let rows = builder.build(&state.engine, state.view_top, grid.rows, grid.columns);

            let cursor = state.engine.cursor();
            let cursor_row = state.engine.top_row() + cursor.row;
            let cursor = (cursor.visible
                && cursor_row >= state.view_top
                && cursor_row < state.view_top + grid.rows)
                .then(|| CursorDescriptor {
                    column: cursor.column,
                    view_row: cursor_row - state.view_top,
                    color: resolver.foreground(&cursor.attributes, false),
                    filled: self.focused,
                    blink: cursor.attributes.blink,
                });

            Frame {
                rows,
                view_top: state.view_top,
                font: self.font.clone(),
                cell,
                padding: self.config.padding,
                surface_width: self.width,
                surface_height: self.height,
                background: resolver.background(&state.engine.cursor().attributes, false),
                cursor,
                blink_visible: self.blink.is_visible(),
                annotate: self.annotate,
            }
        };

        if resized {
            debug!(columns = grid.columns, rows = grid.rows, "grid resized");
            self.grid = Some(grid);
            if self.is_connected() {
                if let Some(outbox) = &self.outbox {
                    outbox.set_window_size(self.window_size());
                }
            }
        }
        Some(frame)
    }

    /// Build a frame and paint it onto `sink`
    pub fn render<P: PaintSink + ?Sized>(&mut self, sink: &mut P) -> bool {
        match self.frame(sink) {
            Some(frame) => {
                paint_frame(&frame, sink);
                true
            }
            None => false,
        }
    }
}

impl<E: TerminalEngine + 'static> Drop for TerminalView<E> {
    fn drop(&mut self) {
        self.disconnect();
    }
}
