//! In-memory reference engine
//!
//! A plain-text terminal buffer: printable characters (with combining marks
//! and autowrap), CR/LF/BS/TAB, and a growing scrollback. Escape sequences
//! are not interpreted; styling and modes are set through methods instead.
//! Hosts use it to drive a view without a full emulator, and the test suite
//! uses it as the engine behind `TerminalView`.

use unicode_width::UnicodeWidthChar;

use super::keys::{encode_key, Key, Modifiers};
use super::{DebugChannel, EngineEvent, MouseModes, TerminalEngine};
use crate::core::{BufferLine, Cell, CursorState, TerminalAttribute};

/// Tab stops every 8 columns
const TAB_WIDTH: usize = 8;

/// Plain-text terminal buffer implementing [`TerminalEngine`]
#[derive(Debug, Clone)]
pub struct MemoryTerminal {
    /// Scrollback followed by the live screen
    lines: Vec<BufferLine>,
    columns: usize,
    rows: usize,
    /// Maximum number of lines kept above the live screen
    scrollback_limit: usize,
    cursor: CursorState,
    /// Attributes applied to newly printed characters
    pen: TerminalAttribute,
    /// Cursor sits past the right margin; the next char wraps
    pending_wrap: bool,
    reverse_video: bool,
    mouse_modes: MouseModes,
    bracketed_paste: bool,
    application_cursor: bool,
    changed: bool,
    events: Vec<EngineEvent>,
    raw_text: String,
    /// Trailing bytes of an incomplete UTF-8 sequence
    pending_utf8: Vec<u8>,
    debug_sequences: bool,
    debug_engine: bool,
}

impl MemoryTerminal {
    /// Create a terminal with the given geometry and unlimited scrollback
    pub fn new(columns: usize, rows: usize) -> Self {
        Self::with_scrollback(columns, rows, usize::MAX)
    }

    /// Create a terminal keeping at most `scrollback_limit` lines above the screen
    pub fn with_scrollback(columns: usize, rows: usize, scrollback_limit: usize) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            lines: (0..rows).map(|_| BufferLine::new(columns)).collect(),
            columns,
            rows,
            scrollback_limit,
            cursor: CursorState::default(),
            pen: TerminalAttribute::default(),
            pending_wrap: false,
            reverse_video: false,
            mouse_modes: MouseModes::default(),
            bracketed_paste: false,
            application_cursor: false,
            changed: false,
            events: Vec::new(),
            raw_text: String::new(),
            pending_utf8: Vec::new(),
            debug_sequences: false,
            debug_engine: false,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of buffer rows (scrollback plus screen)
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Set the attributes used for subsequently printed characters
    pub fn set_attribute(&mut self, attribute: TerminalAttribute) {
        self.pen = attribute;
        self.cursor.attributes = attribute;
    }

    /// Print `text` with the given attributes, then restore the previous pen
    pub fn write_styled(&mut self, text: &str, attribute: TerminalAttribute) {
        let saved = self.pen;
        self.set_attribute(attribute);
        self.apply_incoming(text.as_bytes());
        self.set_attribute(saved);
    }

    /// Set the DEC line-size flags on a live-screen row
    pub fn set_line_size(&mut self, screen_row: usize, double_width: bool, top: bool, bottom: bool) {
        let index = self.top_row() + screen_row;
        if let Some(line) = self.lines.get_mut(index) {
            line.double_width = double_width;
            line.double_height_top = top;
            line.double_height_bottom = bottom;
            self.changed = true;
        }
    }

    pub fn set_mouse_modes(&mut self, modes: MouseModes) {
        self.mouse_modes = modes;
    }

    pub fn set_reverse_video(&mut self, enabled: bool) {
        if self.reverse_video != enabled {
            self.reverse_video = enabled;
            self.changed = true;
        }
    }

    pub fn set_bracketed_paste(&mut self, enabled: bool) {
        self.bracketed_paste = enabled;
    }

    /// DECCKM
    pub fn set_application_cursor(&mut self, enabled: bool) {
        self.application_cursor = enabled;
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        if self.cursor.visible != visible {
            self.cursor.visible = visible;
            self.changed = true;
        }
    }

    /// Announce a new window title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.events.push(EngineEvent::TitleChanged(title.into()));
    }

    /// Queue bytes for the remote end, the way a query reply would be
    pub fn respond(&mut self, data: impl Into<Vec<u8>>) {
        self.events.push(EngineEvent::SendData(data.into()));
    }

    pub fn is_debugging(&self, channel: DebugChannel) -> bool {
        match channel {
            DebugChannel::Sequences => self.debug_sequences,
            DebugChannel::Engine => self.debug_engine,
        }
    }

    fn process_char(&mut self, c: char) {
        match c {
            '\r' => {
                self.cursor.column = 0;
                self.pending_wrap = false;
            }
            '\n' | '\x0b' | '\x0c' => {
                self.pending_wrap = false;
                self.linefeed();
            }
            '\x08' => {
                self.pending_wrap = false;
                self.cursor.column = self.cursor.column.saturating_sub(1);
            }
            '\t' => {
                let next = (self.cursor.column / TAB_WIDTH + 1) * TAB_WIDTH;
                self.cursor.column = next.min(self.columns - 1);
            }
            c if c.is_control() => {
                if self.debug_sequences {
                    tracing::debug!("ignoring control character {:?}", c);
                }
            }
            c if c.width() == Some(0) => self.attach_combining(c),
            c => self.print(c),
        }
    }

    fn print(&mut self, c: char) {
        if self.pending_wrap {
            self.pending_wrap = false;
            self.cursor.column = 0;
            self.linefeed();
        }

        let index = self.top_row() + self.cursor.row;
        let column = self.cursor.column;
        if let Some(cell) = self.lines.get_mut(index).and_then(|l| l.cell_mut(column)) {
            *cell = Cell::with_attributes(c, self.pen);
        }
        self.raw_text.push(c);

        if self.cursor.column + 1 >= self.columns {
            self.pending_wrap = true;
        } else {
            self.cursor.column += 1;
        }
    }

    /// Combining marks join the most recently printed cell
    fn attach_combining(&mut self, c: char) {
        let column = if self.pending_wrap {
            self.cursor.column
        } else if self.cursor.column > 0 {
            self.cursor.column - 1
        } else {
            return;
        };
        let index = self.top_row() + self.cursor.row;
        if let Some(cell) = self.lines.get_mut(index).and_then(|l| l.cell_mut(column)) {
            cell.combining.push(c);
            self.raw_text.push(c);
        }
    }

    fn linefeed(&mut self) {
        if self.cursor.row + 1 < self.rows {
            self.cursor.row += 1;
            return;
        }

        self.lines.push(BufferLine::new(self.columns));
        let limit = self.rows.saturating_add(self.scrollback_limit);
        if self.lines.len() > limit {
            let excess = self.lines.len() - limit;
            self.lines.drain(..excess);
        }
    }

    fn decode(&mut self, data: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending_utf8);
        bytes.extend_from_slice(data);

        let mut out = String::with_capacity(bytes.len());
        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(s) => {
                    out.push_str(s);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // valid_up_to guarantees this prefix is UTF-8
                    out.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.pending_utf8 = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }
}

impl TerminalEngine for MemoryTerminal {
    fn apply_incoming(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let text = self.decode(data);
        for c in text.chars() {
            self.process_char(c);
        }
        self.changed = true;
        if self.debug_engine {
            tracing::debug!(
                bytes = data.len(),
                top_row = self.top_row(),
                cursor_row = self.cursor.row,
                cursor_column = self.cursor.column,
                "applied incoming data"
            );
        }
    }

    fn has_changed(&self) -> bool {
        self.changed
    }

    fn clear_changes(&mut self) {
        self.changed = false;
    }

    fn line(&self, row: usize) -> Option<&BufferLine> {
        self.lines.get(row)
    }

    fn cursor(&self) -> CursorState {
        self.cursor
    }

    fn reverse_video(&self) -> bool {
        self.reverse_video
    }

    fn top_row(&self) -> usize {
        self.lines.len() - self.rows
    }

    fn resize_view(&mut self, columns: usize, rows: usize) {
        let columns = columns.max(1);
        let rows = rows.max(1);
        if columns == self.columns && rows == self.rows {
            return;
        }

        let cursor_line = self.top_row() + self.cursor.row;
        for line in &mut self.lines {
            line.resize(columns);
        }

        // Drop blank lines below the cursor before giving rows back to scrollback
        while self.lines.len() > rows.max(cursor_line + 1)
            && self
                .lines
                .last()
                .is_some_and(|l| l.cells().iter().all(Cell::is_blank))
        {
            self.lines.pop();
        }
        while self.lines.len() < rows {
            self.lines.push(BufferLine::new(columns));
        }

        self.columns = columns;
        self.rows = rows;
        let top = self.top_row();
        self.cursor.row = cursor_line.saturating_sub(top).min(rows - 1);
        self.cursor.column = self.cursor.column.min(columns - 1);
        self.pending_wrap = false;
        self.changed = true;
    }

    fn text(
        &self,
        start_column: usize,
        start_row: usize,
        end_column: usize,
        end_row: usize,
    ) -> String {
        let mut parts = Vec::new();
        for row in start_row..=end_row {
            let Some(line) = self.lines.get(row) else {
                break;
            };
            let first = if row == start_row { start_column } else { 0 };
            let last = if row == end_row { end_column } else { usize::MAX };
            parts.push(line.text_between(first, last));
        }
        parts.join("\n")
    }

    fn mouse_modes(&self) -> MouseModes {
        self.mouse_modes
    }

    fn bracketed_paste(&self) -> bool {
        self.bracketed_paste
    }

    fn key_sequence(&self, key: Key, ctrl: bool, shift: bool) -> Option<Vec<u8>> {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt: false,
        };
        encode_key(key, modifiers, self.application_cursor)
    }

    fn key_pressed(&mut self, key: Key, ctrl: bool, shift: bool) -> bool {
        match self.key_sequence(key, ctrl, shift) {
            Some(bytes) => {
                self.events.push(EngineEvent::SendData(bytes));
                true
            }
            None => false,
        }
    }

    fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    fn take_raw_text(&mut self) -> String {
        std::mem::take(&mut self.raw_text)
    }

    fn set_debugging(&mut self, channel: DebugChannel, enabled: bool) {
        match channel {
            DebugChannel::Sequences => self.debug_sequences = enabled,
            DebugChannel::Engine => self.debug_engine = enabled,
        }
    }
}
