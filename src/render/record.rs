//! Recording paint sink
//!
//! Captures draw calls as serializable commands. Used by the headless
//! runner and by tests that check what a frame would put on screen.

use serde::{Deserialize, Serialize};

use super::geometry::{CellSize, Point, Rect};
use super::metrics::FontSpec;
use super::paint::{PaintSink, TextStyle};
use crate::core::Rgb;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Fill {
        rect: Rect,
        color: Rgb,
    },
    Stroke {
        rect: Rect,
        color: Rgb,
    },
    Text {
        origin: Point,
        text: String,
        color: Rgb,
        bold: bool,
        scale_x: f64,
        scale_y: f64,
    },
    Line {
        from: Point,
        to: Point,
        color: Rgb,
    },
}

/// A `PaintSink` that stores everything drawn on it
#[derive(Debug, Clone)]
pub struct PaintRecorder {
    cell: CellSize,
    scale_with_font: bool,
    commands: Vec<DrawCommand>,
    measures: usize,
}

impl PaintRecorder {
    /// Every measurement reports `cell`
    pub fn new(cell: CellSize) -> Self {
        Self {
            cell,
            scale_with_font: false,
            commands: Vec::new(),
            measures: 0,
        }
    }

    /// Treat `cell` as the size at 12pt and scale measurements with the
    /// requested font size
    pub fn scaled_with_font(mut self) -> Self {
        self.scale_with_font = true;
        self
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// How many times a glyph was measured
    pub fn measure_count(&self) -> usize {
        self.measures
    }

    /// Text of every `Text` command in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl PaintSink for PaintRecorder {
    fn measure_glyph(&mut self, _reference: &str, font: &FontSpec) -> CellSize {
        self.measures += 1;
        if self.scale_with_font {
            let factor = font.size / 12.0;
            CellSize::new(self.cell.width * factor, self.cell.height * factor)
        } else {
            self.cell
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb) {
        self.commands.push(DrawCommand::Stroke { rect, color });
    }

    fn draw_text(&mut self, origin: Point, text: &str, style: &TextStyle<'_>) {
        self.commands.push(DrawCommand::Text {
            origin,
            text: text.to_string(),
            color: style.color,
            bold: style.bold,
            scale_x: style.scale_x,
            scale_y: style.scale_y,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Rgb) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }
}
