//! Layout Builder
//!
//! Converts a window of buffer rows into rows of styled spans. Each span is
//! one paint call downstream, so adjacent cells that would paint identically
//! are always merged.

use serde::{Deserialize, Serialize};

use super::resolve::AttributeResolver;
use crate::core::{BufferLine, Rgb, TextRange};
use crate::engine::TerminalEngine;

/// A maximal run of same-style cells with colors already resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// First column covered
    pub start_column: usize,
    /// Number of cells covered
    pub columns: usize,
    /// Cell characters plus combining marks
    pub text: String,
    pub foreground: Rgb,
    pub background: Rgb,
    pub bold: bool,
    pub underline: bool,
    pub blink: bool,
    /// Every cell in the span is concealed
    pub hidden: bool,
}

impl Span {
    pub fn end_column(&self) -> usize {
        self.start_column + self.columns
    }

    fn style(&self) -> SpanStyle {
        SpanStyle {
            foreground: self.foreground,
            background: self.background,
            bold: self.bold,
            underline: self.underline,
            blink: self.blink,
        }
    }
}

/// The properties that decide whether two cells share a span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SpanStyle {
    foreground: Rgb,
    background: Rgb,
    bold: bool,
    underline: bool,
    blink: bool,
}

/// Consecutive spans sharing everything the text pass needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub start_column: usize,
    pub columns: usize,
    pub text: String,
    pub foreground: Rgb,
    pub bold: bool,
    pub underline: bool,
    pub blink: bool,
    pub hidden: bool,
}

/// Consecutive spans sharing a background color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundRun {
    pub start_column: usize,
    pub columns: usize,
    pub color: Rgb,
}

/// One renderable terminal row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRow {
    pub double_width: bool,
    pub double_height_top: bool,
    pub double_height_bottom: bool,
    pub spans: Vec<Span>,
}

impl LayoutRow {
    pub fn is_double_height(&self) -> bool {
        self.double_height_top || self.double_height_bottom
    }

    /// The row's spans merged for the text pass
    ///
    /// Background differences do not split a text run.
    pub fn text_runs(&self) -> Vec<TextRun> {
        let mut runs: Vec<TextRun> = Vec::new();
        for span in &self.spans {
            if let Some(last) = runs.last_mut() {
                if last.foreground == span.foreground
                    && last.bold == span.bold
                    && last.underline == span.underline
                    && last.blink == span.blink
                    && last.hidden == span.hidden
                {
                    last.columns += span.columns;
                    last.text.push_str(&span.text);
                    continue;
                }
            }
            runs.push(TextRun {
                start_column: span.start_column,
                columns: span.columns,
                text: span.text.clone(),
                foreground: span.foreground,
                bold: span.bold,
                underline: span.underline,
                blink: span.blink,
                hidden: span.hidden,
            });
        }
        runs
    }

    /// The row's spans merged for the background pass
    pub fn background_runs(&self) -> Vec<BackgroundRun> {
        let mut runs: Vec<BackgroundRun> = Vec::new();
        for span in &self.spans {
            match runs.last_mut() {
                Some(last) if last.color == span.background => last.columns += span.columns,
                _ => runs.push(BackgroundRun {
                    start_column: span.start_column,
                    columns: span.columns,
                    color: span.background,
                }),
            }
        }
        runs
    }
}

/// Builds layout rows for one frame
#[derive(Debug, Clone, Copy)]
pub struct LayoutBuilder<'a> {
    resolver: AttributeResolver,
    selection: Option<&'a TextRange>,
}

impl<'a> LayoutBuilder<'a> {
    /// `selection` is in buffer coordinates
    pub fn new(resolver: AttributeResolver, selection: Option<&'a TextRange>) -> Self {
        Self {
            resolver,
            selection,
        }
    }

    /// Build `rows` rows starting at buffer row `view_top`
    ///
    /// Rows past the end of the buffer come back as `None`.
    pub fn build<E>(&self, engine: &E, view_top: usize, rows: usize, columns: usize) -> Vec<Option<LayoutRow>>
    where
        E: TerminalEngine + ?Sized,
    {
        (view_top..view_top + rows)
            .map(|row| engine.line(row).map(|line| self.build_row(line, row, columns)))
            .collect()
    }

    /// Build a single row; `buffer_row` is used for the selection test
    pub fn build_row(&self, line: &BufferLine, buffer_row: usize, columns: usize) -> LayoutRow {
        let mut spans: Vec<Span> = Vec::new();

        for (column, cell) in line.cells().iter().take(columns).enumerate() {
            let attr = &cell.attributes;
            let selected = self
                .selection
                .is_some_and(|range| range.contains(column, buffer_row));
            let (foreground, background) = self.resolver.colors(attr, selected);
            let style = SpanStyle {
                foreground,
                background,
                bold: attr.bold,
                underline: attr.underline,
                blink: attr.blink,
            };

            match spans.last_mut() {
                Some(span) if span.style() == style => {
                    span.columns += 1;
                    span.hidden &= attr.hidden;
                }
                _ => spans.push(Span {
                    start_column: column,
                    columns: 1,
                    text: String::new(),
                    foreground,
                    background,
                    bold: attr.bold,
                    underline: attr.underline,
                    blink: attr.blink,
                    hidden: attr.hidden,
                }),
            }

            if let Some(current) = spans.last_mut() {
                if attr.hidden {
                    current.text.push(' ');
                } else {
                    cell.push_text(&mut current.text);
                }
            }
        }

        LayoutRow {
            double_width: line.double_width,
            double_height_top: line.double_height_top,
            double_height_bottom: line.double_height_bottom,
            spans,
        }
    }
}
