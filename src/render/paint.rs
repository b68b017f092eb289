//! Frame painting
//!
//! A `Frame` is everything needed to draw one pass, captured under the
//! terminal lock. Painting happens afterwards against a host `PaintSink`.
//!
//! Order: surface fill, all row backgrounds, all row text (with underlines),
//! cursor, then the debug overlay.

use super::geometry::{CellSize, Point, Rect};
use super::layout::LayoutRow;
use super::metrics::FontSpec;
use crate::core::Rgb;

const ANNOTATION_LINE: Rgb = Rgb::new(245, 245, 220);
const ANNOTATION_TEXT: Rgb = Rgb::new(255, 255, 0);

/// How a text run is drawn
#[derive(Debug, Clone, Copy)]
pub struct TextStyle<'a> {
    pub font: &'a FontSpec,
    pub color: Rgb,
    pub bold: bool,
    /// 2.0 on double-width rows
    pub scale_x: f64,
    /// 2.0 on double-height rows
    pub scale_y: f64,
    /// The row band; glyphs outside it must not show
    pub clip: Rect,
}

/// Host drawing surface
pub trait PaintSink {
    /// Size of `reference` drawn in `font`
    fn measure_glyph(&mut self, reference: &str, font: &FontSpec) -> CellSize;

    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    fn stroke_rect(&mut self, rect: Rect, color: Rgb);

    /// Draw `text` with its top-left corner at `origin`
    fn draw_text(&mut self, origin: Point, text: &str, style: &TextStyle<'_>);

    fn draw_line(&mut self, from: Point, to: Point, color: Rgb);
}

/// Where and how to draw the cursor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorDescriptor {
    pub column: usize,
    /// Row within the visible window
    pub view_row: usize,
    pub color: Rgb,
    /// Filled when focused, outlined otherwise
    pub filled: bool,
    /// Cursor attributes carry the blink flag
    pub blink: bool,
}

/// One render pass worth of state
#[derive(Debug, Clone)]
pub struct Frame {
    pub rows: Vec<Option<LayoutRow>>,
    pub view_top: usize,
    pub font: FontSpec,
    pub cell: CellSize,
    pub padding: f64,
    pub surface_width: f64,
    pub surface_height: f64,
    /// Fill for the whole surface
    pub background: Rgb,
    pub cursor: Option<CursorDescriptor>,
    pub blink_visible: bool,
    /// Draw row guides and numbers
    pub annotate: bool,
}

impl Frame {
    /// Pixel band occupied by visible row `index`
    fn row_band(&self, index: usize) -> Rect {
        Rect::new(
            self.padding,
            self.padding + index as f64 * self.cell.height,
            self.surface_width - 2.0 * self.padding,
            self.cell.height,
        )
    }

    /// Rect covering `columns` cells from `start_column` on visible row `index`
    ///
    /// Double-height rows are two cells tall; the bottom half starts one row
    /// up so that together the halves show one glyph.
    fn run_rect(&self, row: &LayoutRow, index: usize, start_column: usize, columns: usize) -> Rect {
        let scale_x = if row.double_width { 2.0 } else { 1.0 };
        let scale_y = if row.is_double_height() { 2.0 } else { 1.0 };
        let shift = if row.double_height_bottom { 1.0 } else { 0.0 };
        Rect::new(
            self.padding + start_column as f64 * self.cell.width * scale_x,
            self.padding + (index as f64 - shift) * self.cell.height,
            columns as f64 * self.cell.width * scale_x,
            self.cell.height * scale_y,
        )
    }
}

/// Paint `frame` onto `sink`
pub fn paint_frame<P: PaintSink + ?Sized>(frame: &Frame, sink: &mut P) {
    sink.fill_rect(
        Rect::new(0.0, 0.0, frame.surface_width, frame.surface_height),
        frame.background,
    );

    for (index, row) in frame.rows.iter().enumerate() {
        let Some(row) = row else { continue };
        let band = frame.row_band(index);
        for run in row.background_runs() {
            let rect = frame.run_rect(row, index, run.start_column, run.columns);
            // backgrounds stay inside their own band
            sink.fill_rect(Rect::new(rect.x, band.y, rect.width, band.height), run.color);
        }
    }

    for (index, row) in frame.rows.iter().enumerate() {
        let Some(row) = row else { continue };
        let band = frame.row_band(index);
        let scale_x = if row.double_width { 2.0 } else { 1.0 };
        let scale_y = if row.is_double_height() { 2.0 } else { 1.0 };

        for run in row.text_runs() {
            if run.hidden || (run.blink && !frame.blink_visible) {
                continue;
            }
            let rect = frame.run_rect(row, index, run.start_column, run.columns);
            let style = TextStyle {
                font: &frame.font,
                color: run.foreground,
                bold: run.bold,
                scale_x,
                scale_y,
                clip: band,
            };
            sink.draw_text(rect.top_left(), &run.text, &style);

            if run.underline && !row.double_height_top {
                sink.draw_line(rect.bottom_left(), rect.bottom_right(), run.foreground);
            }
        }
    }

    if let Some(cursor) = &frame.cursor {
        if !cursor.blink || frame.blink_visible {
            let rect = Rect::new(
                frame.padding + cursor.column as f64 * frame.cell.width,
                frame.padding + cursor.view_row as f64 * frame.cell.height,
                frame.cell.width,
                frame.cell.height,
            );
            if cursor.filled {
                sink.fill_rect(rect, cursor.color);
            } else {
                sink.stroke_rect(rect, cursor.color);
            }
        }
    }

    if frame.annotate {
        annotate(frame, sink);
    }
}

/// Row guides and row numbers along the right edge
fn annotate<P: PaintSink + ?Sized>(frame: &Frame, sink: &mut P) {
    let small = FontSpec {
        size: frame.font.size / 2.0,
        ..frame.font.clone()
    };
    for index in 0..frame.rows.len() {
        let band = frame.row_band(index);
        sink.draw_line(
            Point::new(0.0, band.y),
            Point::new(frame.surface_width, band.y),
            ANNOTATION_LINE,
        );

        let label = index.to_string();
        let x = frame.surface_width - frame.cell.width / 2.0 * label.len() as f64;
        let style = TextStyle {
            font: &small,
            color: ANNOTATION_TEXT,
            bold: false,
            scale_x: 1.0,
            scale_y: 1.0,
            clip: band,
        };
        sink.draw_text(Point::new(x, band.y), &label, &style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AnsiColor, BufferLine, TerminalAttribute};
    use crate::render::{AttributeResolver, DrawCommand, LayoutBuilder, PaintRecorder};

    const CELL: CellSize = CellSize::new(8.0, 16.0);

    fn frame_with(rows: Vec<Option<LayoutRow>>) -> Frame {
        Frame {
            rows,
            view_top: 0,
            font: FontSpec::default(),
            cell: CELL,
            padding: 0.0,
            surface_width: 640.0,
            surface_height: 384.0,
            background: Rgb::new(0, 0, 0),
            cursor: None,
            blink_visible: true,
            annotate: false,
        }
    }

    fn row_of(line: &BufferLine) -> LayoutRow {
        LayoutBuilder::new(AttributeResolver::default(), None).build_row(line, 0, 80)
    }

    #[test]
    fn test_paints_background_then_text() {
        let line = BufferLine::from_text("hi", TerminalAttribute::with_foreground(AnsiColor::Green));
        let mut sink = PaintRecorder::new(CELL);
        paint_frame(&frame_with(vec![Some(row_of(&line))]), &mut sink);

        let commands = sink.commands();
        assert!(matches!(commands[0], DrawCommand::Fill { .. }));
        assert!(matches!(commands[1], DrawCommand::Fill { .. }));
        match &commands[2] {
            DrawCommand::Text { origin, text, color, .. } => {
                assert_eq!(*origin, Point::new(0.0, 0.0));
                assert_eq!(text, "hi");
                assert_eq!(*color, Rgb::new(0, 205, 0));
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_absent_rows_are_skipped() {
        let mut sink = PaintRecorder::new(CELL);
        paint_frame(&frame_with(vec![None, None]), &mut sink);
        assert_eq!(sink.commands().len(), 1);
    }

    #[test]
    fn test_blink_hidden_phase_skips_text() {
        let mut attr = TerminalAttribute::default();
        attr.blink = true;
        let line = BufferLine::from_text("bl", attr);
        let mut frame = frame_with(vec![Some(row_of(&line))]);

        let mut sink = PaintRecorder::new(CELL);
        paint_frame(&frame, &mut sink);
        assert_eq!(sink.texts(), vec!["bl"]);

        frame.blink_visible = false;
        let mut sink = PaintRecorder::new(CELL);
        paint_frame(&frame, &mut sink);
        assert!(sink.texts().is_empty());
    }

    #[test]
    fn test_underline_drawn_at_bottom() {
        let mut attr = TerminalAttribute::default();
        attr.underline = true;
        let line = BufferLine::from_text("ab", attr);
        let mut sink = PaintRecorder::new(CELL);
        paint_frame(&frame_with(vec![None, Some(row_of(&line))]), &mut sink);

        let lines: Vec<_> = sink
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect();
        assert_eq!(lines, vec![(Point::new(0.0, 32.0), Point::new(16.0, 32.0))]);
    }

    #[test]
    fn test_double_width_scales_x() {
        let mut line = BufferLine::from_text("W", TerminalAttribute::default());
        line.double_width = true;
        let mut sink = PaintRecorder::new(CELL);
        paint_frame(&frame_with(vec![Some(row_of(&line))]), &mut sink);

        let fills: Vec<Rect> = sink
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Fill { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(fills[1], Rect::new(0.0, 0.0, 16.0, 16.0));
    }

    #[test]
    fn test_double_height_bottom_shifts_up() {
        let mut top = BufferLine::from_text("T", TerminalAttribute::default());
        top.double_height_top = true;
        let mut bottom = top.clone();
        bottom.double_height_top = false;
        bottom.double_height_bottom = true;
        let mut sink = PaintRecorder::new(CELL);
        paint_frame(&frame_with(vec![Some(row_of(&top)), Some(row_of(&bottom))]), &mut sink);

        let origins: Vec<(Point, f64)> = sink
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { origin, scale_y, .. } => Some((*origin, *scale_y)),
                _ => None,
            })
            .collect();
        assert_eq!(origins, vec![(Point::new(0.0, 0.0), 2.0), (Point::new(0.0, 0.0), 2.0)]);
    }

    #[test]
    fn test_cursor_filled_or_outlined() {
        let mut frame = frame_with(vec![]);
        frame.cursor = Some(CursorDescriptor {
            column: 3,
            view_row: 2,
            color: Rgb::new(205, 205, 205),
            filled: true,
            blink: false,
        });
        let mut sink = PaintRecorder::new(CELL);
        paint_frame(&frame, &mut sink);
        assert_eq!(
            sink.commands().last(),
            Some(&DrawCommand::Fill {
                rect: Rect::new(24.0, 32.0, 8.0, 16.0),
                color: Rgb::new(205, 205, 205),
            })
        );

        if let Some(cursor) = frame.cursor.as_mut() {
            cursor.filled = false;
        }
        let mut sink = PaintRecorder::new(CELL);
        paint_frame(&frame, &mut sink);
        assert!(matches!(sink.commands().last(), Some(DrawCommand::Stroke { .. })));
    }

    #[test]
    fn test_annotations() {
        let mut frame = frame_with(vec![None, None, None]);
        frame.annotate = true;
        let mut sink = PaintRecorder::new(CELL);
        paint_frame(&frame, &mut sink);
        assert_eq!(sink.texts(), vec!["0", "1", "2"]);
    }
}
