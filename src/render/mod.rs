//! Rendering
//!
//! Turns engine buffer rows into layout rows and paints them through a
//! host-provided `PaintSink`. Nothing here owns a window or a GPU surface.

mod geometry;
mod grid;
mod layout;
mod metrics;
mod paint;
mod palette;
mod record;
mod resolve;

pub use geometry::{CellSize, Point, Rect};
pub use grid::GridGeometry;
pub use layout::{BackgroundRun, LayoutBuilder, LayoutRow, Span, TextRun};
pub use metrics::{CellMetrics, FontSpec, FontStyle, FontWeight};
pub use paint::{paint_frame, CursorDescriptor, Frame, PaintSink, TextStyle};
pub use palette::{palette_color, ANSI_PALETTE};
pub use record::{DrawCommand, PaintRecorder};
pub use resolve::AttributeResolver;
