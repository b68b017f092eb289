//! Font description and cell measurement
//!
//! The cell size is measured once per font by asking the paint sink for the
//! extent of a reference glyph. Changing family, size, weight or style
//! triggers a new measurement.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::geometry::CellSize;
use super::paint::PaintSink;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// The font the terminal draws with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    /// Size in points
    pub size: f64,
    #[serde(default)]
    pub weight: FontWeight,
    #[serde(default)]
    pub style: FontStyle,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "monospace".to_string(),
            size: 12.0,
            weight: FontWeight::Normal,
            style: FontStyle::Normal,
        }
    }
}

/// Cached cell size for the current font
#[derive(Debug, Clone)]
pub struct CellMetrics {
    reference: String,
    measured: Option<(FontSpec, CellSize)>,
}

impl CellMetrics {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            measured: None,
        }
    }

    /// Last valid measurement, if any
    pub fn cell_size(&self) -> Option<CellSize> {
        self.measured.as_ref().map(|(_, size)| *size)
    }

    /// Measure the reference glyph if `font` differs from the measured one
    ///
    /// A sink reporting an unusable size leaves the previous measurement in
    /// place.
    pub fn refresh<P: PaintSink + ?Sized>(&mut self, font: &FontSpec, sink: &mut P) -> Option<CellSize> {
        if let Some((measured_font, size)) = &self.measured {
            if measured_font == font {
                return Some(*size);
            }
        }

        let size = sink.measure_glyph(&self.reference, font);
        if !size.is_valid() {
            warn!(
                width = size.width,
                height = size.height,
                "glyph measurement unusable, keeping previous cell size"
            );
            return self.cell_size();
        }

        debug!(
            family = %font.family,
            font_size = font.size,
            width = size.width,
            height = size.height,
            "measured cell size"
        );
        self.measured = Some((font.clone(), size));
        Some(size)
    }
}
