//! Attribute resolution
//!
//! Turns a cell's attributes into concrete paint colors. Screen-wide reverse
//! video, the cell's own reverse flag and selection highlighting all use the
//! same mechanism: each one flips which rule paints the foreground.

use super::palette::palette_color;
use crate::core::{Rgb, TerminalAttribute};

/// Resolves attributes to paint colors for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeResolver {
    /// DECSCNM as reported by the engine
    pub reverse_video: bool,
}

impl AttributeResolver {
    pub fn new(reverse_video: bool) -> Self {
        Self { reverse_video }
    }

    fn swapped(&self, attribute: &TerminalAttribute, selected: bool) -> bool {
        self.reverse_video ^ attribute.reverse ^ selected
    }

    pub fn foreground(&self, attribute: &TerminalAttribute, selected: bool) -> Rgb {
        if self.swapped(attribute, selected) {
            background_rule(attribute)
        } else {
            foreground_rule(attribute)
        }
    }

    pub fn background(&self, attribute: &TerminalAttribute, selected: bool) -> Rgb {
        if self.swapped(attribute, selected) {
            foreground_rule(attribute)
        } else {
            background_rule(attribute)
        }
    }

    /// (foreground, background) in one call
    pub fn colors(&self, attribute: &TerminalAttribute, selected: bool) -> (Rgb, Rgb) {
        let fg = foreground_rule(attribute);
        let bg = background_rule(attribute);
        if self.swapped(attribute, selected) {
            (bg, fg)
        } else {
            (fg, bg)
        }
    }
}

fn foreground_rule(attribute: &TerminalAttribute) -> Rgb {
    attribute
        .foreground_rgb
        .unwrap_or_else(|| palette_color(attribute.foreground, attribute.bright))
}

// Backgrounds have no bright variant
fn background_rule(attribute: &TerminalAttribute) -> Rgb {
    attribute
        .background_rgb
        .unwrap_or_else(|| palette_color(attribute.background, false))
}
