//! Terminal Cell
//!
//! Represents a single cell in the terminal grid, containing a character,
//! any trailing combining characters, and its style attributes.

use serde::{Deserialize, Serialize};

use super::color::{AnsiColor, Rgb};

/// Style descriptor for a cell
///
/// Two cells paint identically only if their attributes compare equal, so
/// this is a plain value type with structural equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerminalAttribute {
    /// Foreground palette color
    pub foreground: AnsiColor,
    /// Background palette color
    pub background: AnsiColor,
    /// Explicit foreground, overrides the palette color
    pub foreground_rgb: Option<Rgb>,
    /// Explicit background, overrides the palette color
    pub background_rgb: Option<Rgb>,
    /// Selects the bright half of the palette for the foreground
    pub bright: bool,
    pub reverse: bool,
    pub underline: bool,
    pub blink: bool,
    pub bold: bool,
    pub hidden: bool,
}

impl Default for TerminalAttribute {
    fn default() -> Self {
        Self {
            foreground: AnsiColor::White,
            background: AnsiColor::Black,
            foreground_rgb: None,
            background_rgb: None,
            bright: false,
            reverse: false,
            underline: false,
            blink: false,
            bold: false,
            hidden: false,
        }
    }
}

impl TerminalAttribute {
    /// Attribute with the given palette foreground on the default background
    pub fn with_foreground(foreground: AnsiColor) -> Self {
        Self {
            foreground,
            ..Default::default()
        }
    }

    /// Attribute with explicit RGB colors
    pub fn with_rgb(foreground: Rgb, background: Rgb) -> Self {
        Self {
            foreground_rgb: Some(foreground),
            background_rgb: Some(background),
            ..Default::default()
        }
    }
}

/// A single cell in the terminal grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Base character
    pub ch: char,
    /// Combining characters that follow the base character
    pub combining: String,
    /// Style attributes
    pub attributes: TerminalAttribute,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            combining: String::new(),
            attributes: TerminalAttribute::default(),
        }
    }
}

impl Cell {
    /// Create a new cell with a single character
    pub fn new(ch: char) -> Self {
        Self {
            ch,
            ..Default::default()
        }
    }

    /// Create a new cell with a character and attributes
    pub fn with_attributes(ch: char, attributes: TerminalAttribute) -> Self {
        Self {
            ch,
            combining: String::new(),
            attributes,
        }
    }

    /// Append the displayed text (base char plus combining chars) to `out`
    pub fn push_text(&self, out: &mut String) {
        out.push(self.ch);
        out.push_str(&self.combining);
    }

    /// Check if this cell shows nothing but a blank
    pub fn is_blank(&self) -> bool {
        self.ch == ' ' && self.combining.is_empty()
    }
}
