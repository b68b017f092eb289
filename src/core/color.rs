//! Color values
//!
//! Cells name their colors either by an index into the 8 base ANSI colors
//! (the bright flag selects the upper half of the 16-entry palette) or by an
//! explicit RGB triple. Paint colors are always plain `Rgb`.

use serde::{Deserialize, Serialize};

/// A 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

/// The eight base ANSI colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum AnsiColor {
    #[default]
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
}

impl AnsiColor {
    /// All colors in palette order
    pub const ALL: [AnsiColor; 8] = [
        AnsiColor::Black,
        AnsiColor::Red,
        AnsiColor::Green,
        AnsiColor::Yellow,
        AnsiColor::Blue,
        AnsiColor::Magenta,
        AnsiColor::Cyan,
        AnsiColor::White,
    ];

    /// Palette index (0-7)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Color for an SGR-style index; anything past 7 wraps into the base range
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index & 0x07) as usize]
    }
}
