//! The fixed 16-color ANSI palette

use crate::core::{AnsiColor, Rgb};

/// Base colors 0-7 followed by their bright variants 8-15
pub const ANSI_PALETTE: [Rgb; 16] = [
    Rgb::new(0, 0, 0),       // 0: Black
    Rgb::new(205, 0, 0),     // 1: Red
    Rgb::new(0, 205, 0),     // 2: Green
    Rgb::new(205, 205, 0),   // 3: Yellow
    Rgb::new(0, 0, 205),     // 4: Blue
    Rgb::new(205, 0, 205),   // 5: Magenta
    Rgb::new(0, 205, 205),   // 6: Cyan
    Rgb::new(205, 205, 205), // 7: White
    Rgb::new(127, 127, 127), // 8: Bright Black
    Rgb::new(255, 0, 0),     // 9: Bright Red
    Rgb::new(0, 255, 0),     // 10: Bright Green
    Rgb::new(255, 255, 0),   // 11: Bright Yellow
    Rgb::new(92, 92, 255),   // 12: Bright Blue
    Rgb::new(255, 0, 255),   // 13: Bright Magenta
    Rgb::new(0, 255, 255),   // 14: Bright Cyan
    Rgb::new(255, 255, 255), // 15: Bright White
];

/// Palette lookup, optionally in the bright half
pub fn palette_color(color: AnsiColor, bright: bool) -> Rgb {
    let index = color.index() + if bright { 8 } else { 0 };
    ANSI_PALETTE[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_lookup() {
        assert_eq!(palette_color(AnsiColor::Black, false), Rgb::new(0, 0, 0));
        assert_eq!(palette_color(AnsiColor::Red, false), Rgb::new(205, 0, 0));
        assert_eq!(palette_color(AnsiColor::Blue, true), Rgb::new(92, 92, 255));
        assert_eq!(palette_color(AnsiColor::White, true), Rgb::new(255, 255, 255));
    }
}
