//! Scroll Controller
//!
//! Keeps the view top inside `[0, top_row]`, converts wheel movement into
//! rows, follows the live edge while pinned to it, and handles ctrl+wheel
//! font zoom.

use crate::config::ViewConfig;

/// Wheel units per notch
const NOTCH: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollController {
    wheel_divisor: f64,
    zoom_step: f64,
    font_size_min: f64,
    font_size_max: f64,
}

impl ScrollController {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            wheel_divisor: if config.wheel_divisor > 0.0 {
                config.wheel_divisor
            } else {
                40.0
            },
            zoom_step: config.zoom_step,
            font_size_min: config.font_size_min,
            font_size_max: config.font_size_max.max(config.font_size_min),
        }
    }

    /// Clamp a requested view top into `[0, top_row]`
    pub fn clamp(requested: i64, top_row: usize) -> usize {
        if requested <= 0 {
            0
        } else {
            (requested as u64).min(top_row as u64) as usize
        }
    }

    /// Rows to scroll for a wheel movement; positive scrolls back in history
    pub fn wheel_rows(&self, delta_y: f64) -> i64 {
        let rows = (delta_y / self.wheel_divisor).trunc();
        if rows.is_finite() {
            rows as i64
        } else {
            0
        }
    }

    /// View top after a wheel movement
    pub fn scrolled(&self, view_top: usize, top_row: usize, delta_y: f64) -> usize {
        let requested = (view_top as i64).saturating_sub(self.wheel_rows(delta_y));
        Self::clamp(requested, top_row)
    }

    /// View top after the live screen moved from `old_top_row` to `new_top_row`
    ///
    /// A view sitting on the live edge stays on it; any other view keeps its
    /// position unless that falls past the new edge.
    pub fn follow(view_top: usize, old_top_row: usize, new_top_row: usize) -> usize {
        if view_top == old_top_row {
            new_top_row
        } else {
            view_top.min(new_top_row)
        }
    }

    /// Font size after ctrl+wheel; one notch up grows by `1 / zoom_step`
    pub fn zoom(&self, size: f64, delta_y: f64) -> f64 {
        let notches = delta_y / NOTCH;
        let zoomed = size / self.zoom_step.powf(notches);
        if zoomed.is_finite() {
            zoomed.clamp(self.font_size_min, self.font_size_max)
        } else {
            size.clamp(self.font_size_min, self.font_size_max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ScrollController {
        ScrollController::new(&ViewConfig::default())
    }

    #[test]
    fn test_clamp() {
        assert_eq!(ScrollController::clamp(-100, 50), 0);
        assert_eq!(ScrollController::clamp(150, 50), 50);
        assert_eq!(ScrollController::clamp(20, 50), 20);
        assert_eq!(ScrollController::clamp(i64::MAX, 0), 0);
    }

    #[test]
    fn test_wheel_rows() {
        assert_eq!(controller().wheel_rows(120.0), 3);
        assert_eq!(controller().wheel_rows(-120.0), -3);
        assert_eq!(controller().wheel_rows(39.0), 0);
        assert_eq!(controller().wheel_rows(f64::NAN), 0);
    }

    #[test]
    fn test_scrolled() {
        assert_eq!(controller().scrolled(50, 50, 120.0), 47);
        assert_eq!(controller().scrolled(47, 50, -240.0), 50);
        assert_eq!(controller().scrolled(1, 50, 240.0), 0);
    }

    #[test]
    fn test_follow_live_edge() {
        assert_eq!(ScrollController::follow(10, 10, 12), 12);
        assert_eq!(ScrollController::follow(4, 10, 12), 4);
        assert_eq!(ScrollController::follow(8, 10, 6), 6);
    }

    #[test]
    fn test_zoom_bounds() {
        let controller = controller();
        let bigger = controller.zoom(12.0, 120.0);
        assert!((bigger - 12.0 / 0.9).abs() < 1e-9);
        let smaller = controller.zoom(12.0, -120.0);
        assert!((smaller - 12.0 * 0.9).abs() < 1e-9);
        assert_eq!(controller.zoom(19.0, 1200.0), 20.0);
        assert_eq!(controller.zoom(3.0, -1200.0), 2.0);
    }
}
