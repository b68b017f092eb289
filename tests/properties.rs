//! Property-based invariant tests for the view layer
//!
//! 1. Adjacent spans never share a style.
//! 2. Pointer mapping is clamped and stable under re-mapping.
//! 3. Selection ranges do not depend on drag direction.
//! 4. Reverse video and per-cell reverse cancel out.
//! 5. Scroll requests always land inside `[0, top_row]`.
//! 6. A view on the live edge stays on it as output arrives.
//! 7. Any tracking mode disables local selection.

mod common;

use common::{at_cell, rendered_view, CELL};
use proptest::prelude::*;
use termview::core::{AnsiColor, BufferLine, Cell, TerminalAttribute, TextPosition, TextRange};
use termview::engine::{MouseModes, TerminalEngine};
use termview::input::{PointerButtons, PointerMapper};
use termview::render::{AttributeResolver, LayoutBuilder, Point};
use termview::view::ScrollController;
use termview::MemoryClipboard;

// ── Helpers ─────────────────────────────────────────────────────────────

fn attribute_strategy() -> impl Strategy<Value = TerminalAttribute> {
    (0u8..8, 0u8..8, any::<[bool; 6]>()).prop_map(|(fg, bg, flags)| TerminalAttribute {
        foreground: AnsiColor::from_index(fg),
        background: AnsiColor::from_index(bg),
        bright: flags[0],
        reverse: flags[1],
        underline: flags[2],
        blink: flags[3],
        bold: flags[4],
        hidden: flags[5],
        ..TerminalAttribute::default()
    })
}

/// Lines drawn from a tiny attribute alphabet so runs actually form
fn line_strategy() -> impl Strategy<Value = BufferLine> {
    let palette = prop::collection::vec(attribute_strategy(), 1..4);
    (palette, 1usize..60).prop_flat_map(|(palette, len)| {
        let count = palette.len();
        prop::collection::vec((0..count, prop::char::range('a', 'e')), len).prop_map(move |cells| {
            BufferLine::from_cells(
                cells
                    .into_iter()
                    .map(|(i, ch)| Cell::with_attributes(ch, palette[i]))
                    .collect(),
            )
        })
    })
}

fn position_strategy() -> impl Strategy<Value = TextPosition> {
    (0usize..200, 0usize..200).prop_map(|(column, row)| TextPosition::new(column, row))
}

fn tracking_modes() -> impl Strategy<Value = MouseModes> {
    any::<[bool; 5]>()
        .prop_filter("some tracking flag", |f| f[0] || f[1] || f[2] || f[3])
        .prop_map(|f| MouseModes {
            x10: f[0],
            x11: f[1],
            cell_motion: f[2],
            all_motion: f[3],
            sgr: f[4],
        })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Span minimality
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn adjacent_spans_differ(
        line in line_strategy(),
        reverse_video in any::<bool>(),
        a in position_strategy(),
        b in position_strategy(),
    ) {
        let selection = TextRange::new(
            TextPosition::new(a.column % 60, a.row % 2),
            TextPosition::new(b.column % 60, b.row % 2),
        );
        let builder = LayoutBuilder::new(AttributeResolver::new(reverse_video), Some(&selection));
        let row = builder.build_row(&line, 0, 80);

        let covered: usize = row.spans.iter().map(|s| s.columns).sum();
        prop_assert_eq!(covered, line.len());

        for pair in row.spans.windows(2) {
            let (left, right) = (&pair[0], &pair[1]);
            prop_assert_eq!(left.end_column(), right.start_column);
            prop_assert!(
                (left.foreground, left.background, left.underline, left.bold, left.blink)
                    != (right.foreground, right.background, right.underline, right.bold, right.blink),
                "adjacent spans share a style: {:?} {:?}", left, right
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Pointer mapping clamps and is stable
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn to_cell_clamped_and_stable(
        x in -1000.0f64..2000.0,
        y in -1000.0f64..2000.0,
        columns in 1usize..200,
        rows in 1usize..100,
    ) {
        let mapper = PointerMapper::new(CELL, columns, rows, 0.0);
        let cell = mapper.to_cell(Point::new(x, y));
        prop_assert!(cell.column < columns);
        prop_assert!(cell.row < rows);

        let center = Point::new(
            cell.column as f64 * CELL.width + CELL.width / 2.0,
            cell.row as f64 * CELL.height + CELL.height / 2.0,
        );
        prop_assert_eq!(mapper.to_cell(center), cell);
        prop_assert!(mapper.contains(center));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Selection normalization is symmetric
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn selection_symmetric(a in position_strategy(), b in position_strategy()) {
        let forward = TextRange::new(a, b);
        let backward = TextRange::new(b, a);
        prop_assert_eq!(forward, backward);
        prop_assert!(forward.start() <= forward.end());
        prop_assert!(forward.contains(a.column, a.row));
        prop_assert!(forward.contains(b.column, b.row));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Reverse video involution
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reverse_video_involution(attr in attribute_strategy(), selected in any::<bool>()) {
        let mut flipped = attr;
        flipped.reverse = !attr.reverse;

        let plain = AttributeResolver::new(false);
        let reversed = AttributeResolver::new(true);
        prop_assert_eq!(reversed.colors(&flipped, selected), plain.colors(&attr, selected));

        let (fg, bg) = plain.colors(&attr, selected);
        prop_assert_eq!(reversed.colors(&attr, selected), (bg, fg));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Scroll clamp
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scroll_clamped(requested in any::<i64>(), top_row in 0usize..100_000) {
        let clamped = ScrollController::clamp(requested, top_row);
        prop_assert!(clamped <= top_row);
        prop_assert_eq!(ScrollController::clamp(top_row as i64 + 100, top_row), top_row);
        prop_assert_eq!(ScrollController::clamp(-100, top_row), 0);
        prop_assert_eq!(ScrollController::clamp(clamped as i64, top_row), clamped);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Pinned-to-bottom tracking
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn live_edge_is_followed(batches in prop::collection::vec(0usize..8, 1..10)) {
        let (view, _) = rendered_view(20, 3, MemoryClipboard::new());
        let sink = view.data_sink();
        for lines in batches {
            sink.apply("x\r\n".repeat(lines).as_bytes());
            prop_assert_eq!(view.view_top(), view.with_engine(|engine| engine.top_row()));
        }
    }

    #[test]
    fn follow_keeps_scrolled_position(view_top in 0usize..50, old_top in 0usize..50, grow in 0usize..50) {
        let new_top = old_top + grow;
        let followed = ScrollController::follow(view_top, old_top, new_top);
        if view_top == old_top {
            prop_assert_eq!(followed, new_top);
        } else {
            prop_assert_eq!(followed, view_top.min(new_top));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Mouse-mode gating of selection
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn tracking_blocks_selection(
        modes in tracking_modes(),
        start in (0usize..20, 0usize..3),
        end in (0usize..20, 0usize..3),
    ) {
        let (mut view, _) = rendered_view(20, 3, MemoryClipboard::new());
        view.with_engine_mut(|engine| engine.set_mouse_modes(modes));

        view.on_pointer_pressed(at_cell(start.0, start.1, PointerButtons::LEFT));
        view.on_pointer_moved(at_cell(end.0, end.1, PointerButtons::LEFT));
        prop_assert_eq!(view.selection(), None);
    }
}
