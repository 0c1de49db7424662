//! Diffing Engine: Generate minimal ANSI sequences from grid changes.
//!
//! The renderer keeps the grid last shown on the terminal and the grid being
//! drawn. Flushing compares the two over the dirty row spans only, emitting:
//! 1. cursor moves only when the next changed cell is not adjacent
//! 2. color/modifier changes only when they differ from the last emitted
//!
//! All output is accumulated in one [`OutputBuffer`] and written once.

use super::{Cell, Color, Grid, Modifiers};
use crate::terminal::OutputBuffer;
use std::ops::Range;

/// Tracks the terminal state as left by the last emitted sequence.
#[derive(Debug, Clone)]
pub struct DiffState {
    cursor_x: u16,
    cursor_y: u16,
    fg: Option<Color>,
    bg: Option<Color>,
    modifiers: Option<Modifiers>,
}

impl Default for DiffState {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffState {
    /// Create a new diff state with unknown terminal state.
    pub const fn new() -> Self {
        Self {
            cursor_x: 0,
            cursor_y: 0,
            fg: None,
            bg: None,
            modifiers: None,
        }
    }

    /// Forget everything (e.g. after a full redraw or cursor repositioning).
    pub const fn reset(&mut self) {
        self.fg = None;
        self.bg = None;
        self.modifiers = None;
        // Force cursor move on next write
        self.cursor_x = u16::MAX;
        self.cursor_y = u16::MAX;
    }

    /// Record a cursor move emitted outside the diff.
    pub const fn cursor_moved(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    fn style_into(&mut self, output: &mut OutputBuffer, cell: &Cell) {
        let wanted = cell.modifiers();
        let removed = self.modifiers.unwrap_or(Modifiers::empty()).difference(wanted);
        if !removed.is_empty() {
            // SGR has no portable per-attribute "off"; reset drops colors too.
            output.reset_attrs();
            self.fg = None;
            self.bg = None;
            self.modifiers = None;
        }

        if self.fg != Some(cell.fg()) {
            output.set_fg(cell.fg());
            self.fg = Some(cell.fg());
        }
        if self.bg != Some(cell.bg()) {
            output.set_bg(cell.bg());
            self.bg = Some(cell.bg());
        }
        if self.modifiers != Some(wanted) {
            let added = wanted.difference(self.modifiers.unwrap_or(Modifiers::empty()));
            output.set_modifiers(added);
            self.modifiers = Some(wanted);
        }
    }
}

/// Statistics from a diff pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Number of cells that were different.
    pub cells_changed: usize,
    /// Number of cursor move sequences emitted.
    pub cursor_moves: usize,
}

/// Encode the cells of `next` that differ from `current`, restricted to the
/// given row spans.
pub fn render_diff(
    current: &Grid,
    next: &Grid,
    rows: &[Range<u16>],
    output: &mut OutputBuffer,
    state: &mut DiffState,
) -> DiffResult {
    debug_assert_eq!(current.width(), next.width());
    debug_assert_eq!(current.height(), next.height());

    let mut result = DiffResult::default();
    let width = next.width();

    for span in rows {
        for y in span.start..span.end.min(next.height()) {
            for x in 0..width {
                let (Some(old), Some(new)) = (current.get(x, y), next.get(x, y)) else {
                    continue;
                };
                if old == new || new.is_wide_continuation() {
                    continue;
                }

                result.cells_changed += 1;

                if state.cursor_y != y || state.cursor_x != x {
                    output.cursor_move(x, y);
                    state.cursor_x = x;
                    state.cursor_y = y;
                    result.cursor_moves += 1;
                }

                state.style_into(output, new);
                output.write_char(new.ch());
                state.cursor_x = state.cursor_x.saturating_add(u16::from(new.display_width().max(1)));
            }
        }
    }

    result
}

/// Encode the whole grid without diffing.
///
/// Used for the first frame, when the terminal contents are unknown.
pub fn render_full(grid: &Grid, output: &mut OutputBuffer, state: &mut DiffState) {
    state.reset();
    output.cursor_hide();
    output.reset_attrs();
    output.clear_screen();
    output.cursor_move(0, 0);
    state.cursor_x = 0;
    state.cursor_y = 0;

    for (y, row) in (0u16..).zip(grid.rows()) {
        if y > 0 {
            output.cursor_move(0, y);
            state.cursor_x = 0;
            state.cursor_y = y;
        }
        for cell in row.iter().filter(|cell| !cell.is_wide_continuation()) {
            state.style_into(output, cell);
            output.write_char(cell.ch());
            state.cursor_x = state.cursor_x.saturating_add(u16::from(cell.display_width().max(1)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Style;

    fn all_rows(grid: &Grid) -> Vec<Range<u16>> {
        vec![0..grid.height()]
    }

    #[test]
    fn test_diff_identical_grids() {
        let a = Grid::new(10, 5);
        let b = Grid::new(10, 5);
        let mut output = OutputBuffer::new();
        let mut state = DiffState::new();

        let result = render_diff(&a, &b, &all_rows(&a), &mut output, &mut state);

        assert_eq!(result.cells_changed, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_diff_single_cell_change() {
        let a = Grid::new(10, 5);
        let mut b = Grid::new(10, 5);
        b.put_char(5, 2, 'X', Style::PLAIN);

        let mut output = OutputBuffer::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, &all_rows(&a), &mut output, &mut state);

        assert_eq!(result.cells_changed, 1);
        let text = String::from_utf8_lossy(output.as_bytes());
        assert!(text.starts_with("\x1b[3;6H"));
        assert!(text.ends_with('X'));
    }

    #[test]
    fn test_diff_adjacent_cells_no_cursor_move() {
        let a = Grid::new(10, 5);
        let mut b = Grid::new(10, 5);
        b.put_str(0, 0, "ABC", Style::PLAIN);

        let mut output = OutputBuffer::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, &all_rows(&a), &mut output, &mut state);

        assert_eq!(result.cells_changed, 3);
        // Cursor starts at (0,0) and cells are adjacent
        assert_eq!(result.cursor_moves, 0);
    }

    #[test]
    fn test_diff_wide_char_advances_two_columns() {
        let a = Grid::new(10, 1);
        let mut b = Grid::new(10, 1);
        b.put_str(0, 0, "日x", Style::PLAIN);

        let mut output = OutputBuffer::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, &all_rows(&a), &mut output, &mut state);

        assert_eq!(result.cells_changed, 2);
        assert_eq!(result.cursor_moves, 0);
    }

    #[test]
    fn test_diff_row_span_limits_scan() {
        let a = Grid::new(20, 10);
        let mut b = Grid::new(20, 10);
        b.put_char(0, 0, 'X', Style::PLAIN);
        b.put_char(10, 5, 'Y', Style::PLAIN);

        let mut output = OutputBuffer::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, &[1..10], &mut output, &mut state);

        // Row 0 is outside the span
        assert_eq!(result.cells_changed, 1);
        assert!(!String::from_utf8_lossy(output.as_bytes()).contains('X'));
    }

    #[test]
    fn test_diff_modifier_removal_resets() {
        let bold = Style {
            modifiers: Modifiers::BOLD,
            ..Style::PLAIN
        };
        let a = Grid::new(4, 1);
        let mut b = Grid::new(4, 1);
        b.put_char(0, 0, 'a', bold);
        b.put_char(1, 0, 'b', Style::PLAIN);

        let mut output = OutputBuffer::new();
        let mut state = DiffState::new();
        render_diff(&a, &b, &all_rows(&a), &mut output, &mut state);

        let text = String::from_utf8_lossy(output.as_bytes());
        let bold_at = text.find("\x1b[1m").unwrap();
        let reset_at = text.rfind("\x1b[0m").unwrap();
        assert!(bold_at < reset_at);
    }

    #[test]
    fn test_render_full() {
        let mut grid = Grid::new(3, 2);
        grid.put_str(0, 0, "ABC", Style::PLAIN);
        grid.put_str(0, 1, "D", Style::PLAIN);

        let mut output = OutputBuffer::new();
        let mut state = DiffState::new();
        render_full(&grid, &mut output, &mut state);

        let text = String::from_utf8_lossy(output.as_bytes());
        assert!(text.starts_with("\x1b[?25l"));
        assert!(text.contains("ABC"));
        assert!(text.contains("\x1b[2HD"));
    }
}
