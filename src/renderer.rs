//! Grid Renderer: paints the input row and the results region into the
//! frame grid and flushes the changes to the terminal.
//!
//! The renderer keeps two grids: `frame`, which drawing calls edit, and the
//! grid last shown on the terminal. A flush encodes only the differences
//! inside the regions marked dirty since the previous flush, then writes the
//! whole frame's bytes at once.

use crate::buffer::diff::{render_diff, render_full, DiffState};
use crate::buffer::{Cell, Color, Grid, Modifiers, Style};
use crate::layout::{Regions, FIRST_RESULT_ROW, INPUT_ROW};
use crate::state::Mode;
use crate::terminal::OutputBuffer;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Columns between tab stops in result lines.
const TAB_WIDTH: u16 = 8;

/// Label shown before the path in save mode.
pub const DEFAULT_SAVE_PROMPT: &str = "save to: ";

const PROMPT_STYLE: Style = Style {
    fg: Color::from_u32(0x5F_AF_D7),
    bg: Color::Default,
    modifiers: Modifiers::BOLD,
};

/// Rendering failure.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The terminal stream rejected a write.
    #[error("terminal write failed: {0}")]
    Io(#[from] io::Error),
}

/// Counters for debugging/profiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Flushes performed.
    pub frames: u64,
    /// Total bytes written to the terminal.
    pub bytes_written: u64,
    /// Cells re-encoded by the most recent flush (full redraws count every cell).
    pub last_cells_changed: usize,
}

/// Everything a flush touches, kept behind one lock.
struct Screen<W> {
    out: W,
    shown: Grid,
    dirty: Regions,
    full_redraw: bool,
    diff_state: DiffState,
    output: OutputBuffer,
    stats: RenderStats,
}

/// Draws the display into a grid and flushes it to `W`.
pub struct Renderer<W: Write> {
    frame: Grid,
    cursor: (u16, u16),
    prompt: String,
    screen: Mutex<Screen<W>>,
}

impl<W: Write> Renderer<W> {
    /// Create a renderer for a `width` x `height` terminal writing to `out`.
    ///
    /// Nothing is written until the first flush, which repaints everything.
    pub fn new(out: W, width: u16, height: u16, prompt: impl Into<String>) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            frame: Grid::new(width, height),
            cursor: (0, INPUT_ROW),
            prompt: prompt.into(),
            screen: Mutex::new(Screen {
                out,
                shown: Grid::new(width, height),
                dirty: Regions::all(),
                full_redraw: true,
                diff_state: DiffState::new(),
                output: OutputBuffer::new(),
                stats: RenderStats::default(),
            }),
        }
    }

    /// The grid as last drawn.
    pub const fn frame(&self) -> &Grid {
        &self.frame
    }

    /// Cursor position (column, row).
    pub const fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> RenderStats {
        self.lock_screen().stats
    }

    /// Give back the output stream.
    pub fn into_writer(self) -> W {
        self.screen
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .out
    }

    /// Paint row 0 with `text`, prefixed by the save prompt in save mode,
    /// blank the rest of the row, put the cursor after the text, and flush.
    pub fn render_input_row(&mut self, text: &str, mode: Mode) -> Result<(), RenderError> {
        let width = self.frame.width();
        self.frame.clear_row_from(0, INPUT_ROW);

        let mut col = 0;
        if mode == Mode::SavePath {
            col = self.frame.put_str(col, INPUT_ROW, &self.prompt, PROMPT_STYLE);
        }
        col = self.frame.put_str(col, INPUT_ROW, text, Style::PLAIN);

        self.cursor = (col.min(width - 1), INPUT_ROW);
        self.mark_dirty(Regions::INPUT);
        self.flush()
    }

    /// Replace the results region with `bytes`, one line per row, and flush.
    ///
    /// The bytes are shown as lines of text, never interpreted. Lines wider
    /// than the screen are cut off; lines past the bottom row are dropped.
    pub fn render_results(&mut self, bytes: &[u8]) -> Result<(), RenderError> {
        self.frame.clear_rows_from(FIRST_RESULT_ROW);

        let rows = FIRST_RESULT_ROW..self.frame.height();
        for (y, line) in rows.zip(bytes.split(|&b| b == b'\n')) {
            self.put_line(y, &String::from_utf8_lossy(line));
        }

        self.mark_dirty(Regions::RESULTS);
        self.flush()
    }

    /// Send pending changes to the terminal.
    ///
    /// Serialized by a lock; safe to call from any thread holding a shared
    /// reference.
    pub fn flush(&self) -> Result<(), RenderError> {
        let mut guard = self.lock_screen();
        let screen = &mut *guard;
        screen.output.clear();

        let cells_changed = if screen.full_redraw {
            render_full(&self.frame, &mut screen.output, &mut screen.diff_state);
            self.frame.len()
        } else {
            let spans = screen.dirty.row_spans(self.frame.height());
            render_diff(&screen.shown, &self.frame, &spans, &mut screen.output, &mut screen.diff_state)
                .cells_changed
        };

        let (x, y) = self.cursor;
        screen.output.cursor_move(x, y);
        screen.output.cursor_show();
        screen.diff_state.cursor_moved(x, y);

        screen.output.flush_to(&mut screen.out)?;

        screen.shown.copy_from(&self.frame);
        screen.dirty = Regions::empty();
        screen.full_redraw = false;
        screen.stats.frames += 1;
        screen.stats.bytes_written += screen.output.len() as u64;
        screen.stats.last_cells_changed = cells_changed;
        Ok(())
    }

    fn put_line(&mut self, y: u16, line: &str) {
        let width = self.frame.width();
        let mut col = 0;
        for ch in line.chars() {
            if col >= width {
                break;
            }
            if ch == '\t' {
                col = (col / TAB_WIDTH + 1).saturating_mul(TAB_WIDTH);
                continue;
            }
            let advance = self.frame.put_char(col, y, ch, Style::PLAIN);
            if advance == 0 && Cell::new(ch).display_width() > 0 {
                // Wide character that does not fit in the last column.
                break;
            }
            col += advance;
        }
    }

    fn mark_dirty(&mut self, regions: Regions) {
        let screen = self
            .screen
            .get_mut()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        screen.dirty |= regions;
    }

    fn lock_screen(&self) -> MutexGuard<'_, Screen<W>> {
        match self.screen.lock() {
            Ok(screen) => screen,
            Err(poisoned) => {
                // A flush panicked midway; what the terminal shows is unknown.
                let mut screen = poisoned.into_inner();
                screen.full_redraw = true;
                screen
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer(width: u16, height: u16) -> Renderer<Vec<u8>> {
        Renderer::new(Vec::new(), width, height, DEFAULT_SAVE_PROMPT)
    }

    #[test]
    fn test_input_row_text_and_cursor() {
        let mut r = renderer(20, 5);
        r.render_input_row(".a", Mode::Program).unwrap();
        assert_eq!(r.frame().row_text(0), ".a");
        assert_eq!(r.cursor(), (2, 0));
    }

    #[test]
    fn test_input_row_pads_previous_text() {
        let mut r = renderer(20, 5);
        r.render_input_row(".items[0]", Mode::Program).unwrap();
        r.render_input_row(".it", Mode::Program).unwrap();
        assert_eq!(r.frame().row_text(0), ".it");
        assert_eq!(r.cursor(), (3, 0));
    }

    #[test]
    fn test_input_row_cursor_uses_display_width() {
        let mut r = renderer(20, 5);
        r.render_input_row(".日本", Mode::Program).unwrap();
        assert_eq!(r.cursor(), (5, 0));
    }

    #[test]
    fn test_input_row_truncates_and_clamps_cursor() {
        let mut r = renderer(4, 3);
        r.render_input_row(".abcdef", Mode::Program).unwrap();
        assert_eq!(r.frame().row_text(0), ".abc");
        assert_eq!(r.cursor(), (3, 0));
    }

    #[test]
    fn test_save_prompt_row() {
        let mut r = renderer(30, 3);
        r.render_input_row("out.json", Mode::SavePath).unwrap();
        assert_eq!(r.frame().row_text(0), "save to: out.json");
        assert_eq!(r.cursor(), (17, 0));
        let label = r.frame().get(0, 0).unwrap();
        assert!(label.modifiers().contains(Modifiers::BOLD));
        assert_eq!(r.frame().get(9, 0).unwrap().modifiers(), Modifiers::empty());
    }

    #[test]
    fn test_results_fill_exactly_n_rows() {
        let mut r = renderer(10, 8);
        r.render_results(b"one\ntwo\nthree\nfour\nfive\n").unwrap();
        r.render_results(b"{\n  \"a\": 1\n}\n").unwrap();

        assert_eq!(r.frame().row_text(1), "{");
        assert_eq!(r.frame().row_text(2), "  \"a\": 1");
        assert_eq!(r.frame().row_text(3), "}");
        for y in 4..8 {
            assert_eq!(r.frame().row_text(y), "", "row {y} should be cleared");
        }
    }

    #[test]
    fn test_results_leave_input_row_alone() {
        let mut r = renderer(10, 4);
        r.render_input_row(".", Mode::Program).unwrap();
        r.render_results(b"1\n").unwrap();
        assert_eq!(r.frame().row_text(0), ".");
        assert_eq!(r.cursor(), (1, 0));
    }

    #[test]
    fn test_results_truncate_and_drop_overflow() {
        let mut r = renderer(4, 3);
        r.render_results(b"abcdefgh\nijkl\nmnop\n").unwrap();
        assert_eq!(r.frame().row_text(1), "abcd");
        assert_eq!(r.frame().row_text(2), "ijkl");
    }

    #[test]
    fn test_results_last_line_without_newline() {
        let mut r = renderer(10, 4);
        r.render_results(b"1\n2").unwrap();
        assert_eq!(r.frame().row_text(2), "2");
    }

    #[test]
    fn test_results_wide_and_invalid_utf8() {
        let mut r = renderer(10, 4);
        r.render_results("\"日本\"\n".as_bytes()).unwrap();
        assert_eq!(r.frame().row_text(1), "\"日本\"");
        assert!(r.frame().get(2, 1).unwrap().is_wide_continuation());

        r.render_results(b"a\xffb\r\n").unwrap();
        assert_eq!(r.frame().row_text(1), "a\u{fffd}b");
    }

    #[test]
    fn test_results_expand_tabs() {
        let mut r = renderer(20, 3);
        r.render_results(b"a\tb\n").unwrap();
        assert_eq!(r.frame().row_text(1), "a       b");
    }

    #[test]
    fn test_first_flush_is_full_redraw() {
        let mut r = renderer(5, 3);
        r.render_input_row(".", Mode::Program).unwrap();
        let stats = r.stats();
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.last_cells_changed, 15);

        let out = r.into_writer();
        assert!(String::from_utf8_lossy(&out).contains("\x1b[2J"));
    }

    #[test]
    fn test_keystroke_only_touches_input_row() {
        let mut r = renderer(20, 10);
        r.render_input_row(".", Mode::Program).unwrap();
        r.render_results(b"{\n  \"a\": 1\n}\n").unwrap();
        r.render_input_row(".a", Mode::Program).unwrap();

        let stats = r.stats();
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.last_cells_changed, 1);
    }

    #[test]
    fn test_unchanged_results_emit_no_cells() {
        let mut r = renderer(20, 10);
        r.render_results(b"1\n").unwrap();
        r.render_results(b"1\n").unwrap();
        assert_eq!(r.stats().last_cells_changed, 0);
    }

    #[test]
    fn test_flush_places_cursor() {
        let mut r = renderer(20, 4);
        r.render_input_row(".", Mode::Program).unwrap();
        r.render_input_row(".ab", Mode::Program).unwrap();
        let out = String::from_utf8(r.into_writer()).unwrap();
        assert!(out.ends_with("\x1b[1;4H\x1b[?25h"));
    }

    #[test]
    fn test_flush_is_shared_across_threads() {
        let mut r = renderer(10, 3);
        r.render_results(b"x\n").unwrap();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| r.flush().unwrap());
            }
        });
        assert_eq!(r.stats().frames, 5);
    }

    #[test]
    fn test_write_failure_is_reported() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut r = Renderer::new(Broken, 10, 3, DEFAULT_SAVE_PROMPT);
        assert!(matches!(r.render_results(b"1\n"), Err(RenderError::Io(_))));
    }
}
