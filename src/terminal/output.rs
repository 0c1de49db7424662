//! `OutputBuffer`: Single-write output buffer for ANSI sequences.

use crate::buffer::{Color, Modifiers};
use std::io::Write;

/// Pre-allocated buffer for building a frame's escape sequences.
///
/// A frame is assembled here and handed to the terminal in one `write_all`
/// so a half-drawn frame is never visible.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical terminal (16KB).
    pub fn new() -> Self {
        Self::with_capacity(16 * 1024)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write one character as UTF-8.
    #[inline]
    pub fn write_char(&mut self, ch: char) {
        let mut utf8 = [0u8; 4];
        self.data.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
    }

    /// Move cursor to (x, y), 0-indexed.
    ///
    /// Uses the shortest form: `CSI H` for home, `CSI row H` for column 1.
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        // ANSI uses 1-indexed positions
        let row = u32::from(y) + 1;
        let col = u32::from(x) + 1;

        if row == 1 && col == 1 {
            self.data.extend_from_slice(b"\x1b[H");
        } else if col == 1 {
            let _ = write!(self.data, "\x1b[{row}H");
        } else {
            let _ = write!(self.data, "\x1b[{row};{col}H");
        }
    }

    /// Hide cursor.
    #[inline]
    pub fn cursor_hide(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25l");
    }

    /// Show cursor.
    #[inline]
    pub fn cursor_show(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25h");
    }

    /// Set foreground color.
    pub fn set_fg(&mut self, color: Color) {
        match color {
            Color::Default => self.data.extend_from_slice(b"\x1b[39m"),
            Color::Rgb(r, g, b) => {
                let _ = write!(self.data, "\x1b[38;2;{r};{g};{b}m");
            }
        }
    }

    /// Set background color.
    pub fn set_bg(&mut self, color: Color) {
        match color {
            Color::Default => self.data.extend_from_slice(b"\x1b[49m"),
            Color::Rgb(r, g, b) => {
                let _ = write!(self.data, "\x1b[48;2;{r};{g};{b}m");
            }
        }
    }

    /// Emit SGR sequences turning on each modifier in the set.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        if modifiers.contains(Modifiers::BOLD) {
            self.data.extend_from_slice(b"\x1b[1m");
        }
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Clear the entire screen.
    #[inline]
    pub fn clear_screen(&mut self) {
        self.data.extend_from_slice(b"\x1b[2J");
    }

    /// Flush to a writer in a single write.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
