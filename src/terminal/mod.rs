//! Terminal ownership: raw mode, alternate screen, and frame output.
//!
//! The display is drawn on standard error so that standard output stays free
//! for the `Print` action's result stream.

mod output;

pub use output::OutputBuffer;

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};

/// The stream the interactive display is drawn on.
pub fn display_stream() -> io::Stderr {
    io::stderr()
}

/// Current terminal size as (columns, rows), never zero in either axis.
pub fn size() -> io::Result<(u16, u16)> {
    let (width, height) = terminal::size()?;
    Ok((width.max(1), height.max(1)))
}

/// Scoped acquisition of the terminal.
///
/// Acquiring switches to raw mode (and optionally the alternate screen);
/// releasing, explicitly or on drop, restores cooked mode and the cursor.
/// Release is idempotent so the explicit call on an exit path and the drop
/// that follows do not fight.
#[derive(Debug)]
pub struct TerminalGuard {
    alternate_screen: bool,
    active: bool,
}

impl TerminalGuard {
    /// Take over the terminal.
    pub fn acquire(alternate_screen: bool) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut guard = Self {
            alternate_screen,
            active: true,
        };

        let mut out = display_stream();
        if alternate_screen {
            if let Err(err) = execute!(out, EnterAlternateScreen) {
                let _ = guard.release();
                return Err(err);
            }
        }
        log::debug!("terminal acquired (alternate screen: {alternate_screen})");
        Ok(guard)
    }

    /// Give the terminal back in cooked mode.
    pub fn release(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let alternate_screen = self.alternate_screen;
        let mut out = display_stream();
        let screen = (|| {
            // Leave attributes clean for the shell even when not on the
            // alternate screen.
            out.write_all(b"\x1b[0m")?;
            if alternate_screen {
                execute!(out, LeaveAlternateScreen)?;
            }
            execute!(out, cursor::Show)
        })();
        // Raw mode is the part that leaves a shell unusable, so it is
        // restored even when the screen sequences failed.
        let raw = terminal::disable_raw_mode();
        log::debug!("terminal released");
        screen.and(raw)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            log::error!("failed to restore terminal: {err}");
        }
    }
}
