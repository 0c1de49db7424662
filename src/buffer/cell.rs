//! Cell: The atomic unit of terminal display.
//!
//! A cell holds one character plus its colors and style. Wide characters
//! (CJK, most emoji) occupy two cells: the character itself and a
//! continuation cell that the encoder skips.

use bitflags::bitflags;

/// A terminal color.
///
/// `Default` leaves the choice to the terminal's own palette, which is what
/// the query output uses so the display matches the user's theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's default foreground/background.
    #[default]
    Default,
    /// A 24-bit color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Create from a 24-bit hex color (e.g., 0x00AFFF).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::Rgb(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }
}

bitflags! {
    /// Text style modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
    }
}

bitflags! {
    /// Cell-level flags for special states.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        /// This cell is the right half of a wide character
        const WIDE_CONTINUATION = 0b0000_0001;
    }
}

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    ch: char,
    width: u8,
    fg: Color,
    bg: Color,
    modifiers: Modifiers,
    flags: CellFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// A blank cell (space with default colors).
    pub const EMPTY: Self = Self {
        ch: ' ',
        width: 1,
        fg: Color::Default,
        bg: Color::Default,
        modifiers: Modifiers::empty(),
        flags: CellFlags::empty(),
    };

    /// Create a cell holding `ch` with default colors.
    ///
    /// The display width is computed once here. Characters without a
    /// defined width (control characters) report zero.
    #[inline]
    pub fn new(ch: char) -> Self {
        let width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        Self {
            ch,
            width: u8::try_from(width).unwrap_or(1),
            ..Self::EMPTY
        }
    }

    /// Create the placeholder that sits to the right of a wide character.
    #[inline]
    pub const fn wide_continuation() -> Self {
        Self {
            ch: ' ',
            width: 0,
            fg: Color::Default,
            bg: Color::Default,
            modifiers: Modifiers::empty(),
            flags: CellFlags::WIDE_CONTINUATION,
        }
    }

    /// The character shown in this cell.
    #[inline]
    pub const fn ch(&self) -> char {
        self.ch
    }

    /// Display width (0 for continuations and control characters, 1 or 2).
    #[inline]
    pub const fn display_width(&self) -> u8 {
        self.width
    }

    /// Foreground color.
    #[inline]
    pub const fn fg(&self) -> Color {
        self.fg
    }

    /// Background color.
    #[inline]
    pub const fn bg(&self) -> Color {
        self.bg
    }

    /// Style modifiers.
    #[inline]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Whether this is the right half of a wide character.
    #[inline]
    pub const fn is_wide_continuation(&self) -> bool {
        self.flags.contains(CellFlags::WIDE_CONTINUATION)
    }

    /// Set the foreground color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    /// Set the modifiers (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Colors and modifiers applied to a run of written text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Style modifiers.
    pub modifiers: Modifiers,
}

impl Style {
    /// Terminal defaults, no modifiers.
    pub const PLAIN: Self = Self {
        fg: Color::Default,
        bg: Color::Default,
        modifiers: Modifiers::empty(),
    };

    /// Apply this style to a cell.
    #[inline]
    pub const fn apply(self, cell: Cell) -> Cell {
        cell.with_fg(self.fg)
            .with_bg(self.bg)
            .with_modifiers(self.modifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_new_ascii() {
        let cell = Cell::new('A');
        assert_eq!(cell.ch(), 'A');
        assert_eq!(cell.display_width(), 1);
    }

    #[test]
    fn test_cell_wide_char() {
        let cell = Cell::new('日');
        assert_eq!(cell.display_width(), 2); // CJK is double-width
    }

    #[test]
    fn test_cell_control_char_has_no_width() {
        assert_eq!(Cell::new('\u{7}').display_width(), 0);
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_u32(0xFF8000), Color::Rgb(255, 128, 0));
    }

    #[test]
    fn test_cell_builder_pattern() {
        let cell = Cell::new('X')
            .with_fg(Color::Rgb(255, 0, 0))
            .with_bg(Color::Rgb(0, 0, 255))
            .with_modifiers(Modifiers::BOLD);

        assert_eq!(cell.fg(), Color::Rgb(255, 0, 0));
        assert_eq!(cell.bg(), Color::Rgb(0, 0, 255));
        assert_eq!(cell.modifiers(), Modifiers::BOLD);
    }

    #[test]
    fn test_style_apply() {
        let style = Style {
            fg: Color::Rgb(1, 2, 3),
            modifiers: Modifiers::BOLD,
            ..Style::PLAIN
        };
        let cell = style.apply(Cell::new('s'));
        assert_eq!(cell.fg(), Color::Rgb(1, 2, 3));
        assert_eq!(cell.bg(), Color::Default);
        assert_eq!(cell.modifiers(), Modifiers::BOLD);
    }

    #[test]
    fn test_wide_continuation() {
        let cont = Cell::wide_continuation();
        assert!(cont.is_wide_continuation());
        assert_eq!(cont.display_width(), 0);
        assert_ne!(cont, Cell::EMPTY);
    }
}
