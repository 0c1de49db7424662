//! Grid: A matrix of cells representing the terminal screen.
//!
//! Cells are stored contiguously in row-major order. A grid is sized once
//! and never reallocated; drawing only overwrites and clears cells.

use super::cell::{Cell, Style};

/// A grid of cells representing the terminal screen.
///
/// Access is in row-major order: `index = y * width + x`.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    width: u16,
    height: u16,
}

impl Grid {
    /// Create a new grid with the given dimensions, filled with blank cells.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "Grid dimensions must be non-zero");
        let size = (width as usize) * (height as usize);
        Self {
            cells: vec![Cell::EMPTY; size],
            width,
            height,
        }
    }

    /// Grid width in columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Grid height in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false after construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Get the cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Set the cell at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Place a character at (x, y).
    ///
    /// Returns the number of columns consumed: 1 or 2 when written, 0 when
    /// the character has no display width or would not fit on the row.
    /// Wide characters also claim the continuation cell at (x+1, y).
    pub fn put_char(&mut self, x: u16, y: u16, ch: char, style: Style) -> u16 {
        let cell = style.apply(Cell::new(ch));
        let width = u16::from(cell.display_width());
        if width == 0 || y >= self.height || u32::from(x) + u32::from(width) > u32::from(self.width) {
            return 0;
        }

        self.set(x, y, cell);
        if width == 2 {
            self.set(x + 1, y, style.apply(Cell::wide_continuation()));
        }
        width
    }

    /// Write `text` on row `y` starting at column `x`, truncating at the
    /// right edge.
    ///
    /// Returns the column just past the last written character.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            let advance = self.put_char(col, y, ch, style);
            if advance == 0 && Cell::new(ch).display_width() > 0 {
                // Wide character on the last column: the row is full.
                break;
            }
            col += advance;
        }
        col
    }

    /// Blank row `y` from column `x` to the right edge.
    pub fn clear_row_from(&mut self, x: u16, y: u16) {
        if let (Some(start), Some(end)) = (self.index_of(x, y), self.index_of(self.width - 1, y)) {
            self.cells[start..=end].fill(Cell::EMPTY);
        }
    }

    /// Blank every row from `y` to the bottom.
    pub fn clear_rows_from(&mut self, y: u16) {
        if let Some(start) = self.index_of(0, y) {
            self.cells[start..].fill(Cell::EMPTY);
        }
    }

    /// Copy content from another grid of the same size.
    pub fn copy_from(&mut self, other: &Self) {
        debug_assert_eq!(self.width, other.width);
        debug_assert_eq!(self.height, other.height);
        self.cells.copy_from_slice(&other.cells);
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// The visible text of row `y`, without trailing blanks.
    pub fn row_text(&self, y: u16) -> String {
        let Some(row) = self.rows().nth(y as usize) else {
            return String::new();
        };
        let text: String = row
            .iter()
            .filter(|cell| !cell.is_wide_continuation())
            .map(Cell::ch)
            .collect();
        text.trim_end_matches(' ').to_string()
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for y in 0..self.height {
            list.entry(&self.row_text(y));
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_new() {
        let grid = Grid::new(80, 24);
        assert_eq!(grid.width(), 80);
        assert_eq!(grid.height(), 24);
        assert_eq!(grid.len(), 80 * 24);
    }

    #[test]
    #[should_panic]
    fn test_grid_zero_width() {
        Grid::new(0, 24);
    }

    #[test]
    fn test_grid_bounds() {
        let grid = Grid::new(80, 24);
        assert!(grid.get(79, 23).is_some());
        assert!(grid.get(80, 23).is_none());
        assert!(grid.get(79, 24).is_none());
    }

    #[test]
    fn test_put_char_wide() {
        let mut grid = Grid::new(10, 2);
        assert_eq!(grid.put_char(0, 0, 'A', Style::PLAIN), 1);
        assert_eq!(grid.put_char(1, 0, '日', Style::PLAIN), 2);
        assert!(grid.get(2, 0).unwrap().is_wide_continuation());
        assert_eq!(grid.row_text(0), "A日");
    }

    #[test]
    fn test_put_char_wide_does_not_straddle_edge() {
        let mut grid = Grid::new(3, 1);
        assert_eq!(grid.put_char(2, 0, '日', Style::PLAIN), 0);
        assert_eq!(grid.get(2, 0), Some(&Cell::EMPTY));
    }

    #[test]
    fn test_put_char_skips_control() {
        let mut grid = Grid::new(4, 1);
        assert_eq!(grid.put_char(0, 0, '\r', Style::PLAIN), 0);
        assert_eq!(grid.get(0, 0), Some(&Cell::EMPTY));
    }

    #[test]
    fn test_put_str_truncates() {
        let mut grid = Grid::new(5, 2);
        let end = grid.put_str(0, 1, "abcdefgh", Style::PLAIN);
        assert_eq!(end, 5);
        assert_eq!(grid.row_text(1), "abcde");
        assert_eq!(grid.row_text(0), "");
    }

    #[test]
    fn test_put_str_stops_before_split_wide_char() {
        let mut grid = Grid::new(5, 1);
        let end = grid.put_str(0, 0, "abcd日x", Style::PLAIN);
        assert_eq!(end, 4);
        assert_eq!(grid.row_text(0), "abcd");
    }

    #[test]
    fn test_clear_row_from() {
        let mut grid = Grid::new(6, 2);
        grid.put_str(0, 0, "abcdef", Style::PLAIN);
        grid.put_str(0, 1, "ghijkl", Style::PLAIN);
        grid.clear_row_from(2, 0);
        assert_eq!(grid.row_text(0), "ab");
        assert_eq!(grid.row_text(1), "ghijkl");
    }

    #[test]
    fn test_clear_rows_from() {
        let mut grid = Grid::new(4, 3);
        for y in 0..3 {
            grid.put_str(0, y, "xx", Style::PLAIN);
        }
        grid.clear_rows_from(1);
        assert_eq!(grid.row_text(0), "xx");
        assert_eq!(grid.row_text(1), "");
        assert_eq!(grid.row_text(2), "");
    }

    #[test]
    fn test_copy_from() {
        let mut a = Grid::new(4, 2);
        let mut b = Grid::new(4, 2);
        b.put_str(0, 0, "hi", Style::PLAIN);
        a.copy_from(&b);
        assert_eq!(a, b);
    }
}
