//! Buffer: A grid of cells representing the terminal screen.
//!
//! The buffer uses contiguous memory allocation for cache efficiency.
//! Cells are stored in row-major order. Widgets draw into it through the
//! [`Screen`] trait; [`flush`](crate::terminal::flush) writes it out.

use super::cell::Cell;
use crate::style::Style;
use crate::terminal::Screen;

/// A grid of cells representing the terminal screen.
///
/// Access is in row-major order: `index = y * width + x`.
#[derive(Clone)]
pub struct Buffer {
    /// Contiguous cell storage (row-major order).
    cells: Vec<Cell>,
    /// Width in columns.
    width: u16,
    /// Height in rows.
    height: u16,
    /// Cursor position requested by the last draw, if shown.
    cursor: Option<(i32, i32)>,
}

impl Buffer {
    /// Create a new buffer with the given dimensions.
    ///
    /// All cells are initialized to empty (space with default colors).
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "Buffer dimensions must be non-zero");
        let size = (width as usize) * (height as usize);
        Self {
            cells: vec![Cell::EMPTY; size],
            width,
            height,
            cursor: None,
        }
    }

    /// Get the buffer width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get the total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the buffer is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Convert signed (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        if x < self.width as usize && y < self.height as usize {
            Some(y * (self.width as usize) + x)
        } else {
            None
        }
    }

    /// Get a reference to a cell at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Set a cell at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// The visible text of row `y`, skipping wide-character continuations.
    pub fn row_text(&self, y: i32) -> String {
        (0..i32::from(self.width))
            .filter_map(|x| self.get(x, y))
            .filter(|cell| !cell.is_wide_continuation())
            .map(Cell::symbol)
            .collect()
    }

    /// Cursor position requested by the last draw, if shown.
    #[inline]
    pub const fn cursor(&self) -> Option<(i32, i32)> {
        self.cursor
    }

    /// Clear the entire buffer (fill with empty cells) and hide the cursor.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
        self.cursor = None;
    }

    /// Resize the buffer, preserving content where possible.
    ///
    /// New cells are initialized to empty.
    pub fn resize(&mut self, new_width: u16, new_height: u16) {
        if new_width == self.width && new_height == self.height {
            return;
        }

        let new_size = (new_width as usize) * (new_height as usize);
        let mut new_cells = vec![Cell::EMPTY; new_size];

        let copy_width = self.width.min(new_width) as usize;
        let copy_height = self.height.min(new_height) as usize;

        for y in 0..copy_height {
            let old_start = y * (self.width as usize);
            let new_start = y * (new_width as usize);
            new_cells[new_start..new_start + copy_width]
                .clone_from_slice(&self.cells[old_start..old_start + copy_width]);
        }

        self.cells = new_cells;
        self.width = new_width;
        self.height = new_height;
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }
}

impl Screen for Buffer {
    fn set_content(&mut self, x: i32, y: i32, main: char, combining: &[char], style: Style) {
        let Some(idx) = self.index_of(x, y) else {
            return;
        };

        let cell = Cell::from_parts(main, combining, style);
        let wide = cell.width() == 2;
        self.cells[idx] = cell;

        if wide {
            if let Some(next) = self.index_of(x.saturating_add(1), y) {
                self.cells[next] = Cell::wide_continuation(style);
            }
        }
    }

    fn size(&self) -> (i32, i32) {
        (i32::from(self.width), i32::from(self.height))
    }

    fn show_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Some((x, y));
    }

    fn hide_cursor(&mut self) {
        self.cursor = None;
    }

    fn style_at(&self, x: i32, y: i32) -> Style {
        self.get(x, y).map_or(Style::DEFAULT, Cell::style)
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn test_buffer_new() {
        let buffer = Buffer::new(80, 24);
        assert_eq!(buffer.width(), 80);
        assert_eq!(buffer.height(), 24);
        assert_eq!(buffer.len(), 80 * 24);
        assert_eq!(buffer.size(), (80, 24));
    }

    #[test]
    #[should_panic]
    fn test_buffer_zero_width() {
        Buffer::new(0, 24);
    }

    #[test]
    fn test_buffer_bounds() {
        let buffer = Buffer::new(80, 24);
        assert!(buffer.get(79, 23).is_some());
        assert!(buffer.get(80, 23).is_none());
        assert!(buffer.get(79, 24).is_none());
        assert!(buffer.get(-1, 0).is_none());
    }

    #[test]
    fn test_set_content_ascii() {
        let mut buffer = Buffer::new(10, 2);
        let style = Style::new().fg(Color::Red);
        buffer.set_content(2, 1, 'A', &[], style);
        assert_eq!(buffer.get(2, 1).unwrap().symbol(), "A");
        assert_eq!(buffer.style_at(2, 1), style);
        assert_eq!(buffer.row_text(1), "  A       ");
    }

    #[test]
    fn test_set_content_wide() {
        let mut buffer = Buffer::new(10, 1);
        buffer.set_content(0, 0, '日', &[], Style::DEFAULT);
        assert!(buffer.get(1, 0).unwrap().is_wide_continuation());
        assert_eq!(buffer.row_text(0), "日        ");
    }

    #[test]
    fn test_set_content_out_of_bounds_ignored() {
        let mut buffer = Buffer::new(4, 1);
        buffer.set_content(-1, 0, 'X', &[], Style::DEFAULT);
        buffer.set_content(4, 0, 'X', &[], Style::DEFAULT);
        buffer.set_content(0, 3, 'X', &[], Style::DEFAULT);
        assert_eq!(buffer.row_text(0), "    ");
    }

    #[test]
    fn test_cursor_tracking() {
        let mut buffer = Buffer::new(10, 2);
        assert_eq!(buffer.cursor(), None);
        buffer.show_cursor(3, 1);
        assert_eq!(buffer.cursor(), Some((3, 1)));
        buffer.hide_cursor();
        assert_eq!(buffer.cursor(), None);
    }

    #[test]
    fn test_buffer_clear() {
        let mut buffer = Buffer::new(80, 24);
        buffer.set(5, 5, Cell::new('X'));
        buffer.show_cursor(1, 1);
        buffer.clear();
        assert_eq!(buffer.get(5, 5), Some(&Cell::EMPTY));
        assert_eq!(buffer.cursor(), None);
    }

    #[test]
    fn test_buffer_resize() {
        let mut buffer = Buffer::new(80, 24);
        buffer.set(5, 5, Cell::new('X'));
        buffer.resize(40, 12);
        assert_eq!(buffer.width(), 40);
        assert_eq!(buffer.height(), 12);
        assert_eq!(buffer.get(5, 5).unwrap().symbol(), "X");
    }
}
