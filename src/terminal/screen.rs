//! Screen: The surface every widget draws on.

use crate::style::Style;

/// A character-cell drawing surface.
///
/// Coordinates are signed; implementations ignore writes outside their
/// bounds, so widgets can draw partially off-screen without clipping
/// themselves.
pub trait Screen {
    /// Write one grapheme (a primary character and its combining characters)
    /// at `(x, y)`.
    fn set_content(&mut self, x: i32, y: i32, main: char, combining: &[char], style: Style);

    /// Size of the surface as `(width, height)`.
    fn size(&self) -> (i32, i32);

    /// Show the text cursor at `(x, y)`.
    fn show_cursor(&mut self, x: i32, y: i32);

    /// Hide the text cursor.
    fn hide_cursor(&mut self) {}

    /// Style currently stored at `(x, y)`.
    ///
    /// Text printing uses this to keep the existing background under text
    /// that does not set one.
    fn style_at(&self, _x: i32, _y: i32) -> Style {
        Style::DEFAULT
    }
}
