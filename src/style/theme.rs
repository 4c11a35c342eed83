//! Theme: Immutable default colors and glyphs.
//!
//! Widgets copy what they need out of a [`Theme`] at construction time and
//! never consult a global afterwards. [`Theme::DEFAULT`] is used by every
//! `new()` constructor; `with_theme` accepts an override.

use crossterm::style::Color;

/// Box-drawing characters for borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    /// Horizontal edge.
    pub horizontal: char,
    /// Vertical edge.
    pub vertical: char,
    /// Top-left corner.
    pub top_left: char,
    /// Top-right corner.
    pub top_right: char,
    /// Bottom-left corner.
    pub bottom_left: char,
    /// Bottom-right corner.
    pub bottom_right: char,
}

impl BorderGlyphs {
    /// Single-line borders.
    pub const SINGLE: Self = Self {
        horizontal: '─',
        vertical: '│',
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
    };

    /// Double-line borders, used for focused boxes.
    pub const DOUBLE: Self = Self {
        horizontal: '═',
        vertical: '║',
        top_left: '╔',
        top_right: '╗',
        bottom_left: '╚',
        bottom_right: '╝',
    };
}

/// Default colors and glyphs for every widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Main background color for primitives.
    pub primitive_background_color: Color,
    /// Background color for contrasting elements (input fields, buttons).
    pub contrast_background_color: Color,
    /// Background color for even more contrasting elements (list selection).
    pub more_contrast_background_color: Color,
    /// Box borders.
    pub border_color: Color,
    /// Box titles.
    pub title_color: Color,
    /// Graphics such as the checkbox glyph.
    pub graphics_color: Color,
    /// Primary text.
    pub primary_text_color: Color,
    /// Secondary text (labels).
    pub secondary_text_color: Color,
    /// Tertiary text (secondary list lines).
    pub tertiary_text_color: Color,
    /// Text on primary-colored backgrounds.
    pub inverse_text_color: Color,
    /// Primary text on contrasting backgrounds.
    pub contrast_primary_text_color: Color,
    /// Secondary text on contrasting backgrounds (placeholders, suggestions).
    pub contrast_secondary_text_color: Color,
    /// Glyph drawn inside a checked checkbox.
    pub checkbox_checked_glyph: char,
    /// Borders of unfocused boxes.
    pub borders: BorderGlyphs,
    /// Borders of focused boxes.
    pub focused_borders: BorderGlyphs,
}

impl Theme {
    /// The built-in theme.
    pub const DEFAULT: Self = Self {
        primitive_background_color: Color::Black,
        contrast_background_color: Color::DarkBlue,
        more_contrast_background_color: Color::DarkGreen,
        border_color: Color::White,
        title_color: Color::White,
        graphics_color: Color::White,
        primary_text_color: Color::White,
        secondary_text_color: Color::Yellow,
        tertiary_text_color: Color::Green,
        inverse_text_color: Color::DarkBlue,
        contrast_primary_text_color: Color::Yellow,
        contrast_secondary_text_color: Color::DarkCyan,
        checkbox_checked_glyph: 'X',
        borders: BorderGlyphs::SINGLE,
        focused_borders: BorderGlyphs::DOUBLE,
    };
}

impl Default for Theme {
    fn default() -> Self {
        Self::DEFAULT
    }
}
