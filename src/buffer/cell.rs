//! Cell: The atomic unit of terminal display.

use crate::style::{Color, Modifiers, Style};
use bitflags::bitflags;
use unicode_width::UnicodeWidthChar;

bitflags! {
    /// Cell-level flags for special states.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        /// This cell is the right half of a wide character
        const WIDE_CONTINUATION = 0b0000_0001;
    }
}

impl std::fmt::Debug for CellFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// A single terminal cell.
///
/// Each cell holds one grapheme: a primary character plus any combining
/// characters drawn on top of it. Wide characters (CJK, most emoji) occupy
/// two cells; the second one is a continuation with no content of its own.
#[derive(Clone, PartialEq, Eq)]
pub struct Cell {
    main: char,
    combining: Vec<char>,
    /// Display width (1 or 2; continuations report 0).
    width: u8,
    style: Style,
    flags: CellFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// Empty cell (space with default colors).
    pub const EMPTY: Self = Self {
        main: ' ',
        combining: Vec::new(),
        width: 1,
        style: Style::DEFAULT,
        flags: CellFlags::empty(),
    };

    /// Create a cell from a single character with the default style.
    #[inline]
    pub fn new(ch: char) -> Self {
        Self::from_parts(ch, &[], Style::DEFAULT)
    }

    /// Create a cell from a primary character, its combining characters and
    /// a style.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_parts(main: char, combining: &[char], style: Style) -> Self {
        let width = main.width().unwrap_or(0).clamp(1, 2) as u8;
        Self {
            main,
            combining: combining.to_vec(),
            width,
            style,
            flags: CellFlags::empty(),
        }
    }

    /// Create the right half of a wide character.
    #[inline]
    pub const fn wide_continuation(style: Style) -> Self {
        Self {
            main: ' ',
            combining: Vec::new(),
            width: 0,
            style,
            flags: CellFlags::WIDE_CONTINUATION,
        }
    }

    /// Set the style (builder pattern).
    #[inline]
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// The primary character.
    #[inline]
    pub const fn main(&self) -> char {
        self.main
    }

    /// Combining characters drawn over the primary character.
    #[inline]
    pub fn combining(&self) -> &[char] {
        &self.combining
    }

    /// The full grapheme as a string.
    pub fn symbol(&self) -> String {
        std::iter::once(self.main)
            .chain(self.combining.iter().copied())
            .collect()
    }

    /// Display width in columns.
    #[inline]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// The cell style.
    #[inline]
    pub const fn style(&self) -> Style {
        self.style
    }

    /// Foreground color, if set.
    #[inline]
    pub const fn fg(&self) -> Option<Color> {
        self.style.fg
    }

    /// Background color, if set.
    #[inline]
    pub const fn bg(&self) -> Option<Color> {
        self.style.bg
    }

    /// Text modifiers.
    #[inline]
    pub const fn modifiers(&self) -> Modifiers {
        self.style.modifiers
    }

    /// Cell flags.
    #[inline]
    pub const fn flags(&self) -> CellFlags {
        self.flags
    }

    /// Check if this is the right half of a wide character.
    #[inline]
    pub const fn is_wide_continuation(&self) -> bool {
        self.flags.contains(CellFlags::WIDE_CONTINUATION)
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_wide_continuation() {
            return write!(f, "Cell(<cont>)");
        }
        write!(f, "Cell({:?}, {:?})", self.symbol(), self.style)
    }
}
