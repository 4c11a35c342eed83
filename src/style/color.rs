//! Style: Per-cell colors and text modifiers.

use crate::error::{Error, Result};
use bitflags::bitflags;
use crossterm::style::Color;

bitflags! {
    /// Text style modifiers.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use cellform::Modifiers;
    /// let style = Modifiers::BOLD | Modifiers::ITALIC;
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Dim/faint text
        const DIM = 0b0000_0010;
        /// Italic text
        const ITALIC = 0b0000_0100;
        /// Underlined text
        const UNDERLINE = 0b0000_1000;
        /// Blinking text
        const BLINK = 0b0001_0000;
        /// Reversed colors (fg/bg swapped)
        const REVERSED = 0b0010_0000;
        /// Hidden/invisible text
        const HIDDEN = 0b0100_0000;
        /// Strikethrough text
        const STRIKETHROUGH = 0b1000_0000;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

impl Modifiers {
    /// Parse the attribute letters used in style tags (`lbidrus`).
    ///
    /// Unknown letters are ignored.
    pub fn from_tag_letters(letters: &str) -> Self {
        letters.chars().fold(Self::empty(), |acc, letter| {
            acc | match letter {
                'l' => Self::BLINK,
                'b' => Self::BOLD,
                'i' => Self::ITALIC,
                'd' => Self::DIM,
                'r' => Self::REVERSED,
                'u' => Self::UNDERLINE,
                's' => Self::STRIKETHROUGH,
                _ => Self::empty(),
            }
        })
    }
}

/// Colors and modifiers applied to a screen cell.
///
/// `None` colors mean "terminal default" when flushed, and "keep what is
/// already there" for backgrounds written by text printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color.
    pub fg: Option<Color>,
    /// Background color.
    pub bg: Option<Color>,
    /// Text modifiers.
    pub modifiers: Modifiers,
}

impl Style {
    /// Style with no colors and no modifiers.
    pub const DEFAULT: Self = Self::new();

    /// Create an empty style.
    #[inline]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            modifiers: Modifiers::empty(),
        }
    }

    /// Set the foreground color.
    #[inline]
    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    #[inline]
    #[must_use]
    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Replace the modifiers.
    #[inline]
    #[must_use]
    pub const fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Swap foreground and background.
    #[inline]
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            fg: self.bg,
            bg: self.fg,
            modifiers: self.modifiers,
        }
    }
}

/// Parse a color name, `#rrggbb` value, or `default`/`reset`.
///
/// Names are case-insensitive and may use `_` or `-` separators
/// (`dark_cyan`, `darkcyan`, `dark-cyan`).
#[allow(clippy::cast_possible_truncation)]
pub fn parse_color(name: &str) -> Result<Color> {
    let unknown = || Error::UnknownColor(name.to_string());

    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() != 6 {
            return Err(unknown());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| unknown())?;
        return Ok(Color::Rgb {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        });
    }

    let normalized: String = name
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    Ok(match normalized.as_str() {
        "default" | "reset" => Color::Reset,
        "black" => Color::Black,
        "darkgrey" | "darkgray" => Color::DarkGrey,
        "red" => Color::Red,
        "darkred" | "maroon" => Color::DarkRed,
        "green" | "lime" => Color::Green,
        "darkgreen" => Color::DarkGreen,
        "yellow" => Color::Yellow,
        "darkyellow" | "olive" => Color::DarkYellow,
        "blue" => Color::Blue,
        "darkblue" | "navy" => Color::DarkBlue,
        "magenta" | "fuchsia" => Color::Magenta,
        "darkmagenta" | "purple" => Color::DarkMagenta,
        "cyan" | "aqua" => Color::Cyan,
        "darkcyan" | "teal" => Color::DarkCyan,
        "white" => Color::White,
        "grey" | "gray" | "silver" => Color::Grey,
        _ => return Err(unknown()),
    })
}
