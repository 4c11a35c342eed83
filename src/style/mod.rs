//! Style module: Colors, text attributes and the default theme.
//!
//! - [`Style`]: Foreground, background and [`Modifiers`] for one cell
//! - [`Theme`]: Immutable default colors and glyphs handed to constructors
//! - [`parse_color`]: Color names and `#rrggbb` values used by style tags

mod color;
mod theme;

pub use color::{parse_color, Modifiers, Style};
pub use crossterm::style::Color;
pub use theme::{BorderGlyphs, Theme};
