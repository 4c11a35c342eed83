//! Buffer module: An in-memory character grid that widgets draw into.
//!
//! This module contains:
//! - [`Cell`]: One grid position (grapheme, width, style)
//! - [`Buffer`]: A grid of cells implementing [`Screen`](crate::terminal::Screen)

mod cell;
#[allow(clippy::module_inception)]
mod buffer;

pub use buffer::Buffer;
pub use cell::{Cell, CellFlags};
