//! Terminal module: The drawing surface widgets render into.
//!
//! - [`Screen`]: The minimal surface contract (set a cell, size, cursor)
//! - [`flush`]: Write a [`Buffer`](crate::Buffer) to a real terminal

mod output;
mod screen;

pub use output::flush;
pub use screen::Screen;
