//! Layout module: Geometry shared by every widget.
//!
//! Coordinates are signed so that centered windows larger than the screen
//! and partially off-screen children stay representable; drawing clips
//! anything outside the screen.

mod rect;

pub use rect::{Alignment, Padding, Rect};
