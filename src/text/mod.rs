//! Text module: Unicode-aware measuring, iteration and printing.
//!
//! Everything here works in grapheme clusters and screen columns, never
//! raw bytes or chars:
//! - [`graphemes`], [`iterate`], [`iterate_reverse`]: walk a string with byte
//!   and column offsets
//! - [`string_width`], [`plain_width`]: measure with or without style tags
//! - [`print`], [`print_styled`]: draw tagged text into a bounded span
//! - [`word_wrap`], [`escape`], [`strip_tags`]: pure text helpers

mod grapheme;
mod print;
mod tags;
mod wrap;

pub use grapheme::{
    ceil_boundary, floor_boundary, grapheme_width, graphemes, iterate, iterate_reverse, plain_width,
    GraphemeUnit, Graphemes,
};
pub use print::{print, print_styled};
pub use tags::{escape, string_width, strip_tags};
pub use wrap::word_wrap;
