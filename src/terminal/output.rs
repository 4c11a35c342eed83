//! Output: Write a cell buffer to a terminal with crossterm commands.
//!
//! All commands are queued and flushed once, and style changes are only
//! emitted between cells whose styles differ.

use crate::buffer::Buffer;
use crate::error::Result;
use crate::style::{Color, Modifiers, Style};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{
    Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use std::io::{self, Write};

/// Draw the whole buffer to `out`, then place the cursor if the last draw
/// requested one.
pub fn flush<W: Write>(buffer: &Buffer, out: &mut W) -> Result<()> {
    queue!(out, Hide)?;

    let mut last: Option<Style> = None;
    for (y, row) in buffer.rows().enumerate() {
        let y = u16::try_from(y).unwrap_or(u16::MAX);
        queue!(out, MoveTo(0, y))?;

        for cell in row {
            if cell.is_wide_continuation() {
                continue;
            }
            let style = cell.style();
            if last != Some(style) {
                emit_style(out, style, last)?;
                last = Some(style);
            }
            queue!(out, Print(cell.symbol()))?;
        }
    }

    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;

    if let Some((x, y)) = buffer.cursor() {
        if let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) {
            queue!(out, MoveTo(x, y), Show)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Emit the transition from `previous` to `style`.
///
/// Removing a modifier requires an SGR reset, which also resets colors, so
/// both colors are re-emitted in that case.
fn emit_style<W: Write>(out: &mut W, style: Style, previous: Option<Style>) -> io::Result<()> {
    let previous_modifiers = previous.map_or(Modifiers::empty(), |p| p.modifiers);
    let reset = !previous_modifiers.difference(style.modifiers).is_empty();

    if reset {
        queue!(out, SetAttribute(Attribute::Reset))?;
    }
    if reset || previous.map(|p| p.fg) != Some(style.fg) {
        queue!(out, SetForegroundColor(style.fg.unwrap_or(Color::Reset)))?;
    }
    if reset || previous.map(|p| p.bg) != Some(style.bg) {
        queue!(out, SetBackgroundColor(style.bg.unwrap_or(Color::Reset)))?;
    }

    let added = if reset {
        style.modifiers
    } else {
        style.modifiers.difference(previous_modifiers)
    };
    for attribute in attributes(added) {
        queue!(out, SetAttribute(attribute))?;
    }
    Ok(())
}

fn attributes(modifiers: Modifiers) -> impl Iterator<Item = Attribute> {
    [
        (Modifiers::BOLD, Attribute::Bold),
        (Modifiers::DIM, Attribute::Dim),
        (Modifiers::ITALIC, Attribute::Italic),
        (Modifiers::UNDERLINE, Attribute::Underlined),
        (Modifiers::BLINK, Attribute::SlowBlink),
        (Modifiers::REVERSED, Attribute::Reverse),
        (Modifiers::HIDDEN, Attribute::Hidden),
        (Modifiers::STRIKETHROUGH, Attribute::CrossedOut),
    ]
    .into_iter()
    .filter(move |(flag, _)| modifiers.contains(*flag))
    .map(|(_, attribute)| attribute)
}
