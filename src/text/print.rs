//! Print: Draw tagged text into a bounded horizontal span.

use super::grapheme::graphemes;
use super::tags::{decompose, Segment};
use crate::layout::Alignment;
use crate::style::{Color, Style};
use crate::terminal::Screen;

/// One drawable grapheme with its resolved style and source offsets.
struct Glyph {
    main: char,
    combining: Vec<char>,
    width: usize,
    style: Style,
    start: usize,
    end: usize,
}

fn layout_glyphs(text: &str, base: Style) -> Vec<Glyph> {
    let mut glyphs = Vec::new();
    let mut style = base;

    for segment in decompose(text) {
        match segment {
            Segment::Tag { tag, .. } => style = tag.apply(style, base),
            Segment::Text { text, start } => {
                glyphs.extend(graphemes(text).map(|unit| Glyph {
                    main: unit.main,
                    combining: unit.combining(),
                    width: unit.screen_width,
                    style,
                    start: start + unit.byte_pos,
                    end: start + unit.byte_end(),
                }));
            }
            Segment::Literal { text, start, len } => {
                glyphs.extend(graphemes(&text).map(|unit| Glyph {
                    main: unit.main,
                    combining: unit.combining(),
                    width: unit.screen_width,
                    style,
                    start,
                    end: start + len,
                }));
            }
        }
    }
    glyphs
}

/// Print tagged text at `(x, y)` in `color`, within `max_width` columns.
///
/// Returns the number of bytes of `text` (tags included) covered by the
/// printed graphemes, and the number of columns drawn.
pub fn print(
    screen: &mut dyn Screen,
    text: &str,
    x: i32,
    y: i32,
    max_width: i32,
    align: Alignment,
    color: Color,
) -> (usize, usize) {
    print_styled(screen, text, x, y, max_width, align, Style::new().fg(color))
}

/// Print tagged text starting from `style`.
///
/// Text that does not fit is cut at a grapheme boundary: left-aligned text
/// loses its end, right-aligned text its start, and centered text loses
/// graphemes from both ends. Cells whose resolved background is unset keep
/// the background already on screen.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn print_styled(
    screen: &mut dyn Screen,
    text: &str,
    x: i32,
    y: i32,
    max_width: i32,
    align: Alignment,
    style: Style,
) -> (usize, usize) {
    let Ok(max_width) = usize::try_from(max_width) else {
        return (0, 0);
    };
    if max_width == 0 || text.is_empty() {
        return (0, 0);
    }

    let glyphs = layout_glyphs(text, style);
    let (lo, hi) = visible_window(&glyphs, max_width, align);
    let visible = &glyphs[lo..hi];
    let drawn_width: usize = visible.iter().map(|g| g.width).sum();

    let offset = match align {
        Alignment::Left => 0,
        Alignment::Center => (max_width - drawn_width) / 2,
        Alignment::Right => max_width - drawn_width,
    };

    let mut col = x + offset as i32;
    for glyph in visible {
        if glyph.width == 0 {
            continue;
        }
        let mut cell_style = glyph.style;
        if cell_style.bg.is_none() {
            cell_style.bg = screen.style_at(col, y).bg;
        }
        screen.set_content(col, y, glyph.main, &glyph.combining, cell_style);
        col += glyph.width as i32;
    }

    let drawn_bytes = match (visible.first(), visible.last()) {
        (Some(first), Some(last)) => last.end - if lo == 0 { 0 } else { first.start },
        _ => 0,
    };
    (drawn_bytes, drawn_width)
}

/// Indices `[lo, hi)` of the glyphs that fit in `max_width` columns.
fn visible_window(glyphs: &[Glyph], max_width: usize, align: Alignment) -> (usize, usize) {
    let mut lo = 0;
    let mut hi = glyphs.len();
    let mut width: usize = glyphs.iter().map(|g| g.width).sum();

    match align {
        Alignment::Left => {
            while width > max_width {
                hi -= 1;
                width -= glyphs[hi].width;
            }
        }
        Alignment::Right => {
            while width > max_width {
                width -= glyphs[lo].width;
                lo += 1;
            }
        }
        Alignment::Center => {
            let mut from_end = true;
            while width > max_width {
                if from_end {
                    hi -= 1;
                    width -= glyphs[hi].width;
                } else {
                    width -= glyphs[lo].width;
                    lo += 1;
                }
                from_end = !from_end;
            }
        }
    }
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    fn screen(width: u16) -> Buffer {
        Buffer::new(width, 1)
    }

    #[test]
    fn test_print_left() {
        let mut buf = screen(10);
        let (bytes, width) = print(&mut buf, "hello", 1, 0, 8, Alignment::Left, Color::White);
        assert_eq!((bytes, width), (5, 5));
        assert_eq!(buf.row_text(0), " hello    ");
    }

    #[test]
    fn test_print_truncates_at_grapheme() {
        let mut buf = screen(10);
        let (bytes, width) = print(&mut buf, "ab日c", 0, 0, 3, Alignment::Left, Color::White);
        assert_eq!(width, 2);
        assert_eq!(bytes, 2);
        assert_eq!(buf.row_text(0), "ab        ");
    }

    #[test]
    fn test_print_right_and_center() {
        let mut buf = screen(10);
        print(&mut buf, "abc", 0, 0, 10, Alignment::Right, Color::White);
        assert_eq!(buf.row_text(0), "       abc");

        let mut buf = screen(10);
        print(&mut buf, "abcd", 0, 0, 10, Alignment::Center, Color::White);
        assert_eq!(buf.row_text(0), "   abcd   ");

        let mut buf = screen(10);
        let (_, width) = print(&mut buf, "abcdef", 0, 0, 4, Alignment::Right, Color::White);
        assert_eq!(width, 4);
        assert_eq!(buf.row_text(0), "cdef      ");

        let mut buf = screen(10);
        print(&mut buf, "abcdef", 0, 0, 4, Alignment::Center, Color::White);
        assert_eq!(buf.row_text(0), "bcde      ");
    }

    #[test]
    fn test_print_applies_tags() {
        let mut buf = screen(10);
        let (bytes, width) = print(&mut buf, "a[red]b[-]c", 0, 0, 10, Alignment::Left, Color::White);
        assert_eq!(width, 3);
        assert_eq!(bytes, 11);
        assert_eq!(buf.row_text(0), "abc       ");
        assert_eq!(buf.get(0, 0).unwrap().fg(), Some(Color::White));
        assert_eq!(buf.get(1, 0).unwrap().fg(), Some(Color::Red));
        assert_eq!(buf.get(2, 0).unwrap().fg(), Some(Color::White));
    }

    #[test]
    fn test_print_escaped_literal() {
        let mut buf = screen(10);
        let (_, width) = print(&mut buf, "[red[]x", 0, 0, 10, Alignment::Left, Color::White);
        assert_eq!(width, 6);
        assert_eq!(buf.row_text(0), "[red]x    ");
    }

    #[test]
    fn test_print_keeps_background() {
        let mut buf = screen(4);
        let bg = Style::new().bg(Color::Blue);
        for x in 0..4 {
            buf.set_content(x, 0, ' ', &[], bg);
        }
        print(&mut buf, "hi", 0, 0, 4, Alignment::Left, Color::Yellow);
        assert_eq!(buf.get(0, 0).unwrap().bg(), Some(Color::Blue));
        assert_eq!(buf.get(0, 0).unwrap().fg(), Some(Color::Yellow));
    }

    #[test]
    fn test_print_degenerate_width() {
        let mut buf = screen(4);
        assert_eq!(print(&mut buf, "hi", 0, 0, 0, Alignment::Left, Color::White), (0, 0));
        assert_eq!(print(&mut buf, "hi", 0, 0, -3, Alignment::Left, Color::White), (0, 0));
        assert_eq!(buf.row_text(0), "    ");
    }

    #[test]
    fn test_print_combining() {
        let mut buf = screen(4);
        let (bytes, width) = print(&mut buf, "e\u{301}x", 0, 0, 4, Alignment::Left, Color::White);
        assert_eq!((bytes, width), (4, 2));
        assert_eq!(buf.get(0, 0).unwrap().symbol(), "e\u{301}");
    }
}
