//! Word wrap for tagged text.

use super::grapheme::graphemes;
use super::tags::{decompose, Segment};

/// A unit of a line: one grapheme or one tag (zero width).
#[derive(Debug, Clone, Copy)]
struct Atom {
    start: usize,
    end: usize,
    width: usize,
    space: bool,
}

fn atoms(line: &str) -> Vec<Atom> {
    let mut out = Vec::new();
    for segment in decompose(line) {
        match segment {
            Segment::Text { text, start } => {
                out.extend(graphemes(text).map(|unit| Atom {
                    start: start + unit.byte_pos,
                    end: start + unit.byte_end(),
                    width: unit.screen_width,
                    space: unit.text.chars().all(char::is_whitespace),
                }));
            }
            Segment::Literal { text, start, len } => {
                // Escaped tags stay whole so the escape survives the split.
                out.push(Atom {
                    start,
                    end: start + len,
                    width: super::grapheme::plain_width(&text),
                    space: false,
                });
            }
            Segment::Tag { start, len, .. } => out.push(Atom {
                start,
                end: start + len,
                width: 0,
                space: false,
            }),
        }
    }
    out
}

/// Split `text` into lines no wider than `width` columns.
///
/// Existing line breaks are kept. Long lines break after whitespace where
/// possible; a single word wider than `width` is broken between graphemes.
/// Whitespace at a break is dropped. Style tags are kept in the output and
/// do not count toward the width. A `width` of zero or less only splits on
/// existing line breaks.
pub fn word_wrap(text: &str, width: i32) -> Vec<String> {
    let width = usize::try_from(width).unwrap_or(0);
    let mut lines = Vec::new();
    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if width == 0 {
            lines.push(line.to_string());
        } else {
            wrap_line(line, width, &mut lines);
        }
    }
    lines
}

fn wrap_line(line: &str, width: usize, out: &mut Vec<String>) {
    let atoms = atoms(line);
    if atoms.is_empty() {
        out.push(String::new());
        return;
    }

    let emit = |from: usize, to: usize, out: &mut Vec<String>| {
        let mut to = to;
        while to > from && atoms[to - 1].space {
            to -= 1;
        }
        if to > from {
            out.push(line[atoms[from].start..atoms[to - 1].end].to_string());
        } else {
            out.push(String::new());
        }
    };

    let mut start = 0;
    let mut used = 0;
    let mut word_start: Option<usize> = None;
    let mut i = 0;

    while i < atoms.len() {
        let atom = atoms[i];
        if !atom.space && i > start && atoms[i - 1].space {
            word_start = Some(i);
        }

        if !atom.space && used + atom.width > width {
            let split = match word_start {
                Some(ws) if ws > start => ws,
                _ if i > start => i,
                _ => i + 1,
            };
            emit(start, split, out);

            start = split;
            while start < atoms.len() && atoms[start].space {
                start += 1;
            }
            used = 0;
            word_start = None;
            i = start;
            continue;
        }

        used += atom.width;
        i += 1;
    }

    if start < atoms.len() {
        emit(start, atoms.len(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_line_unchanged() {
        assert_eq!(word_wrap("hello", 10), vec!["hello"]);
    }

    #[test]
    fn test_breaks_at_spaces() {
        assert_eq!(
            word_wrap("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn test_existing_newlines() {
        assert_eq!(word_wrap("a\nb\r\n\nc", 5), vec!["a", "b", "", "c"]);
    }

    #[test]
    fn test_long_word_hard_break() {
        assert_eq!(word_wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_wide_chars_not_split() {
        assert_eq!(word_wrap("日本語", 3), vec!["日", "本", "語"]);
        assert_eq!(word_wrap("日本語", 4), vec!["日本", "語"]);
    }

    #[test]
    fn test_combining_kept_whole() {
        let lines = word_wrap("e\u{301}e\u{301}e\u{301}", 2);
        assert_eq!(lines, vec!["e\u{301}e\u{301}", "e\u{301}"]);
    }

    #[test]
    fn test_tags_do_not_count() {
        assert_eq!(
            word_wrap("[red]abc [blue]def", 3),
            vec!["[red]abc", "[blue]def"]
        );
    }

    #[test]
    fn test_non_positive_width() {
        assert_eq!(word_wrap("a b c", 0), vec!["a b c"]);
        assert_eq!(word_wrap("a b\nc", -1), vec!["a b", "c"]);
    }

    #[test]
    fn test_lines_fit() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit";
        for width in 1..20 {
            for line in word_wrap(text, width) {
                assert!(
                    crate::text::string_width(&line) <= width as usize,
                    "{line:?} wider than {width}"
                );
            }
        }
    }
}
