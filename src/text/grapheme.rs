//! Grapheme iteration with byte and screen-column offsets.

use unicode_segmentation::{GraphemeIndices, UnicodeSegmentation};
use unicode_width::UnicodeWidthStr;

/// One user-perceived character of a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphemeUnit<'a> {
    /// The grapheme cluster text.
    pub text: &'a str,
    /// The primary code point.
    pub main: char,
    /// Byte offset of the cluster in the source string.
    pub byte_pos: usize,
    /// Byte length of the cluster.
    pub byte_len: usize,
    /// Screen column where the cluster starts, counted from the string start.
    pub screen_pos: usize,
    /// Columns occupied (0, 1 or 2).
    pub screen_width: usize,
}

impl<'a> GraphemeUnit<'a> {
    fn new(text: &'a str, byte_pos: usize, screen_pos: usize) -> Self {
        Self {
            text,
            main: text.chars().next().unwrap_or(' '),
            byte_pos,
            byte_len: text.len(),
            screen_pos,
            screen_width: grapheme_width(text),
        }
    }

    /// Code points combined onto the primary one.
    pub fn combining(&self) -> Vec<char> {
        self.text.chars().skip(1).collect()
    }

    /// Byte offset just past the cluster.
    #[inline]
    pub const fn byte_end(&self) -> usize {
        self.byte_pos + self.byte_len
    }
}

/// Display width of one grapheme cluster, capped at two columns.
#[inline]
pub fn grapheme_width(grapheme: &str) -> usize {
    grapheme.width().min(2)
}

/// Display width of a string taken literally (style tags count as text).
pub fn plain_width(text: &str) -> usize {
    text.graphemes(true).map(grapheme_width).sum()
}

/// Double-ended iterator over the grapheme units of a string.
///
/// Screen positions are absolute from the start of the string in both
/// directions; iterating from the back measures the string once up front.
#[derive(Clone)]
pub struct Graphemes<'a> {
    source: &'a str,
    inner: GraphemeIndices<'a>,
    front_col: usize,
    back_col: Option<usize>,
}

/// Iterate the grapheme units of `text`.
pub fn graphemes(text: &str) -> Graphemes<'_> {
    Graphemes {
        source: text,
        inner: text.grapheme_indices(true),
        front_col: 0,
        back_col: None,
    }
}

impl<'a> Iterator for Graphemes<'a> {
    type Item = GraphemeUnit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (byte_pos, text) = self.inner.next()?;
        let unit = GraphemeUnit::new(text, byte_pos, self.front_col);
        self.front_col += unit.screen_width;
        Some(unit)
    }
}

impl DoubleEndedIterator for Graphemes<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (byte_pos, text) = self.inner.next_back()?;
        let source = self.source;
        let col = self.back_col.get_or_insert_with(|| plain_width(source));
        *col -= grapheme_width(text);
        Some(GraphemeUnit::new(text, byte_pos, *col))
    }
}

/// Visit each grapheme unit of `text` in order.
///
/// The visitor returns `true` to stop early; the function returns whether it
/// stopped.
pub fn iterate<'a, F>(text: &'a str, mut visit: F) -> bool
where
    F: FnMut(&GraphemeUnit<'a>) -> bool,
{
    graphemes(text).any(|unit| visit(&unit))
}

/// Visit each grapheme unit of `text` from the end.
///
/// The visitor returns `true` to stop early; the function returns whether it
/// stopped.
pub fn iterate_reverse<'a, F>(text: &'a str, mut visit: F) -> bool
where
    F: FnMut(&GraphemeUnit<'a>) -> bool,
{
    graphemes(text).rev().any(|unit| visit(&unit))
}

/// The largest grapheme boundary of `text` at or before `pos`.
pub fn floor_boundary(text: &str, pos: usize) -> usize {
    if pos >= text.len() {
        return text.len();
    }
    let mut boundary = 0;
    for (start, _) in text.grapheme_indices(true) {
        if start > pos {
            break;
        }
        boundary = start;
    }
    boundary
}

/// The smallest grapheme boundary of `text` at or after `pos`.
pub fn ceil_boundary(text: &str, pos: usize) -> usize {
    text.grapheme_indices(true)
        .map(|(start, _)| start)
        .find(|start| *start >= pos)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_ascii_cjk_combining() {
        assert_eq!(plain_width("hello"), 5);
        assert_eq!(plain_width("日本"), 4);
        assert_eq!(plain_width("e\u{301}"), 1);
        assert_eq!(plain_width(""), 0);
    }

    #[test]
    fn test_forward_offsets() {
        let units: Vec<_> = graphemes("a日e\u{301}").collect();
        assert_eq!(units.len(), 3);

        assert_eq!(units[0].main, 'a');
        assert_eq!((units[0].byte_pos, units[0].byte_len), (0, 1));
        assert_eq!((units[0].screen_pos, units[0].screen_width), (0, 1));

        assert_eq!(units[1].main, '日');
        assert_eq!((units[1].byte_pos, units[1].byte_len), (1, 3));
        assert_eq!((units[1].screen_pos, units[1].screen_width), (1, 2));

        assert_eq!(units[2].main, 'e');
        assert_eq!(units[2].combining(), vec!['\u{301}']);
        assert_eq!((units[2].byte_pos, units[2].byte_len), (4, 3));
        assert_eq!((units[2].screen_pos, units[2].screen_width), (3, 1));
    }

    #[test]
    fn test_reverse_matches_forward() {
        let text = "x日y\u{308}z";
        let forward: Vec<_> = graphemes(text).collect();
        let mut backward: Vec<_> = graphemes(text).rev().collect();
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_iterate_early_stop() {
        let mut seen = Vec::new();
        let stopped = iterate("abcd", |unit| {
            seen.push(unit.main);
            unit.main == 'b'
        });
        assert!(stopped);
        assert_eq!(seen, vec!['a', 'b']);

        assert!(!iterate("abcd", |_| false));
    }

    #[test]
    fn test_iterate_reverse_order() {
        let mut seen = Vec::new();
        iterate_reverse("ab日", |unit| {
            seen.push((unit.main, unit.screen_pos));
            false
        });
        assert_eq!(seen, vec![('日', 2), ('b', 1), ('a', 0)]);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let iter = graphemes("héllo");
        let first: Vec<_> = iter.clone().map(|u| u.text).collect();
        let second: Vec<_> = iter.map(|u| u.text).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_boundaries() {
        let text = "ae\u{301}b";
        // 'a' = 0, "e\u{301}" = 1..4, 'b' = 4
        assert_eq!(floor_boundary(text, 2), 1);
        assert_eq!(ceil_boundary(text, 2), 4);
        assert_eq!(floor_boundary(text, 4), 4);
        assert_eq!(floor_boundary(text, 99), text.len());
        assert_eq!(ceil_boundary(text, 99), text.len());
    }
}
