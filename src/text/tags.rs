//! Style tags: `[fg:bg:attrs]` directives embedded in text.
//!
//! Each component is a color name, `#rrggbb`, `-` (back to the base style)
//! or empty (unchanged). Attributes are the letters `lbidrus`. A tag that
//! cannot be parsed is shown as literal text. `[...[]` is the escaped form
//! of `[...]` and prints as `[...]`.

use super::grapheme::plain_width;
use crate::style::{parse_color, Color, Modifiers, Style};
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r##"(?P<escape>\[[a-zA-Z0-9_,;: \-\."#]+\[+\])|(?P<tag>\[(?P<fg>[a-zA-Z_]+|#[0-9a-fA-F]{6}|-)?(?::(?P<bg>[a-zA-Z_]+|#[0-9a-fA-F]{6}|-)?(?::(?P<attrs>[lbidrus]+|-)?)?)?\])"##,
        )
        .expect("style tag pattern is valid")
    })
}

fn escapable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r##"(\[[a-zA-Z0-9_,;: \-\."#]+\[*)\]"##).expect("escape pattern is valid")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorChange {
    Keep,
    Reset,
    Set(Color),
}

impl ColorChange {
    fn parse(component: Option<&str>) -> Option<Self> {
        match component {
            None | Some("") => Some(Self::Keep),
            Some("-") => Some(Self::Reset),
            Some(name) => parse_color(name).ok().map(Self::Set),
        }
    }

    fn apply(self, current: Option<Color>, base: Option<Color>) -> Option<Color> {
        match self {
            Self::Keep => current,
            Self::Reset => base,
            Self::Set(color) => Some(color),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrChange {
    Keep,
    Reset,
    Set(Modifiers),
}

/// A parsed `[fg:bg:attrs]` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StyleTag {
    fg: ColorChange,
    bg: ColorChange,
    attrs: AttrChange,
}

impl StyleTag {
    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let fg = caps.name("fg").map(|m| m.as_str());
        let bg = caps.name("bg").map(|m| m.as_str());
        let attrs = caps.name("attrs").map(|m| m.as_str());
        if fg.is_none() && bg.is_none() && attrs.is_none() {
            return None;
        }
        Some(Self {
            fg: ColorChange::parse(fg)?,
            bg: ColorChange::parse(bg)?,
            attrs: match attrs {
                None => AttrChange::Keep,
                Some("-") => AttrChange::Reset,
                Some(letters) => AttrChange::Set(Modifiers::from_tag_letters(letters)),
            },
        })
    }

    /// Apply the tag to `current`; `-` components fall back to `base`.
    pub(crate) fn apply(&self, current: Style, base: Style) -> Style {
        Style {
            fg: self.fg.apply(current.fg, base.fg),
            bg: self.bg.apply(current.bg, base.bg),
            modifiers: match self.attrs {
                AttrChange::Keep => current.modifiers,
                AttrChange::Reset => base.modifiers,
                AttrChange::Set(modifiers) => modifiers,
            },
        }
    }
}

/// A piece of tagged text. Offsets refer to the original string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// Plain text shown as-is.
    Text { text: &'a str, start: usize },
    /// An escaped tag, shown with one bracket removed.
    Literal { text: String, start: usize, len: usize },
    /// A style change, not shown.
    Tag { tag: StyleTag, start: usize, len: usize },
}

/// Split tagged text into plain, literal and tag segments.
pub(crate) fn decompose(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in segment_pattern().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > cursor {
            segments.push(Segment::Text {
                text: &text[cursor..whole.start()],
                start: cursor,
            });
        }

        let matched = whole.as_str();
        if caps.name("escape").is_some() {
            let mut literal = matched[..matched.len() - 2].to_string();
            literal.push(']');
            segments.push(Segment::Literal {
                text: literal,
                start: whole.start(),
                len: matched.len(),
            });
        } else if let Some(tag) = StyleTag::from_captures(&caps) {
            segments.push(Segment::Tag {
                tag,
                start: whole.start(),
                len: matched.len(),
            });
        } else {
            tracing::trace!(tag = matched, "unrecognized style tag printed literally");
            segments.push(Segment::Text {
                text: matched,
                start: whole.start(),
            });
        }
        cursor = whole.end();
    }

    if cursor < text.len() {
        segments.push(Segment::Text {
            text: &text[cursor..],
            start: cursor,
        });
    }
    segments
}

/// Escape every bracketed sequence that could be read as a style tag, so the
/// text prints literally.
pub fn escape(text: &str) -> String {
    escapable_pattern().replace_all(text, "${1}[]").into_owned()
}

/// The visible text with style tags removed and escapes resolved.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in decompose(text) {
        match segment {
            Segment::Text { text, .. } => out.push_str(text),
            Segment::Literal { text, .. } => out.push_str(&text),
            Segment::Tag { .. } => {}
        }
    }
    out
}

/// Display width of tagged text, ignoring the tags themselves.
pub fn string_width(text: &str) -> usize {
    plain_width(&strip_tags(text))
}
