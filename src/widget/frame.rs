//! Frame: A primitive wrapped with header and footer text.

use crate::event::{KeyEvent, MouseAction, MouseEvent};
use crate::layout::{Alignment, Rect};
use crate::primitive::{Block, FocusDelegate, MouseOutcome, Primitive};
use crate::style::{Color, Theme};
use crate::sync::{read, write};
use crate::terminal::Screen;
use crate::text::print;
use std::sync::{Arc, RwLock, Weak};

#[derive(Debug, Clone)]
struct FrameText {
    text: String,
    header: bool,
    align: Alignment,
    color: Color,
}

/// Rows and columns kept free around a frame's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Spacing {
    top: i32,
    bottom: i32,
    header: i32,
    footer: i32,
    left: i32,
    right: i32,
}

struct State {
    texts: Vec<FrameText>,
    spacing: Spacing,
}

/// Wraps one primitive, adding header and footer lines around it.
///
/// Focus, keys and mouse events all pass through to the wrapped primitive.
pub struct Frame {
    block: Block,
    child: Arc<dyn Primitive>,
    state: RwLock<State>,
}

impl Frame {
    /// Wrap `child` with the default theme.
    pub fn new(child: Arc<dyn Primitive>) -> Arc<Self> {
        Self::with_theme(child, &Theme::DEFAULT)
    }

    /// Wrap `child` with `theme`.
    pub fn with_theme(child: Arc<dyn Primitive>, theme: &Theme) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let handle: Weak<dyn Primitive> = weak.clone();
            Self {
                block: Block::new(theme, handle),
                child,
                state: RwLock::new(State {
                    texts: Vec::new(),
                    spacing: Spacing {
                        top: 1,
                        bottom: 1,
                        header: 1,
                        footer: 1,
                        left: 1,
                        right: 1,
                    },
                }),
            }
        })
    }

    /// The wrapped primitive.
    pub fn child(&self) -> Arc<dyn Primitive> {
        Arc::clone(&self.child)
    }

    /// Add a line of text. Header lines stack downward from the top, footer
    /// lines upward from the bottom, separately per alignment.
    pub fn add_text(&self, text: &str, header: bool, align: Alignment, color: Color) -> &Self {
        write(&self.state).texts.push(FrameText {
            text: text.to_string(),
            header,
            align,
            color,
        });
        self
    }

    /// Remove all header and footer lines.
    pub fn clear_text(&self) -> &Self {
        write(&self.state).texts.clear();
        self
    }

    /// Set the space kept free: rows above the header and below the footer,
    /// rows between header and content and between content and footer, and
    /// columns on the left and right.
    pub fn set_borders(
        &self,
        top: i32,
        bottom: i32,
        header: i32,
        footer: i32,
        left: i32,
        right: i32,
    ) -> &Self {
        write(&self.state).spacing = Spacing {
            top,
            bottom,
            header,
            footer,
            left,
            right,
        };
        self
    }

    /// Where the wrapped primitive goes, after drawing the text lines.
    fn draw_texts(&self, screen: &mut dyn Screen) -> Option<Rect> {
        let inner = self.block.inner_rect();
        let state = read(&self.state);
        let spacing = state.spacing;

        let x = inner.x + spacing.left;
        let width = inner.width - spacing.left - spacing.right;
        let mut top = inner.y + spacing.top;
        let mut bottom = inner.bottom() - 1 - spacing.bottom;

        // Lines used per slot: header left/center/right, footer left/center/right.
        let mut rows = [0_i32; 6];
        let mut top_max = top;
        let mut bottom_min = bottom;
        for text in &state.texts {
            let slot = match text.align {
                Alignment::Left => 0,
                Alignment::Center => 1,
                Alignment::Right => 2,
            };
            let y = if text.header {
                let y = top + rows[slot];
                rows[slot] += 1;
                if y >= bottom_min {
                    continue;
                }
                top_max = top_max.max(y + 1);
                y
            } else {
                let y = bottom - rows[3 + slot];
                rows[3 + slot] += 1;
                if y <= top_max {
                    continue;
                }
                bottom_min = bottom_min.min(y - 1);
                y
            };
            print(screen, &text.text, x, y, width, text.align, text.color);
        }

        if top_max > top {
            top = top_max + spacing.header;
        }
        if bottom_min < bottom {
            bottom = bottom_min - spacing.footer;
        }
        (top <= bottom).then(|| Rect::new(x, top, width, bottom + 1 - top))
    }
}

impl Primitive for Frame {
    fn block(&self) -> &Block {
        &self.block
    }

    fn draw(&self, screen: &mut dyn Screen) {
        self.block.draw(screen);
        if let Some(rect) = self.draw_texts(screen) {
            self.child.set_rect(rect);
            self.child.draw(screen);
        }
    }

    fn focus(&self, delegate: &FocusDelegate) {
        delegate.request(Arc::clone(&self.child));
    }

    fn has_focus(&self) -> bool {
        self.child.has_focus()
    }

    fn handle_key(&self, event: &KeyEvent, set_focus: &FocusDelegate) {
        self.child.input_handler(event, set_focus);
    }

    fn handle_mouse(
        &self,
        action: MouseAction,
        event: &MouseEvent,
        set_focus: &FocusDelegate,
    ) -> MouseOutcome {
        if !self.block.in_rect(event.x, event.y) {
            return (false, None);
        }
        self.child.mouse_handler(action, event, set_focus)
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("texts", &read(&self.state).texts.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::widget::Panel;

    #[test]
    fn test_header_footer_and_child_rect() {
        let child = Panel::new();
        let frame = Frame::new(child.clone());
        frame.set_rect(Rect::new(0, 0, 10, 8));
        frame
            .add_text("head", true, Alignment::Left, Color::White)
            .add_text("foot", false, Alignment::Right, Color::White);

        let mut buf = Buffer::new(10, 8);
        frame.draw(&mut buf);

        assert_eq!(buf.row_text(1), " head     ");
        assert_eq!(buf.row_text(6), "     foot ");
        // Below the header and its spacing, above the footer and its spacing.
        assert_eq!(child.rect(), Rect::new(1, 3, 8, 2));
    }

    #[test]
    fn test_footer_on_last_row_survives_child() {
        let child = Panel::new();
        let frame = Frame::new(child.clone());
        frame.set_borders(0, 0, 0, 0, 0, 0);
        frame.set_rect(Rect::new(0, 0, 10, 4));
        frame.add_text("foot", false, Alignment::Left, Color::White);

        let mut buf = Buffer::new(10, 4);
        frame.draw(&mut buf);

        assert_eq!(buf.row_text(3), "foot      ");
        assert_eq!(child.rect(), Rect::new(0, 0, 10, 3));
    }

    #[test]
    fn test_no_room_for_child() {
        let child = Panel::new();
        child.set_rect(Rect::new(9, 9, 1, 1));
        let frame = Frame::new(child.clone());
        frame.set_rect(Rect::new(0, 0, 10, 2));
        frame.add_text("head", true, Alignment::Center, Color::White);

        let mut buf = Buffer::new(10, 2);
        frame.draw(&mut buf);
        assert_eq!(child.rect(), Rect::new(9, 9, 1, 1));
    }

    #[test]
    fn test_focus_delegates_to_child() {
        let child = Panel::new();
        let frame = Frame::new(child.clone());
        let requested = Arc::new(std::sync::Mutex::new(0));
        let counter = Arc::clone(&requested);
        frame.focus(&FocusDelegate::new(move |_| *counter.lock().unwrap() += 1));
        assert_eq!(*requested.lock().unwrap(), 1);

        assert!(!frame.has_focus());
        child.block().set_focused(true);
        assert!(frame.has_focus());
    }
}
