//! Primitive module: The drawing and input contract every widget shares.
//!
//! # Core Concepts
//!
//! - [`Primitive`]: Draw, focus and wrapped input/mouse handlers
//! - [`Block`]: The owned box (rect, border, title, padding) behind every
//!   widget
//! - [`FormItem`]: The extra capabilities a container needs to lay out and
//!   cycle through fields
//! - [`FocusDelegate`] and [`Dispatcher`]: How focus moves and events reach
//!   the focused leaf
//!
//! # Lock discipline
//!
//! Each widget guards its own state with a private lock. Handlers take the
//! lock only around state changes and release it before calling any user
//! callback, so callbacks may freely call back into the widget.

mod block;
mod focus;

pub use block::{Block, InputCapture, MouseCapture};
pub use focus::{Dispatcher, FocusDelegate};

use crate::event::{KeyCode, KeyEvent, MouseAction, MouseEvent};
use crate::layout::Rect;
use crate::style::{Color, Theme};
use crate::terminal::Screen;
use std::sync::Arc;

/// Result of a mouse handler: whether the event was consumed, and which
/// primitive (if any) should receive the following mouse events directly.
pub type MouseOutcome = (bool, Option<Arc<dyn Primitive>>);

/// Callback receiving the key that ended an interaction.
pub type KeyCallback = Arc<dyn Fn(KeyCode) + Send + Sync>;

/// Anything that can be drawn and receive input.
///
/// Implementors provide [`block`](Self::block) and [`draw`](Self::draw),
/// and override [`handle_key`](Self::handle_key) /
/// [`handle_mouse`](Self::handle_mouse) for their own behavior. Callers
/// always go through [`input_handler`](Self::input_handler) and
/// [`mouse_handler`](Self::mouse_handler), which run the block's captures
/// first.
pub trait Primitive: Send + Sync {
    /// The widget's box.
    fn block(&self) -> &Block;

    /// Draw the widget. Called on every redraw.
    fn draw(&self, screen: &mut dyn Screen);

    /// Outer rectangle.
    fn rect(&self) -> Rect {
        self.block().rect()
    }

    /// Position the widget.
    fn set_rect(&self, rect: Rect) {
        self.block().set_rect(rect);
    }

    /// Called when the widget receives focus.
    ///
    /// Containers pass focus on with `delegate.request(child)` instead of
    /// taking it themselves.
    fn focus(&self, _delegate: &FocusDelegate) {
        self.block().set_focused(true);
    }

    /// Called when the widget loses focus.
    fn blur(&self) {
        self.block().set_focused(false);
    }

    /// Whether this widget, or the child it delegates to, has focus.
    fn has_focus(&self) -> bool {
        self.block().is_focused()
    }

    /// Raw key handling. Call [`input_handler`](Self::input_handler)
    /// instead.
    fn handle_key(&self, _event: &KeyEvent, _set_focus: &FocusDelegate) {}

    /// Raw mouse handling. Call [`mouse_handler`](Self::mouse_handler)
    /// instead.
    ///
    /// The default takes focus on a left click inside the rectangle.
    fn handle_mouse(
        &self,
        action: MouseAction,
        event: &MouseEvent,
        set_focus: &FocusDelegate,
    ) -> MouseOutcome {
        if action == MouseAction::LeftClick && self.block().in_rect(event.x, event.y) {
            if let Some(me) = self.block().handle() {
                set_focus.request(me);
            }
            return (true, None);
        }
        (false, None)
    }

    /// Handle a key event through the block's input capture.
    fn input_handler(&self, event: &KeyEvent, set_focus: &FocusDelegate) {
        self.block()
            .wrap_input_handler(event, set_focus, |event, set_focus| {
                self.handle_key(event, set_focus);
            });
    }

    /// Handle a mouse event through the block's mouse capture.
    fn mouse_handler(
        &self,
        action: MouseAction,
        event: &MouseEvent,
        set_focus: &FocusDelegate,
    ) -> MouseOutcome {
        self.block()
            .wrap_mouse_handler(action, event, set_focus, |action, event, set_focus| {
                self.handle_mouse(action, event, set_focus)
            })
    }
}

/// Label, field text and field background colors, each with a focused
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldColors {
    /// Label text.
    pub label: Color,
    /// Label text while focused.
    pub label_focused: Color,
    /// Field text.
    pub field_text: Color,
    /// Field text while focused.
    pub field_text_focused: Color,
    /// Field background.
    pub field_background: Color,
    /// Field background while focused.
    pub field_background_focused: Color,
}

impl FieldColors {
    /// Colors derived from a theme.
    pub const fn from_theme(theme: &Theme) -> Self {
        Self {
            label: theme.secondary_text_color,
            label_focused: theme.secondary_text_color,
            field_text: theme.primary_text_color,
            field_text_focused: theme.primary_text_color,
            field_background: theme.contrast_background_color,
            field_background_focused: theme.more_contrast_background_color,
        }
    }

    /// Pick label, text and background for the given focus state.
    pub const fn resolve(&self, focused: bool) -> (Color, Color, Color) {
        if focused {
            (
                self.label_focused,
                self.field_text_focused,
                self.field_background_focused,
            )
        } else {
            (self.label, self.field_text, self.field_background)
        }
    }
}

impl Default for FieldColors {
    fn default() -> Self {
        Self::from_theme(&Theme::DEFAULT)
    }
}

/// A widget that can be placed in a [`Form`](crate::widget::Form).
///
/// Containers depend only on this trait, never on concrete field types.
pub trait FormItem: Primitive {
    /// The label text.
    fn label(&self) -> String;

    /// Label width in columns. 0 means the label's natural width.
    fn label_width(&self) -> usize;

    /// Set the label width. 0 means the label's natural width.
    fn set_label_width(&self, width: usize);

    /// Preferred field width. 0 means "as wide as possible".
    fn field_width(&self) -> usize;

    /// Rows the item occupies.
    fn field_height(&self) -> usize {
        1
    }

    /// Current label and field colors.
    fn field_colors(&self) -> FieldColors;

    /// Set label and field colors.
    fn set_field_colors(&self, colors: FieldColors);

    /// Called with the key that moved focus away from the item (Tab,
    /// Backtab, Enter, Escape).
    fn set_finished_func(&self, handler: KeyCallback);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use std::sync::{Mutex, Weak};

    struct Dot {
        block: Block,
    }

    impl Primitive for Dot {
        fn block(&self) -> &Block {
            &self.block
        }

        fn draw(&self, screen: &mut dyn Screen) {
            self.block.draw(screen);
        }
    }

    fn dot() -> Arc<Dot> {
        Arc::new_cyclic(|weak: &Weak<Dot>| {
            let handle: Weak<dyn Primitive> = weak.clone();
            Dot {
                block: Block::new(&Theme::DEFAULT, handle),
            }
        })
    }

    fn recorder() -> (FocusDelegate, Arc<Mutex<Vec<Arc<dyn Primitive>>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&requests);
        let delegate = FocusDelegate::new(move |p| sink.lock().unwrap().push(p));
        (delegate, requests)
    }

    #[test]
    fn test_default_click_requests_focus() {
        let d = dot();
        d.set_rect(Rect::new(0, 0, 3, 1));
        let (delegate, requests) = recorder();

        let (consumed, capture) =
            d.mouse_handler(MouseAction::LeftClick, &MouseEvent::new(1, 0), &delegate);
        assert!(consumed);
        assert!(capture.is_none());

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(std::ptr::addr_eq(
            Arc::as_ptr(&requests[0]),
            Arc::as_ptr(&d)
        ));
    }

    #[test]
    fn test_default_click_outside_ignored() {
        let d = dot();
        d.set_rect(Rect::new(0, 0, 3, 1));
        let (delegate, requests) = recorder();

        let (consumed, _) =
            d.mouse_handler(MouseAction::LeftClick, &MouseEvent::new(5, 0), &delegate);
        assert!(!consumed);
        assert!(requests.lock().unwrap().is_empty());
    }

    #[test]
    fn test_focus_and_blur_toggle_flag() {
        let d = dot();
        assert!(!d.has_focus());
        d.focus(&FocusDelegate::noop());
        assert!(d.has_focus());
        d.blur();
        assert!(!d.has_focus());
    }

    #[test]
    fn test_field_colors_resolve() {
        let colors = FieldColors::default();
        let (_, _, bg) = colors.resolve(false);
        assert_eq!(bg, Theme::DEFAULT.contrast_background_color);
        let (_, _, bg) = colors.resolve(true);
        assert_eq!(bg, Theme::DEFAULT.more_contrast_background_color);
    }

    #[test]
    fn test_draw_through_trait_object() {
        let d = dot();
        d.set_rect(Rect::new(0, 0, 2, 1));
        d.block().set_background_color(Color::Red);
        let p: Arc<dyn Primitive> = d;

        let mut buf = Buffer::new(3, 1);
        p.draw(&mut buf);
        assert_eq!(buf.get(1, 0).and_then(|c| c.bg()), Some(Color::Red));
        assert_eq!(buf.get(2, 0).and_then(|c| c.bg()), None);
    }
}
