//! Block: The box every widget is built around.
//!
//! A [`Block`] owns the geometry and decoration shared by all widgets:
//! rectangle, border, title, padding and background. Widgets hold one as a
//! field and call [`Block::draw`] before drawing their own content.
//! [`Block::inner_rect`] is the only place border and padding are
//! subtracted.

use super::{FocusDelegate, MouseOutcome, Primitive};
use crate::event::{KeyEvent, MouseAction, MouseEvent};
use crate::layout::{Alignment, Padding, Rect};
use crate::style::{BorderGlyphs, Color, Modifiers, Style, Theme};
use crate::sync::{read, write};
use crate::terminal::Screen;
use crate::text::print;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, Weak};

/// Rewrites or swallows key events before a widget sees them.
pub type InputCapture = Arc<dyn Fn(KeyEvent) -> Option<KeyEvent> + Send + Sync>;

/// Rewrites or swallows mouse events before a widget sees them.
pub type MouseCapture =
    Arc<dyn Fn(MouseAction, MouseEvent) -> Option<(MouseAction, MouseEvent)> + Send + Sync>;

struct BlockState {
    rect: Rect,
    padding: Padding,
    border: bool,
    border_color: Color,
    border_modifiers: Modifiers,
    title: String,
    title_color: Color,
    title_align: Alignment,
    background_color: Color,
    transparent: bool,
    visible: bool,
    show_focus: bool,
    glyphs: BorderGlyphs,
    focused_glyphs: BorderGlyphs,
    input_capture: Option<InputCapture>,
    mouse_capture: Option<MouseCapture>,
}

/// Geometry, border, title and background shared by every widget.
///
/// The block also carries a weak handle to the widget that owns it, so
/// default handlers can request focus for "this widget" and the border can
/// ask the owner whether it has focus.
pub struct Block {
    state: RwLock<BlockState>,
    focused: AtomicBool,
    handle: Weak<dyn Primitive>,
}

impl Block {
    /// Create a block for the widget behind `handle`.
    ///
    /// Widgets are built with [`Arc::new_cyclic`], which supplies the weak
    /// handle before the widget itself exists.
    pub fn new(theme: &Theme, handle: Weak<dyn Primitive>) -> Self {
        Self {
            state: RwLock::new(BlockState {
                rect: Rect::new(0, 0, 15, 10),
                padding: Padding::ZERO,
                border: false,
                border_color: theme.border_color,
                border_modifiers: Modifiers::empty(),
                title: String::new(),
                title_color: theme.title_color,
                title_align: Alignment::Center,
                background_color: theme.primitive_background_color,
                transparent: false,
                visible: true,
                show_focus: true,
                glyphs: theme.borders,
                focused_glyphs: theme.focused_borders,
                input_capture: None,
                mouse_capture: None,
            }),
            focused: AtomicBool::new(false),
            handle,
        }
    }

    /// The widget that owns this block, if it is still alive.
    pub fn handle(&self) -> Option<Arc<dyn Primitive>> {
        self.handle.upgrade()
    }

    /// The outer rectangle.
    pub fn rect(&self) -> Rect {
        read(&self.state).rect
    }

    /// Position the block.
    pub fn set_rect(&self, rect: Rect) {
        write(&self.state).rect = rect;
    }

    /// The rectangle left for content after border and padding.
    ///
    /// Never has a negative size.
    pub fn inner_rect(&self) -> Rect {
        let state = read(&self.state);
        let outer = if state.border {
            state.rect.inset(Padding::uniform(1))
        } else {
            state.rect
        };
        outer.inset(state.padding)
    }

    /// Check whether `(x, y)` lies inside the outer rectangle.
    pub fn in_rect(&self, x: i32, y: i32) -> bool {
        self.rect().contains(x, y)
    }

    /// Space between the border and the content.
    pub fn set_padding(&self, padding: Padding) {
        write(&self.state).padding = padding;
    }

    /// Current padding.
    pub fn padding(&self) -> Padding {
        read(&self.state).padding
    }

    /// Show or hide the border.
    pub fn set_border(&self, border: bool) {
        write(&self.state).border = border;
    }

    /// Whether a border is drawn.
    pub fn has_border(&self) -> bool {
        read(&self.state).border
    }

    /// Border color.
    pub fn set_border_color(&self, color: Color) {
        write(&self.state).border_color = color;
    }

    /// Text attributes for the border glyphs.
    pub fn set_border_modifiers(&self, modifiers: Modifiers) {
        write(&self.state).border_modifiers = modifiers;
    }

    /// Title drawn into the top border. May contain style tags.
    pub fn set_title(&self, title: &str) {
        write(&self.state).title = title.to_string();
    }

    /// Current title.
    pub fn title(&self) -> String {
        read(&self.state).title.clone()
    }

    /// Title color.
    pub fn set_title_color(&self, color: Color) {
        write(&self.state).title_color = color;
    }

    /// Title alignment.
    pub fn set_title_align(&self, align: Alignment) {
        write(&self.state).title_align = align;
    }

    /// Background color.
    pub fn set_background_color(&self, color: Color) {
        write(&self.state).background_color = color;
    }

    /// Current background color.
    pub fn background_color(&self) -> Color {
        read(&self.state).background_color
    }

    /// Skip the background fill and keep whatever is on screen.
    pub fn set_transparent(&self, transparent: bool) {
        write(&self.state).transparent = transparent;
    }

    /// Hide or show the widget. Hidden blocks draw nothing.
    pub fn set_visible(&self, visible: bool) {
        write(&self.state).visible = visible;
    }

    /// Whether the widget is drawn.
    pub fn is_visible(&self) -> bool {
        read(&self.state).visible
    }

    /// Draw focused borders with the focused glyph set.
    pub fn set_show_focus(&self, show: bool) {
        write(&self.state).show_focus = show;
    }

    /// Record whether this block's widget holds focus.
    pub fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::Release);
    }

    /// The focus flag set by [`set_focused`](Self::set_focused).
    pub fn is_focused(&self) -> bool {
        self.focused.load(Ordering::Acquire)
    }

    /// Intercept key events before the widget's own handler.
    ///
    /// Return the event (possibly rewritten) to pass it on, or `None` to
    /// swallow it.
    pub fn set_input_capture<F>(&self, capture: F)
    where
        F: Fn(KeyEvent) -> Option<KeyEvent> + Send + Sync + 'static,
    {
        write(&self.state).input_capture = Some(Arc::new(capture));
    }

    /// Intercept mouse events before the widget's own handler.
    pub fn set_mouse_capture<F>(&self, capture: F)
    where
        F: Fn(MouseAction, MouseEvent) -> Option<(MouseAction, MouseEvent)> + Send + Sync + 'static,
    {
        write(&self.state).mouse_capture = Some(Arc::new(capture));
    }

    /// Run `handler` on `event` after the input capture has had its turn.
    ///
    /// The capture is cloned out of the lock before it is called, so it may
    /// call back into the block.
    pub fn wrap_input_handler<F>(&self, event: &KeyEvent, set_focus: &FocusDelegate, handler: F)
    where
        F: FnOnce(&KeyEvent, &FocusDelegate),
    {
        let capture = read(&self.state).input_capture.clone();
        let event = match capture {
            Some(capture) => match capture(*event) {
                Some(event) => event,
                None => {
                    tracing::trace!(?event, "key swallowed by input capture");
                    return;
                }
            },
            None => *event,
        };
        handler(&event, set_focus);
    }

    /// Run `handler` on a mouse event after the mouse capture has had its
    /// turn. A swallowed event counts as consumed.
    pub fn wrap_mouse_handler<F>(
        &self,
        action: MouseAction,
        event: &MouseEvent,
        set_focus: &FocusDelegate,
        handler: F,
    ) -> MouseOutcome
    where
        F: FnOnce(MouseAction, &MouseEvent, &FocusDelegate) -> MouseOutcome,
    {
        let capture = read(&self.state).mouse_capture.clone();
        let (action, event) = match capture {
            Some(capture) => match capture(action, *event) {
                Some(pair) => pair,
                None => return (true, None),
            },
            None => (action, *event),
        };
        handler(action, &event, set_focus)
    }

    /// Paint background, border and title.
    pub fn draw(&self, screen: &mut dyn Screen) {
        self.draw_box(screen, None);
    }

    /// Like [`draw`](Self::draw) but with a different background color for
    /// this frame only. Widgets with focused color variants use this.
    pub fn draw_with_background(&self, screen: &mut dyn Screen, background: Color) {
        self.draw_box(screen, Some(background));
    }

    fn draw_box(&self, screen: &mut dyn Screen, background: Option<Color>) {
        // Ask the owner, not the flag: containers answer for their children.
        let focused = self.handle.upgrade().is_some_and(|owner| owner.has_focus());

        let state = read(&self.state);
        let rect = state.rect;
        if !state.visible || rect.is_empty() {
            return;
        }

        let background = background.unwrap_or(state.background_color);
        if !state.transparent {
            let fill = Style::new().bg(background);
            for y in rect.y..rect.bottom() {
                for x in rect.x..rect.right() {
                    screen.set_content(x, y, ' ', &[], fill);
                }
            }
        }

        if !state.border || rect.width < 2 || rect.height < 2 {
            return;
        }

        let glyphs = if focused && state.show_focus {
            state.focused_glyphs
        } else {
            state.glyphs
        };
        let mut style = Style::new()
            .fg(state.border_color)
            .modifiers(state.border_modifiers);
        if !state.transparent {
            style = style.bg(background);
        }

        let (left, top) = (rect.x, rect.y);
        let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);
        for x in left + 1..right {
            screen.set_content(x, top, glyphs.horizontal, &[], style);
            screen.set_content(x, bottom, glyphs.horizontal, &[], style);
        }
        for y in top + 1..bottom {
            screen.set_content(left, y, glyphs.vertical, &[], style);
            screen.set_content(right, y, glyphs.vertical, &[], style);
        }
        screen.set_content(left, top, glyphs.top_left, &[], style);
        screen.set_content(right, top, glyphs.top_right, &[], style);
        screen.set_content(left, bottom, glyphs.bottom_left, &[], style);
        screen.set_content(right, bottom, glyphs.bottom_right, &[], style);

        if !state.title.is_empty() && rect.width >= 4 {
            print(
                screen,
                &state.title,
                left + 1,
                top,
                rect.width - 2,
                state.title_align,
                state.title_color,
            );
        }
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = read(&self.state);
        f.debug_struct("Block")
            .field("rect", &state.rect)
            .field("border", &state.border)
            .field("title", &state.title)
            .field("focused", &self.is_focused())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::event::KeyCode;
    use std::sync::Mutex;

    struct Plain {
        block: Block,
    }

    impl Primitive for Plain {
        fn block(&self) -> &Block {
            &self.block
        }

        fn draw(&self, screen: &mut dyn Screen) {
            self.block.draw(screen);
        }
    }

    fn plain() -> Arc<Plain> {
        Arc::new_cyclic(|weak: &Weak<Plain>| {
            let handle: Weak<dyn Primitive> = weak.clone();
            Plain {
                block: Block::new(&Theme::DEFAULT, handle),
            }
        })
    }

    #[test]
    fn test_inner_rect_border_and_padding() {
        let p = plain();
        p.block.set_rect(Rect::new(2, 3, 20, 10));
        assert_eq!(p.block.inner_rect(), Rect::new(2, 3, 20, 10));

        p.block.set_border(true);
        assert_eq!(p.block.inner_rect(), Rect::new(3, 4, 18, 8));

        p.block.set_padding(Padding::new(1, 2, 3, 4));
        assert_eq!(p.block.inner_rect(), Rect::new(6, 5, 11, 5));
    }

    #[test]
    fn test_inner_rect_never_negative() {
        let p = plain();
        p.block.set_rect(Rect::new(0, 0, 3, 1));
        p.block.set_border(true);
        p.block.set_padding(Padding::uniform(2));
        let inner = p.block.inner_rect();
        assert_eq!(inner.width, 0);
        assert_eq!(inner.height, 0);
    }

    #[test]
    fn test_draw_border_and_title() {
        let p = plain();
        p.block.set_rect(Rect::new(0, 0, 10, 3));
        p.block.set_border(true);
        p.block.set_title("Hi");

        let mut buf = Buffer::new(10, 3);
        p.draw(&mut buf);

        assert_eq!(buf.row_text(0), "┌───Hi───┐");
        assert_eq!(buf.row_text(1), "│        │");
        assert_eq!(buf.row_text(2), "└────────┘");
        assert_eq!(buf.get(4, 0).and_then(|c| c.bg()), Some(Color::Black));
    }

    #[test]
    fn test_draw_focused_border() {
        let p = plain();
        p.block.set_rect(Rect::new(0, 0, 4, 2));
        p.block.set_border(true);
        p.block.set_focused(true);

        let mut buf = Buffer::new(4, 2);
        p.draw(&mut buf);
        assert_eq!(buf.row_text(0), "╔══╗");
    }

    #[test]
    fn test_draw_degenerate_rect_is_noop() {
        let p = plain();
        p.block.set_rect(Rect::new(0, 0, 0, 5));
        p.block.set_background_color(Color::Red);

        let mut buf = Buffer::new(4, 4);
        p.draw(&mut buf);
        assert!(buf.rows().flatten().all(|c| c.bg().is_none()));
    }

    #[test]
    fn test_draw_transparent_keeps_background() {
        let p = plain();
        p.block.set_rect(Rect::new(0, 0, 2, 1));
        p.block.set_transparent(true);

        let mut buf = Buffer::new(2, 1);
        buf.set_content(0, 0, 'x', &[], Style::new().bg(Color::Red));
        p.draw(&mut buf);
        assert_eq!(buf.row_text(0), "x ");
    }

    #[test]
    fn test_input_capture_rewrites_and_swallows() {
        let p = plain();
        p.block.set_input_capture(|event| match event.code {
            KeyCode::Up => Some(KeyEvent::plain(KeyCode::BackTab)),
            KeyCode::Esc => None,
            _ => Some(event),
        });

        let seen = Mutex::new(Vec::new());
        let delegate = FocusDelegate::noop();
        for code in [KeyCode::Up, KeyCode::Esc, KeyCode::Enter] {
            p.block
                .wrap_input_handler(&KeyEvent::plain(code), &delegate, |event, _| {
                    seen.lock().unwrap().push(event.code);
                });
        }
        assert_eq!(
            seen.into_inner().unwrap(),
            vec![KeyCode::BackTab, KeyCode::Enter]
        );
    }

    #[test]
    fn test_mouse_capture_swallow_is_consumed() {
        let p = plain();
        p.block.set_mouse_capture(|_, _| None);
        let (consumed, capture) = p.block.wrap_mouse_handler(
            MouseAction::LeftClick,
            &MouseEvent::new(0, 0),
            &FocusDelegate::noop(),
            |_, _, _| panic!("handler must not run"),
        );
        assert!(consumed);
        assert!(capture.is_none());
    }
}
