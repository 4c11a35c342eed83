//! Modal: A centered message box with a row of buttons.
//!
//! A modal is a [`Frame`] around a [`Form`] that holds only buttons. It has
//! no layout of its own beyond sizing: every draw measures the message and
//! the button row against the screen, centers the result and hands the
//! rectangle to the frame.

use super::{ButtonColors, Form, Frame};
use crate::event::{MouseAction, MouseEvent};
use crate::layout::{Alignment, Padding, Rect};
use crate::primitive::{Block, FocusDelegate, MouseOutcome, Primitive};
use crate::style::{Color, Theme};
use crate::sync::{read, write};
use crate::terminal::Screen;
use crate::text::{string_width, word_wrap};
use std::sync::{Arc, RwLock, Weak};

/// Receives the index and label of the chosen button, or `None` and an
/// empty label when the modal is dismissed with Escape.
pub type ModalCallback = Arc<dyn Fn(Option<usize>, &str) + Send + Sync>;

struct State {
    text: String,
    text_color: Color,
    done: Option<ModalCallback>,
}

/// A dialog showing a wrapped message above centered buttons.
pub struct Modal {
    block: Block,
    form: Arc<Form>,
    frame: Arc<Frame>,
    state: RwLock<State>,
    this: Weak<Modal>,
}

impl Modal {
    /// Create an empty modal with the default theme.
    pub fn new() -> Arc<Self> {
        Self::with_theme(&Theme::DEFAULT)
    }

    /// Create an empty modal with `theme`.
    pub fn with_theme(theme: &Theme) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let form = Form::with_theme(theme);
            form.set_buttons_align(Alignment::Center);
            form.block().set_padding(Padding::ZERO);
            form.block().set_background_color(theme.contrast_background_color);
            form.set_button_colors(ButtonColors {
                label: theme.primary_text_color,
                label_focused: theme.inverse_text_color,
                background: theme.primitive_background_color,
                background_focused: theme.primary_text_color,
            });
            let modal = weak.clone();
            form.set_cancel_func(move || {
                if let Some(modal) = modal.upgrade() {
                    modal.fire_done(None, "");
                }
            });

            let frame = Frame::with_theme(form.clone(), theme);
            frame.set_borders(0, 0, 1, 0, 0, 0);
            frame.block().set_border(true);
            frame.block().set_padding(Padding::uniform(1));
            frame.block().set_background_color(theme.contrast_background_color);

            let handle: Weak<dyn Primitive> = weak.clone();
            Self {
                block: Block::new(theme, handle),
                form,
                frame,
                state: RwLock::new(State {
                    text: String::new(),
                    text_color: theme.primary_text_color,
                    done: None,
                }),
                this: weak.clone(),
            }
        })
    }

    /// The form holding the buttons.
    pub fn form(&self) -> Arc<Form> {
        Arc::clone(&self.form)
    }

    /// The frame around the form.
    pub fn frame(&self) -> Arc<Frame> {
        Arc::clone(&self.frame)
    }

    /// Set the message. Style tags are allowed; lines are wrapped to the
    /// modal width.
    pub fn set_text(&self, text: &str) -> &Self {
        write(&self.state).text = text.to_string();
        self
    }

    /// Color of the message text.
    pub fn set_text_color(&self, color: Color) -> &Self {
        write(&self.state).text_color = color;
        self
    }

    /// Background of the frame and the form.
    pub fn set_background_color(&self, color: Color) -> &Self {
        self.frame.block().set_background_color(color);
        self.form.block().set_background_color(color);
        self
    }

    /// Colors of every button.
    pub fn set_button_colors(&self, colors: ButtonColors) -> &Self {
        self.form.set_button_colors(colors);
        self
    }

    /// Background of unfocused buttons.
    pub fn set_button_background_color(&self, color: Color) -> &Self {
        let mut colors = self.form.button_colors();
        colors.background = color;
        self.form.set_button_colors(colors);
        self
    }

    /// Label color of unfocused buttons.
    pub fn set_button_text_color(&self, color: Color) -> &Self {
        let mut colors = self.form.button_colors();
        colors.label = color;
        self.form.set_button_colors(colors);
        self
    }

    /// Called when a button is chosen or the modal is dismissed.
    pub fn set_done_func<F>(&self, handler: F) -> &Self
    where
        F: Fn(Option<usize>, &str) + Send + Sync + 'static,
    {
        write(&self.state).done = Some(Arc::new(handler));
        self
    }

    /// Append buttons. Each button's move bindings step between them like
    /// Tab and Backtab.
    pub fn add_buttons(&self, labels: &[&str]) -> &Self {
        let first = self.form.button_count();
        for (offset, label) in labels.iter().enumerate() {
            let index = first + offset;
            let modal = self.this.clone();
            let chosen = (*label).to_string();
            self.form.add_button(label, move || {
                if let Some(modal) = modal.upgrade() {
                    modal.fire_done(Some(index), &chosen);
                }
            });
        }
        self
    }

    /// Remove all buttons.
    pub fn clear_buttons(&self) -> &Self {
        self.form.clear_buttons();
        self
    }

    /// Button to focus when the modal receives focus.
    pub fn set_focus(&self, index: usize) -> &Self {
        self.form.set_focus(index);
        self
    }

    /// Size and place a modal on a `screen_width` x `screen_height` screen.
    ///
    /// The width is a third of the screen or the button row, whichever is
    /// larger. Returns the outer rectangle and the wrapped message lines.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn geometry(
        screen_width: i32,
        screen_height: i32,
        text: &str,
        buttons: &[String],
        items: usize,
    ) -> (Rect, Vec<String>) {
        let buttons_width = buttons
            .iter()
            .map(|label| string_width(label) as i32 + 6)
            .sum::<i32>()
            - 2;
        let width = (screen_width / 3).max(buttons_width).max(0);

        let lines = word_wrap(text, width);
        let height = lines.len() as i32 + items as i32 * 2 + 6;
        let width = width + 4;
        (Rect::centered(screen_width, screen_height, width, height), lines)
    }

    fn fire_done(&self, index: Option<usize>, label: &str) {
        let done = read(&self.state).done.clone();
        tracing::debug!(?index, label, "modal done");
        if let Some(done) = done {
            done(index, label);
        }
    }
}

impl Primitive for Modal {
    fn block(&self) -> &Block {
        &self.block
    }

    fn draw(&self, screen: &mut dyn Screen) {
        let (screen_width, screen_height) = screen.size();
        let (text, color) = {
            let state = read(&self.state);
            (state.text.clone(), state.text_color)
        };
        let (rect, lines) = Self::geometry(
            screen_width,
            screen_height,
            &text,
            &self.form.button_labels(),
            self.form.form_item_count(),
        );

        self.frame.clear_text();
        for line in &lines {
            self.frame.add_text(line, true, Alignment::Center, color);
        }
        self.block.set_rect(rect);
        self.frame.set_rect(rect);
        self.frame.draw(screen);
    }

    fn focus(&self, delegate: &FocusDelegate) {
        delegate.request(self.form.clone());
    }

    fn has_focus(&self) -> bool {
        self.form.has_focus()
    }

    fn handle_mouse(
        &self,
        action: MouseAction,
        event: &MouseEvent,
        set_focus: &FocusDelegate,
    ) -> MouseOutcome {
        let (consumed, capture) = self.frame.mouse_handler(action, event, set_focus);
        if consumed {
            return (true, capture);
        }
        if action == MouseAction::LeftClick && self.block.in_rect(event.x, event.y) {
            if let Some(me) = self.block.handle() {
                set_focus.request(me);
            }
            return (true, None);
        }
        (false, None)
    }
}

impl std::fmt::Debug for Modal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modal")
            .field("text", &read(&self.state).text)
            .field("buttons", &self.form.button_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::event::{KeyCode, KeyEvent, Keybindings};
    use crate::primitive::Dispatcher;
    use crate::widget::Panel;
    use std::sync::Mutex;

    fn quit_modal() -> (Arc<Modal>, Arc<Mutex<Vec<(Option<usize>, String)>>>) {
        let modal = Modal::new();
        let chosen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&chosen);
        modal
            .set_text("Do you want to quit the application?")
            .add_buttons(&["Quit", "Cancel"])
            .set_done_func(move |index, label| {
                sink.lock().unwrap().push((index, label.to_string()));
            });
        (modal, chosen)
    }

    fn press(dispatcher: &mut Dispatcher, code: KeyCode) {
        dispatcher.dispatch_key(&KeyEvent::plain(code));
    }

    #[test]
    fn test_geometry() {
        let labels = vec!["Quit".to_string(), "Cancel".to_string()];
        let (rect, lines) = Modal::geometry(80, 24, "Do you want to quit the application?", &labels, 0);
        assert_eq!(lines, vec!["Do you want to quit the".to_string(), "application?".to_string()]);
        // 80 / 3 = 26 columns of text, plus border and padding.
        assert_eq!(rect, Rect::new(25, 8, 30, 8));
    }

    #[test]
    fn test_geometry_widens_for_buttons() {
        let labels: Vec<String> = ["Alpha", "Bravo", "Charlie"].iter().map(|s| s.to_string()).collect();
        let (rect, _) = Modal::geometry(30, 10, "Hi", &labels, 0);
        // (5 + 6) + (5 + 6) + (7 + 6) - 2
        assert_eq!(rect.width, 33 + 4);
    }

    #[test]
    fn test_repeated_draw_same_rect() {
        let (modal, _) = quit_modal();
        let mut buf = Buffer::new(80, 24);
        modal.draw(&mut buf);
        let first = modal.rect();
        let frame_first = modal.frame().rect();
        for _ in 0..3 {
            modal.draw(&mut buf);
            assert_eq!(modal.rect(), first);
            assert_eq!(modal.frame().rect(), frame_first);
        }
        assert_eq!(first, Rect::new(25, 8, 30, 8));
    }

    #[test]
    fn test_draw_layout() {
        let (modal, _) = quit_modal();
        let mut buf = Buffer::new(80, 24);
        modal.draw(&mut buf);

        assert!(buf.row_text(10).contains("Do you want to quit the"));
        assert!(buf.row_text(11).contains("application?"));
        let quit = modal.form().button(0).unwrap().rect();
        let cancel = modal.form().button(1).unwrap().rect();
        assert_eq!(quit.y, 13);
        assert_eq!(cancel.y, 13);
        assert_eq!(quit.width, 8);
        assert_eq!(cancel.x, quit.x + 9);
        assert_eq!(buf.get(25, 8).map(|c| c.main()), Some('┌'));
    }

    #[test]
    fn test_focus_chain() {
        let (modal, _) = quit_modal();
        let mut dispatcher = Dispatcher::new();
        dispatcher.set_root(modal.clone());

        let leaf = dispatcher.focused().unwrap();
        let first: Arc<dyn Primitive> = modal.form().button(0).unwrap();
        assert!(std::ptr::addr_eq(Arc::as_ptr(&leaf), Arc::as_ptr(&first)));
        assert!(modal.has_focus());
        assert!(modal.form().has_focus());

        let elsewhere = Panel::new();
        dispatcher.set_focus(elsewhere);
        assert!(!modal.has_focus());
        assert!(!modal.form().has_focus());
    }

    #[test]
    fn test_arrows_move_between_buttons() {
        let (modal, _) = quit_modal();
        let mut dispatcher = Dispatcher::new();
        dispatcher.set_root(modal.clone());

        press(&mut dispatcher, KeyCode::Right);
        assert_eq!(modal.form().focused_button_index(), Some(1));
        press(&mut dispatcher, KeyCode::Left);
        assert_eq!(modal.form().focused_button_index(), Some(0));
        press(&mut dispatcher, KeyCode::Up);
        assert_eq!(modal.form().focused_button_index(), Some(1));
    }

    #[test]
    fn test_arrows_follow_button_keybindings() {
        let (modal, _) = quit_modal();
        let mut keys = Keybindings::default();
        keys.move_right = Keybindings::parse_list(&["l"]).unwrap();
        let keys = Arc::new(keys);
        for index in 0..2 {
            modal.form().button(index).unwrap().set_keybindings(Arc::clone(&keys));
        }
        let mut dispatcher = Dispatcher::new();
        dispatcher.set_root(modal.clone());

        press(&mut dispatcher, KeyCode::Right);
        assert_eq!(modal.form().focused_button_index(), Some(0));
        press(&mut dispatcher, KeyCode::Char('l'));
        assert_eq!(modal.form().focused_button_index(), Some(1));
    }

    #[test]
    fn test_enter_reports_button() {
        let (modal, chosen) = quit_modal();
        modal.set_focus(1);
        let mut dispatcher = Dispatcher::new();
        dispatcher.set_root(modal.clone());
        press(&mut dispatcher, KeyCode::Enter);
        assert_eq!(*chosen.lock().unwrap(), vec![(Some(1), "Cancel".to_string())]);
    }

    #[test]
    fn test_escape_dismisses() {
        let (modal, chosen) = quit_modal();
        let mut dispatcher = Dispatcher::new();
        dispatcher.set_root(modal.clone());
        press(&mut dispatcher, KeyCode::Esc);
        assert_eq!(*chosen.lock().unwrap(), vec![(None, String::new())]);
    }

    #[test]
    fn test_click_on_button() {
        let (modal, chosen) = quit_modal();
        let mut dispatcher = Dispatcher::new();
        dispatcher.set_root(modal.clone());
        let mut buf = Buffer::new(80, 24);
        modal.draw(&mut buf);

        let cancel = modal.form().button(1).unwrap().rect();
        dispatcher.dispatch_mouse(MouseAction::LeftClick, &MouseEvent::new(cancel.x + 1, cancel.y));
        assert_eq!(*chosen.lock().unwrap(), vec![(Some(1), "Cancel".to_string())]);
        assert_eq!(modal.form().focused_button_index(), Some(1));
    }
}
