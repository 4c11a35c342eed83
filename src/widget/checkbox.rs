//! CheckBox: A labeled boolean toggle.

use crate::event::{hit_shortcut, KeyCode, KeyEvent, Keybindings, MouseAction, MouseEvent};
use crate::layout::{Alignment, Rect};
use crate::primitive::{Block, FieldColors, FocusDelegate, FormItem, KeyCallback, MouseOutcome, Primitive};
use crate::style::{Style, Theme};
use crate::sync::{read, write};
use crate::terminal::Screen;
use crate::text::{print, string_width};
use std::sync::{Arc, RwLock, Weak};

/// Receives the new checked state.
pub type CheckedCallback = Arc<dyn Fn(bool) + Send + Sync>;

struct State {
    checked: bool,
    label: String,
    label_width: usize,
    message: String,
    glyph: char,
    colors: FieldColors,
    changed: Option<CheckedCallback>,
    done: Option<KeyCallback>,
    finished: Option<KeyCallback>,
    keys: Arc<Keybindings>,
}

impl State {
    /// Text and background of the box cell. Focus swaps the two; the
    /// focused field colors are not used.
    fn box_colors(&self, focused: bool) -> Style {
        let colors = &self.colors;
        if focused {
            Style::new().fg(colors.field_background).bg(colors.field_text)
        } else {
            Style::new().fg(colors.field_text).bg(colors.field_background)
        }
    }
}

/// A one-cell box showing a checked glyph, with a label before it and an
/// optional message after it.
pub struct CheckBox {
    block: Block,
    state: RwLock<State>,
}

impl CheckBox {
    /// Create an unchecked box with the default theme.
    pub fn new() -> Arc<Self> {
        Self::with_theme(&Theme::DEFAULT)
    }

    /// Create an unchecked box with `theme`.
    pub fn with_theme(theme: &Theme) -> Arc<Self> {
        let colors = FieldColors::from_theme(theme);

        let checkbox = Arc::new_cyclic(|weak: &Weak<Self>| {
            let handle: Weak<dyn Primitive> = weak.clone();
            Self {
                block: Block::new(theme, handle),
                state: RwLock::new(State {
                    checked: false,
                    label: String::new(),
                    label_width: 0,
                    message: String::new(),
                    glyph: theme.checkbox_checked_glyph,
                    colors,
                    changed: None,
                    done: None,
                    finished: None,
                    keys: Keybindings::shared(),
                }),
            }
        });
        checkbox.block.set_rect(Rect::new(0, 0, 15, 1));
        checkbox
    }

    /// Whether the box is checked.
    pub fn is_checked(&self) -> bool {
        read(&self.state).checked
    }

    /// Set the checked state without firing the changed callback.
    pub fn set_checked(&self, checked: bool) -> &Self {
        write(&self.state).checked = checked;
        self
    }

    /// Set the label. May contain style tags.
    pub fn set_label(&self, label: &str) -> &Self {
        write(&self.state).label = label.to_string();
        self
    }

    /// Text drawn after the box.
    pub fn set_message(&self, message: &str) -> &Self {
        write(&self.state).message = message.to_string();
        self
    }

    /// The message text.
    pub fn message(&self) -> String {
        read(&self.state).message.clone()
    }

    /// Glyph drawn when checked.
    pub fn set_checked_glyph(&self, glyph: char) -> &Self {
        write(&self.state).glyph = glyph;
        self
    }

    /// Replace the key bindings.
    pub fn set_keybindings(&self, keys: Arc<Keybindings>) -> &Self {
        write(&self.state).keys = keys;
        self
    }

    /// Called with the new state after every toggle.
    pub fn set_changed_func<F>(&self, handler: F) -> &Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        write(&self.state).changed = Some(Arc::new(handler));
        self
    }

    /// Called when the user leaves the box with a navigation key.
    pub fn set_done_func<F>(&self, handler: F) -> &Self
    where
        F: Fn(KeyCode) + Send + Sync + 'static,
    {
        write(&self.state).done = Some(Arc::new(handler));
        self
    }

    fn toggle(&self) {
        let (checked, changed) = {
            let mut state = write(&self.state);
            state.checked = !state.checked;
            (state.checked, state.changed.clone())
        };
        tracing::trace!(checked, "checkbox toggled");
        if let Some(changed) = changed {
            changed(checked);
        }
    }

    fn finish(&self, key: KeyCode) {
        let (done, finished) = {
            let state = read(&self.state);
            (state.done.clone(), state.finished.clone())
        };
        if let Some(done) = done {
            done(key);
        }
        if let Some(finished) = finished {
            finished(key);
        }
    }
}

impl Primitive for CheckBox {
    fn block(&self) -> &Block {
        &self.block
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn draw(&self, screen: &mut dyn Screen) {
        let focused = self.has_focus();
        self.block.draw(screen);
        let inner = self.block.inner_rect();
        if inner.is_empty() {
            return;
        }
        let right = inner.right();
        let (mut x, y) = (inner.x, inner.y);

        let state = read(&self.state);
        let (label_color, _, _) = state.colors.resolve(focused);
        if state.label_width > 0 {
            let width = (state.label_width as i32).min(right - x);
            print(screen, &state.label, x, y, width, Alignment::Left, label_color);
            x += width;
        } else {
            let (_, drawn) = print(screen, &state.label, x, y, right - x, Alignment::Left, label_color);
            x += drawn as i32;
        }
        if x >= right {
            return;
        }

        let glyph = if state.checked { state.glyph } else { ' ' };
        screen.set_content(x, y, glyph, &[], state.box_colors(focused));

        if !state.message.is_empty() && x + 2 < right {
            print(screen, &state.message, x + 2, y, right - x - 2, Alignment::Left, label_color);
        }
    }

    fn handle_key(&self, event: &KeyEvent, _set_focus: &FocusDelegate) {
        let key = {
            let state = read(&self.state);
            let keys = &state.keys;
            if hit_shortcut(event, &[&keys.select, &keys.select2]) {
                None
            } else if hit_shortcut(event, &[&keys.cancel]) {
                Some(KeyCode::Esc)
            } else if hit_shortcut(event, &[&keys.move_next_field, &keys.move_down]) {
                Some(KeyCode::Tab)
            } else if hit_shortcut(event, &[&keys.move_previous_field, &keys.move_up]) {
                Some(KeyCode::BackTab)
            } else {
                return;
            }
        };
        match key {
            None => self.toggle(),
            Some(key) => self.finish(key),
        }
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
        match action {
            MouseAction::LeftDown => {
                if let Some(me) = self.block.handle() {
                    set_focus.request(me);
                }
                (true, None)
            }
            MouseAction::LeftClick => {
                if let Some(me) = self.block.handle() {
                    set_focus.request(me);
                }
                self.toggle();
                (true, None)
            }
            _ => (false, None),
        }
    }
}

impl FormItem for CheckBox {
    fn label(&self) -> String {
        read(&self.state).label.clone()
    }

    fn label_width(&self) -> usize {
        read(&self.state).label_width
    }

    fn set_label_width(&self, width: usize) {
        write(&self.state).label_width = width;
    }

    fn field_width(&self) -> usize {
        let state = read(&self.state);
        if state.message.is_empty() {
            1
        } else {
            2 + string_width(&state.message)
        }
    }

    fn field_colors(&self) -> FieldColors {
        read(&self.state).colors
    }

    fn set_field_colors(&self, colors: FieldColors) {
        write(&self.state).colors = colors;
    }

    fn set_finished_func(&self, handler: KeyCallback) {
        write(&self.state).finished = Some(handler);
    }
}

impl std::fmt::Debug for CheckBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = read(&self.state);
        f.debug_struct("CheckBox")
            .field("label", &state.label)
            .field("checked", &state.checked)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use proptest::prelude::*;
    use std::sync::Mutex;

    fn checkbox() -> Arc<CheckBox> {
        let checkbox = CheckBox::new();
        checkbox.set_rect(Rect::new(0, 0, 12, 1));
        checkbox
    }

    #[test]
    fn test_draw_label_glyph_message() {
        let cb = checkbox();
        cb.set_label("Admin ").set_message("yes").set_checked(true);
        let mut buf = Buffer::new(12, 1);
        cb.draw(&mut buf);
        assert_eq!(buf.row_text(0), "Admin X yes ");
        assert_eq!(cb.field_width(), 5);
    }

    #[test]
    fn test_focus_swaps_box_colors() {
        let cb = checkbox();
        cb.focus(&FocusDelegate::noop());
        let mut buf = Buffer::new(12, 1);
        cb.draw(&mut buf);
        let cell = buf.get(0, 0).unwrap();
        assert_eq!(cell.fg(), Some(Theme::DEFAULT.contrast_background_color));
        assert_eq!(cell.bg(), Some(Theme::DEFAULT.primary_text_color));
    }

    #[test]
    fn test_navigation_keys_finish_without_toggle() {
        let cb = checkbox();
        let keys = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&keys);
        cb.set_done_func(move |key| sink.lock().unwrap().push(key));
        let delegate = FocusDelegate::noop();
        for code in [KeyCode::Tab, KeyCode::Up, KeyCode::Esc] {
            cb.input_handler(&KeyEvent::plain(code), &delegate);
        }
        assert!(!cb.is_checked());
        assert_eq!(
            *keys.lock().unwrap(),
            vec![KeyCode::Tab, KeyCode::BackTab, KeyCode::Esc]
        );
    }

    #[test]
    fn test_click_outside_ignored() {
        let cb = checkbox();
        let (consumed, _) =
            cb.mouse_handler(MouseAction::LeftClick, &MouseEvent::new(3, 4), &FocusDelegate::noop());
        assert!(!consumed);
        assert!(!cb.is_checked());
    }

    proptest! {
        #[test]
        fn test_toggles_alternate(clicks in prop::collection::vec(any::<u8>(), 1..30)) {
            let cb = checkbox();
            let seen = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&seen);
            cb.set_changed_func(move |checked| sink.lock().unwrap().push(checked));

            let delegate = FocusDelegate::noop();
            for choice in &clicks {
                match choice % 3 {
                    0 => cb.input_handler(&KeyEvent::plain(KeyCode::Enter), &delegate),
                    1 => cb.input_handler(&KeyEvent::plain(KeyCode::Char(' ')), &delegate),
                    _ => {
                        cb.mouse_handler(MouseAction::LeftClick, &MouseEvent::new(2, 0), &delegate);
                    }
                }
            }

            let seen = seen.lock().unwrap().clone();
            prop_assert_eq!(seen.len(), clicks.len());
            for (i, checked) in seen.iter().enumerate() {
                prop_assert_eq!(*checked, i % 2 == 0);
            }
            prop_assert_eq!(cb.is_checked(), clicks.len() % 2 == 1);
        }
    }
}
