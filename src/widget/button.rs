//! Button: A labeled button that runs a callback when selected.

use crate::event::{hit_shortcut, KeyCode, KeyEvent, Keybindings, MouseAction, MouseEvent};
use crate::layout::Alignment;
use crate::primitive::{Block, FocusDelegate, KeyCallback, MouseOutcome, Primitive};
use crate::style::{Color, Theme};
use crate::sync::{read, write};
use crate::terminal::Screen;
use crate::text::print;
use std::sync::{Arc, RwLock, Weak};

/// Button label and background colors, plain and focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonColors {
    /// Label text.
    pub label: Color,
    /// Label text while focused.
    pub label_focused: Color,
    /// Background.
    pub background: Color,
    /// Background while focused.
    pub background_focused: Color,
}

impl ButtonColors {
    /// Colors derived from a theme.
    pub const fn from_theme(theme: &Theme) -> Self {
        Self {
            label: theme.primary_text_color,
            label_focused: theme.inverse_text_color,
            background: theme.contrast_background_color,
            background_focused: theme.primary_text_color,
        }
    }
}

struct State {
    label: String,
    colors: ButtonColors,
    selected: Option<Arc<dyn Fn() + Send + Sync>>,
    exit: Option<KeyCallback>,
    keys: Arc<Keybindings>,
}

/// A single-line button with a centered label.
pub struct Button {
    block: Block,
    state: RwLock<State>,
}

impl Button {
    /// Create a button with the default theme.
    pub fn new(label: &str) -> Arc<Self> {
        Self::with_theme(label, &Theme::DEFAULT)
    }

    /// Create a button with `theme`.
    pub fn with_theme(label: &str, theme: &Theme) -> Arc<Self> {
        let button = Arc::new_cyclic(|weak: &Weak<Self>| {
            let handle: Weak<dyn Primitive> = weak.clone();
            Self {
                block: Block::new(theme, handle),
                state: RwLock::new(State {
                    label: label.to_string(),
                    colors: ButtonColors::from_theme(theme),
                    selected: None,
                    exit: None,
                    keys: Keybindings::shared(),
                }),
            }
        });
        button.block.set_rect(crate::layout::Rect::new(0, 0, 15, 1));
        button
    }

    /// The label text.
    pub fn label(&self) -> String {
        read(&self.state).label.clone()
    }

    /// Replace the label text.
    pub fn set_label(&self, label: &str) -> &Self {
        write(&self.state).label = label.to_string();
        self
    }

    /// Set the colors.
    pub fn set_colors(&self, colors: ButtonColors) -> &Self {
        write(&self.state).colors = colors;
        self
    }

    /// Current colors.
    pub fn colors(&self) -> ButtonColors {
        read(&self.state).colors
    }

    /// Called when the button is selected with Enter or a click.
    pub fn set_selected_func<F>(&self, handler: F) -> &Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        write(&self.state).selected = Some(Arc::new(handler));
        self
    }

    /// Called when the user leaves the button with a navigation key. The
    /// key is [`KeyCode::Tab`], [`KeyCode::BackTab`] or [`KeyCode::Esc`].
    pub fn set_exit_func(&self, handler: KeyCallback) -> &Self {
        write(&self.state).exit = Some(handler);
        self
    }

    /// Replace the key bindings.
    pub fn set_keybindings(&self, keys: Arc<Keybindings>) -> &Self {
        write(&self.state).keys = keys;
        self
    }

    fn fire_selected(&self) {
        let selected = read(&self.state).selected.clone();
        if let Some(selected) = selected {
            selected();
        }
    }
}

impl Primitive for Button {
    fn block(&self) -> &Block {
        &self.block
    }

    fn draw(&self, screen: &mut dyn Screen) {
        let focused = self.has_focus();
        let (label, colors) = {
            let state = read(&self.state);
            (state.label.clone(), state.colors)
        };

        let (label_color, background) = if focused {
            (colors.label_focused, colors.background_focused)
        } else {
            (colors.label, colors.background)
        };
        self.block.draw_with_background(screen, background);

        let inner = self.block.inner_rect();
        if inner.is_empty() {
            return;
        }
        let y = inner.y + inner.height / 2;
        print(
            screen,
            &label,
            inner.x,
            y,
            inner.width,
            Alignment::Center,
            label_color,
        );
    }

    fn handle_key(&self, event: &KeyEvent, _set_focus: &FocusDelegate) {
        let (exit, key) = {
            let state = read(&self.state);
            let keys = &state.keys;
            let key = if hit_shortcut(event, &[&keys.select]) {
                None
            } else if hit_shortcut(event, &[&keys.cancel]) {
                Some(KeyCode::Esc)
            } else if hit_shortcut(
                event,
                &[&keys.move_next_field, &keys.move_down, &keys.move_right],
            ) {
                Some(KeyCode::Tab)
            } else if hit_shortcut(
                event,
                &[&keys.move_previous_field, &keys.move_up, &keys.move_left],
            ) {
                Some(KeyCode::BackTab)
            } else {
                return;
            };
            (state.exit.clone(), key)
        };

        match key {
            None => self.fire_selected(),
            Some(key) => {
                if let Some(exit) = exit {
                    exit(key);
                }
            }
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
                self.fire_selected();
                (true, None)
            }
            _ => (false, None),
        }
    }
}

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("label", &read(&self.state).label)
            .finish_non_exhaustive()
    }
}
