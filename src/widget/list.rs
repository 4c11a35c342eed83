//! List: A scrollable list of selectable items.

use crate::event::{hit_shortcut, KeyEvent, Keybindings, MouseAction, MouseEvent};
use crate::layout::Alignment;
use crate::primitive::{Block, FocusDelegate, MouseOutcome, Primitive};
use crate::style::{Color, Style, Theme};
use crate::sync::{read, write};
use crate::terminal::Screen;
use crate::text::{print, print_styled};
use std::sync::{Arc, RwLock, Weak};

/// One list entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListItem {
    /// The text shown in the list.
    pub main_text: String,
    /// Optional second line, also used as the item's value.
    pub secondary_text: String,
}

impl ListItem {
    /// An item with only a main text.
    pub fn new(main_text: impl Into<String>) -> Self {
        Self {
            main_text: main_text.into(),
            secondary_text: String::new(),
        }
    }

    /// An item with a main and a secondary text.
    pub fn with_secondary(main_text: impl Into<String>, secondary_text: impl Into<String>) -> Self {
        Self {
            main_text: main_text.into(),
            secondary_text: secondary_text.into(),
        }
    }

    /// The secondary text if set, otherwise the main text.
    pub fn value(&self) -> &str {
        if self.secondary_text.is_empty() {
            &self.main_text
        } else {
            &self.secondary_text
        }
    }
}

impl From<&str> for ListItem {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Called with the index and item involved.
pub type ListCallback = Arc<dyn Fn(usize, &ListItem) + Send + Sync>;

/// List colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListColors {
    /// Main text of unselected items.
    pub main_text: Color,
    /// Secondary text lines.
    pub secondary_text: Color,
    /// Main text of the current item.
    pub selected_text: Color,
    /// Background of the current item.
    pub selected_background: Color,
}

impl ListColors {
    /// Colors derived from a theme.
    pub const fn from_theme(theme: &Theme) -> Self {
        Self {
            main_text: theme.primary_text_color,
            secondary_text: theme.tertiary_text_color,
            selected_text: theme.primitive_background_color,
            selected_background: theme.primary_text_color,
        }
    }
}

struct State {
    items: Vec<ListItem>,
    current: usize,
    offset: usize,
    show_secondary_text: bool,
    wrap_around: bool,
    colors: ListColors,
    changed: Option<ListCallback>,
    selected: Option<ListCallback>,
    keys: Arc<Keybindings>,
}

impl State {
    const fn rows_per_item(&self) -> usize {
        if self.show_secondary_text {
            2
        } else {
            1
        }
    }

    fn previous(&self) -> usize {
        match self.current {
            0 if self.wrap_around => self.items.len().saturating_sub(1),
            0 => 0,
            n => n - 1,
        }
    }

    fn next(&self) -> usize {
        if self.current + 1 < self.items.len() {
            self.current + 1
        } else if self.wrap_around {
            0
        } else {
            self.current
        }
    }
}

enum Move {
    To(usize),
    Select,
}

/// A list of items with one current item.
pub struct List {
    block: Block,
    state: RwLock<State>,
}

impl List {
    /// Create an empty list with the default theme.
    pub fn new() -> Arc<Self> {
        Self::with_theme(&Theme::DEFAULT)
    }

    /// Create an empty list with `theme`.
    pub fn with_theme(theme: &Theme) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let handle: Weak<dyn Primitive> = weak.clone();
            Self {
                block: Block::new(theme, handle),
                state: RwLock::new(State {
                    items: Vec::new(),
                    current: 0,
                    offset: 0,
                    show_secondary_text: true,
                    wrap_around: false,
                    colors: ListColors::from_theme(theme),
                    changed: None,
                    selected: None,
                    keys: Keybindings::shared(),
                }),
            }
        })
    }

    /// Replace all items. The current item is reset to the first one.
    pub fn set_items(&self, items: Vec<ListItem>) -> &Self {
        let mut state = write(&self.state);
        state.items = items;
        state.current = 0;
        state.offset = 0;
        self
    }

    /// Append an item.
    pub fn add_item(&self, item: ListItem) -> &Self {
        write(&self.state).items.push(item);
        self
    }

    /// Remove all items.
    pub fn clear(&self) -> &Self {
        self.set_items(Vec::new())
    }

    /// A copy of all items.
    pub fn items(&self) -> Vec<ListItem> {
        read(&self.state).items.clone()
    }

    /// Number of items.
    pub fn item_count(&self) -> usize {
        read(&self.state).items.len()
    }

    /// The item at `index`.
    pub fn item(&self, index: usize) -> Option<ListItem> {
        read(&self.state).items.get(index).cloned()
    }

    /// Index of the current item.
    pub fn current_item(&self) -> usize {
        read(&self.state).current
    }

    /// The current item, if the list is not empty.
    pub fn current(&self) -> Option<ListItem> {
        let state = read(&self.state);
        state.items.get(state.current).cloned()
    }

    /// Make `index` the current item, clamped to the list. Fires the changed
    /// callback when the current item actually changes.
    pub fn set_current_item(&self, index: usize) -> &Self {
        self.move_to(index);
        self
    }

    /// Draw secondary texts on a second line under each item.
    pub fn set_show_secondary_text(&self, show: bool) -> &Self {
        write(&self.state).show_secondary_text = show;
        self
    }

    /// Whether moving past either end jumps to the other end.
    pub fn set_wrap_around(&self, wrap: bool) -> &Self {
        write(&self.state).wrap_around = wrap;
        self
    }

    /// Set the list colors.
    pub fn set_colors(&self, colors: ListColors) -> &Self {
        write(&self.state).colors = colors;
        self
    }

    /// Current list colors.
    pub fn colors(&self) -> ListColors {
        read(&self.state).colors
    }

    /// Called when the current item changes.
    pub fn set_changed_func<F>(&self, handler: F) -> &Self
    where
        F: Fn(usize, &ListItem) + Send + Sync + 'static,
    {
        write(&self.state).changed = Some(Arc::new(handler));
        self
    }

    /// Called when an item is selected with Enter, Space or a click.
    pub fn set_selected_func<F>(&self, handler: F) -> &Self
    where
        F: Fn(usize, &ListItem) + Send + Sync + 'static,
    {
        write(&self.state).selected = Some(Arc::new(handler));
        self
    }

    /// Replace the key bindings.
    pub fn set_keybindings(&self, keys: Arc<Keybindings>) -> &Self {
        write(&self.state).keys = keys;
        self
    }

    fn move_to(&self, index: usize) {
        let fire = {
            let mut state = write(&self.state);
            if state.items.is_empty() {
                return;
            }
            let index = index.min(state.items.len() - 1);
            if index == state.current {
                return;
            }
            state.current = index;
            state
                .changed
                .clone()
                .map(|changed| (changed, index, state.items[index].clone()))
        };
        if let Some((changed, index, item)) = fire {
            changed(index, &item);
        }
    }

    fn select_current(&self) {
        let fire = {
            let state = read(&self.state);
            let item = state.items.get(state.current).cloned();
            state
                .selected
                .clone()
                .zip(item)
                .map(|(selected, item)| (selected, state.current, item))
        };
        if let Some((selected, index, item)) = fire {
            selected(index, &item);
        }
    }

    /// Index of the item drawn at screen row `y`.
    fn index_at(&self, y: i32) -> Option<usize> {
        let inner = self.block.inner_rect();
        if y < inner.y || y >= inner.bottom() {
            return None;
        }
        let state = read(&self.state);
        let row = usize::try_from(y - inner.y).ok()?;
        let index = state.offset + row / state.rows_per_item();
        (index < state.items.len()).then_some(index)
    }
}

impl Primitive for List {
    fn block(&self) -> &Block {
        &self.block
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn draw(&self, screen: &mut dyn Screen) {
        self.block.draw(screen);
        let inner = self.block.inner_rect();
        if inner.is_empty() {
            return;
        }

        let mut state = write(&self.state);
        let rows_per_item = state.rows_per_item();
        let visible = (inner.height as usize / rows_per_item).max(1);
        if state.current < state.offset {
            state.offset = state.current;
        } else if state.current >= state.offset + visible {
            state.offset = state.current + 1 - visible;
        }

        let colors = state.colors;
        for (row, index) in (state.offset..state.items.len()).take(visible).enumerate() {
            let item = &state.items[index];
            let y = inner.y + (row * rows_per_item) as i32;

            let style = if index == state.current {
                let highlight = Style::new().bg(colors.selected_background);
                for x in inner.x..inner.right() {
                    screen.set_content(x, y, ' ', &[], highlight);
                }
                highlight.fg(colors.selected_text)
            } else {
                Style::new().fg(colors.main_text)
            };
            print_styled(
                screen,
                &item.main_text,
                inner.x,
                y,
                inner.width,
                Alignment::Left,
                style,
            );

            if state.show_secondary_text && y + 1 < inner.bottom() {
                print(
                    screen,
                    &item.secondary_text,
                    inner.x,
                    y + 1,
                    inner.width,
                    Alignment::Left,
                    colors.secondary_text,
                );
            }
        }
    }

    fn handle_key(&self, event: &KeyEvent, _set_focus: &FocusDelegate) {
        let action = {
            let state = read(&self.state);
            let keys = &state.keys;
            if state.items.is_empty() {
                return;
            }
            if hit_shortcut(event, &[&keys.move_up]) {
                Move::To(state.previous())
            } else if hit_shortcut(event, &[&keys.move_down]) {
                Move::To(state.next())
            } else if hit_shortcut(event, &[&keys.move_first]) {
                Move::To(0)
            } else if hit_shortcut(event, &[&keys.move_last]) {
                Move::To(state.items.len() - 1)
            } else if hit_shortcut(event, &[&keys.select, &keys.select2]) {
                Move::Select
            } else {
                return;
            }
        };

        match action {
            Move::To(index) => self.move_to(index),
            Move::Select => self.select_current(),
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
            MouseAction::LeftClick => {
                if let Some(me) = self.block.handle() {
                    set_focus.request(me);
                }
                if let Some(index) = self.index_at(event.y) {
                    self.move_to(index);
                    self.select_current();
                }
                (true, None)
            }
            MouseAction::ScrollUp => {
                let previous = read(&self.state).previous();
                self.move_to(previous);
                (true, None)
            }
            MouseAction::ScrollDown => {
                let next = read(&self.state).next();
                self.move_to(next);
                (true, None)
            }
            _ => (false, None),
        }
    }
}

impl std::fmt::Debug for List {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = read(&self.state);
        f.debug_struct("List")
            .field("items", &state.items.len())
            .field("current", &state.current)
            .finish_non_exhaustive()
    }
}
