//! InputField: Single-line text entry with scrolling, masking and
//! autocomplete.
//!
//! The cursor and the scroll offset are byte offsets into the text that
//! always sit on grapheme boundaries. All movement and deletion goes
//! through grapheme iteration, and the scroll offset is adjusted in screen
//! columns so wide characters are never split.

use super::list::{List, ListColors, ListItem};
use crate::event::{
    hit_shortcut, KeyCode, KeyEvent, KeyModifiers, Keybindings, MouseAction, MouseEvent, Shortcut,
};
use crate::layout::{Alignment, Rect};
use crate::primitive::{Block, FieldColors, FocusDelegate, FormItem, KeyCallback, MouseOutcome, Primitive};
use crate::style::{Color, Style, Theme};
use crate::sync::{read, write};
use crate::terminal::Screen;
use crate::text::{ceil_boundary, floor_boundary, graphemes, iterate, iterate_reverse, print, string_width, GraphemeUnit};
use regex::Regex;
use std::sync::{Arc, OnceLock, RwLock, Weak};
use unicode_width::UnicodeWidthChar;

/// Decides whether an edit may go through: receives the text after the
/// edit and the character just typed.
pub type AcceptFn = Arc<dyn Fn(&str, char) -> bool + Send + Sync>;

/// Produces autocomplete candidates for the current text.
pub type AutocompleteFn = Arc<dyn Fn(&str) -> Vec<ListItem> + Send + Sync>;

/// Receives the field text.
pub type TextCallback = Arc<dyn Fn(&str) + Send + Sync>;

fn word_before() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\S*\s*$").expect("word pattern is valid"))
}

fn word_after() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\S*\s*").expect("word pattern is valid"))
}

/// What a key press does to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Insert(char),
    Left,
    Right,
    First,
    Last,
    WordLeft,
    WordRight,
    DeleteAll,
    DeleteToEnd,
    DeleteWord,
    Backspace,
    Delete,
    Select,
    Cancel,
    Next,
    Previous,
}

impl Edit {
    fn classify(event: &KeyEvent, keys: &Keybindings) -> Option<Self> {
        let hit = |bindings: &[&[Shortcut]]| hit_shortcut(event, bindings);
        let edit = if hit(&[&keys.select]) {
            Self::Select
        } else if hit(&[&keys.cancel]) {
            Self::Cancel
        } else if hit(&[&keys.move_next_field, &keys.move_down]) {
            Self::Next
        } else if hit(&[&keys.move_previous_field, &keys.move_up]) {
            Self::Previous
        } else if hit(&[&keys.move_first]) {
            Self::First
        } else if hit(&[&keys.move_last]) {
            Self::Last
        } else if hit(&[&keys.move_word_left]) {
            Self::WordLeft
        } else if hit(&[&keys.move_word_right]) {
            Self::WordRight
        } else if hit(&[&keys.delete_all]) {
            Self::DeleteAll
        } else if hit(&[&keys.delete_to_end]) {
            Self::DeleteToEnd
        } else if hit(&[&keys.delete_word]) {
            Self::DeleteWord
        } else if hit(&[&keys.backspace]) {
            Self::Backspace
        } else if hit(&[&keys.delete_forward]) {
            Self::Delete
        } else if hit(&[&keys.move_left]) {
            Self::Left
        } else if hit(&[&keys.move_right]) {
            Self::Right
        } else {
            match event.code {
                KeyCode::Char(c) if !event.modifiers.contains(KeyModifiers::CONTROL) => {
                    Self::Insert(c)
                }
                _ => return None,
            }
        };
        Some(edit)
    }
}

/// Byte offset of the grapheme boundary before `cursor`.
fn previous_boundary(text: &str, cursor: usize) -> usize {
    let mut pos = 0;
    iterate_reverse(&text[..cursor], |unit| {
        pos = unit.byte_pos;
        true
    });
    pos
}

/// Byte offset of the grapheme boundary after `cursor`.
fn next_boundary(text: &str, cursor: usize) -> usize {
    let mut pos = cursor;
    iterate(&text[cursor..], |unit| {
        pos = cursor + unit.byte_end();
        true
    });
    pos
}

fn word_left(text: &str, cursor: usize) -> usize {
    let start = word_before()
        .find(&text[..cursor])
        .map_or(cursor, |m| m.start());
    floor_boundary(text, start)
}

fn word_right(text: &str, cursor: usize) -> usize {
    let len = word_after().find(&text[cursor..]).map_or(0, |m| m.end());
    ceil_boundary(text, cursor + len)
}

/// The unmatched remainder of the best candidate.
///
/// The selected candidate is used when it extends `text`. When it equals
/// `text` exactly, the first candidate that extends it is used instead.
fn suggestion_for(entries: &[ListItem], selected: usize, text: &str) -> String {
    let extends = |value: &str| value.len() > text.len() && value.starts_with(text);
    let Some(current) = entries.get(selected) else {
        return String::new();
    };
    let value = current.value();
    if extends(value) {
        return value[text.len()..].to_string();
    }
    if value == text {
        if let Some(entry) = entries.iter().find(|entry| extends(entry.value())) {
            return entry.value()[text.len()..].to_string();
        }
    }
    String::new()
}

struct State {
    text: String,
    cursor: usize,
    offset: usize,
    field_x: i32,
    label: String,
    label_width: usize,
    field_width: usize,
    placeholder: String,
    placeholder_color: Color,
    placeholder_color_focused: Color,
    field_note: String,
    field_note_color: Color,
    mask: Option<char>,
    colors: FieldColors,
    suggestion_color: Color,
    list_colors: ListColors,
    list_background: Color,
    autocomplete: Option<AutocompleteFn>,
    list: Option<Arc<List>>,
    suggestion: String,
    accept: Option<AcceptFn>,
    changed: Option<TextCallback>,
    done: Option<KeyCallback>,
    finished: Option<KeyCallback>,
    keys: Arc<Keybindings>,
    theme: Theme,
}

impl State {
    /// Columns a grapheme occupies as drawn.
    fn unit_width(&self, unit: &GraphemeUnit<'_>) -> usize {
        match self.mask {
            Some(mask) => mask.width().unwrap_or(0).min(2),
            None => unit.screen_width,
        }
    }

    /// Columns `text[from..to]` occupies as drawn.
    fn drawn_width(&self, from: usize, to: usize) -> usize {
        graphemes(&self.text[from..to])
            .map(|unit| self.unit_width(&unit))
            .sum()
    }

    /// Move `offset` so the cursor lands inside a field `field_width`
    /// columns wide.
    fn scroll_to_cursor(&mut self, field_width: usize) {
        if self.drawn_width(0, self.text.len()) < field_width {
            self.offset = 0;
            return;
        }
        if field_width == 0 || self.cursor < self.offset {
            self.offset = self.cursor;
            return;
        }

        let mut width = self.drawn_width(self.offset, self.cursor);
        let start = self.offset;
        for unit in graphemes(&self.text[start..self.cursor]) {
            if width < field_width {
                break;
            }
            width -= self.unit_width(&unit);
            self.offset = start + unit.byte_end();
        }
    }

    /// Apply a cursor motion or deletion. Returns whether the text changed.
    fn apply(&mut self, edit: Edit) -> bool {
        let before = self.text.len();
        match edit {
            Edit::Left => self.cursor = previous_boundary(&self.text, self.cursor),
            Edit::Right => self.cursor = next_boundary(&self.text, self.cursor),
            Edit::First => self.cursor = 0,
            Edit::Last => self.cursor = self.text.len(),
            Edit::WordLeft => self.cursor = word_left(&self.text, self.cursor),
            Edit::WordRight => self.cursor = word_right(&self.text, self.cursor),
            Edit::DeleteAll => {
                self.text.clear();
                self.cursor = 0;
                self.offset = 0;
            }
            Edit::DeleteToEnd => self.text.truncate(self.cursor),
            Edit::DeleteWord => {
                let start = word_left(&self.text, self.cursor);
                self.text.replace_range(start..self.cursor, "");
                self.cursor = start;
            }
            Edit::Backspace => {
                let start = previous_boundary(&self.text, self.cursor);
                self.text.replace_range(start..self.cursor, "");
                self.cursor = start;
                if self.offset >= self.cursor {
                    self.offset = 0;
                }
            }
            Edit::Delete => {
                let end = next_boundary(&self.text, self.cursor);
                self.text.replace_range(self.cursor..end, "");
            }
            Edit::Insert(_) | Edit::Select | Edit::Cancel | Edit::Next | Edit::Previous => {}
        }
        // A deletion can merge the graphemes on either side of the cursor.
        self.cursor = floor_boundary(&self.text, self.cursor);
        self.offset = floor_boundary(&self.text, self.offset.min(self.cursor));
        self.text.len() != before
    }
}

/// A one-line text entry field with an optional label.
pub struct InputField {
    block: Block,
    state: RwLock<State>,
    this: Weak<InputField>,
}

impl InputField {
    /// Create an empty field with the default theme.
    pub fn new() -> Arc<Self> {
        Self::with_theme(&Theme::DEFAULT)
    }

    /// Create an empty field with `theme`.
    pub fn with_theme(theme: &Theme) -> Arc<Self> {
        let field = Arc::new_cyclic(|weak: &Weak<Self>| {
            let handle: Weak<dyn Primitive> = weak.clone();
            Self {
                block: Block::new(theme, handle),
                state: RwLock::new(State {
                    text: String::new(),
                    cursor: 0,
                    offset: 0,
                    field_x: 0,
                    label: String::new(),
                    label_width: 0,
                    field_width: 0,
                    placeholder: String::new(),
                    placeholder_color: theme.contrast_secondary_text_color,
                    placeholder_color_focused: theme.contrast_secondary_text_color,
                    field_note: String::new(),
                    field_note_color: theme.secondary_text_color,
                    mask: None,
                    colors: FieldColors::from_theme(theme),
                    suggestion_color: theme.contrast_secondary_text_color,
                    list_colors: ListColors {
                        main_text: theme.primitive_background_color,
                        secondary_text: theme.tertiary_text_color,
                        selected_text: theme.primitive_background_color,
                        selected_background: theme.primary_text_color,
                    },
                    list_background: theme.more_contrast_background_color,
                    autocomplete: None,
                    list: None,
                    suggestion: String::new(),
                    accept: None,
                    changed: None,
                    done: None,
                    finished: None,
                    keys: Keybindings::shared(),
                    theme: *theme,
                }),
                this: weak.clone(),
            }
        });
        field.block.set_rect(Rect::new(0, 0, 15, 1));
        field
    }

    /// The current text.
    pub fn text(&self) -> String {
        read(&self.state).text.clone()
    }

    /// Replace the text and move the cursor to the end. Fires the changed
    /// callback.
    pub fn set_text(&self, text: &str) -> &Self {
        let changed = {
            let mut state = write(&self.state);
            state.text = text.to_string();
            state.cursor = state.text.len();
            state.offset = 0;
            state.changed.clone()
        };
        if let Some(changed) = changed {
            changed(text);
        }
        self
    }

    /// Cursor position as a byte offset into the text.
    pub fn cursor_position(&self) -> usize {
        read(&self.state).cursor
    }

    /// Move the cursor. The position is clamped to the text and moved back
    /// to the start of the grapheme it falls in.
    pub fn set_cursor_position(&self, pos: usize) -> &Self {
        let mut state = write(&self.state);
        let pos = floor_boundary(&state.text, pos.min(state.text.len()));
        state.cursor = pos;
        state.offset = state.offset.min(pos);
        drop(state);
        self
    }

    /// The label text.
    pub fn label(&self) -> String {
        read(&self.state).label.clone()
    }

    /// Set the label. May contain style tags.
    pub fn set_label(&self, label: &str) -> &Self {
        write(&self.state).label = label.to_string();
        self
    }

    /// Field width in columns. 0 extends the field to the right edge.
    pub fn set_field_width(&self, width: usize) -> &Self {
        write(&self.state).field_width = width;
        self
    }

    /// Text shown while the field is empty.
    pub fn set_placeholder(&self, placeholder: &str) -> &Self {
        write(&self.state).placeholder = placeholder.to_string();
        self
    }

    /// Placeholder colors, unfocused and focused.
    pub fn set_placeholder_colors(&self, color: Color, focused: Color) -> &Self {
        let mut state = write(&self.state);
        state.placeholder_color = color;
        state.placeholder_color_focused = focused;
        drop(state);
        self
    }

    /// A note drawn on the line below the field. A non-empty note makes the
    /// field two rows high.
    pub fn set_field_note(&self, note: &str) -> &Self {
        write(&self.state).field_note = note.to_string();
        self
    }

    /// Color of the field note.
    pub fn set_field_note_color(&self, color: Color) -> &Self {
        write(&self.state).field_note_color = color;
        self
    }

    /// Draw every grapheme as `mask` (for passwords). `None` shows the text.
    pub fn set_mask_character(&self, mask: Option<char>) -> &Self {
        write(&self.state).mask = mask;
        self
    }

    /// Color of the ghost autocomplete suggestion.
    pub fn set_suggestion_color(&self, color: Color) -> &Self {
        write(&self.state).suggestion_color = color;
        self
    }

    /// Colors and background of the autocomplete drop-down.
    pub fn set_autocomplete_list_colors(&self, colors: ListColors, background: Color) -> &Self {
        let mut state = write(&self.state);
        state.list_colors = colors;
        state.list_background = background;
        drop(state);
        self
    }

    /// Replace the key bindings.
    pub fn set_keybindings(&self, keys: Arc<Keybindings>) -> &Self {
        write(&self.state).keys = keys;
        self
    }

    /// Reject typed characters for which `accept` returns `false`.
    pub fn set_accept_func<F>(&self, accept: F) -> &Self
    where
        F: Fn(&str, char) -> bool + Send + Sync + 'static,
    {
        write(&self.state).accept = Some(Arc::new(accept));
        self
    }

    /// Called with the new text after every change.
    pub fn set_changed_func<F>(&self, handler: F) -> &Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        write(&self.state).changed = Some(Arc::new(handler));
        self
    }

    /// Called when the user leaves the field: [`KeyCode::Enter`],
    /// [`KeyCode::Esc`], [`KeyCode::Tab`] or [`KeyCode::BackTab`].
    pub fn set_done_func<F>(&self, handler: F) -> &Self
    where
        F: Fn(KeyCode) + Send + Sync + 'static,
    {
        write(&self.state).done = Some(Arc::new(handler));
        self
    }

    /// Produce autocomplete candidates on every text change.
    pub fn set_autocomplete_func<F>(&self, generator: F) -> &Self
    where
        F: Fn(&str) -> Vec<ListItem> + Send + Sync + 'static,
    {
        write(&self.state).autocomplete = Some(Arc::new(generator));
        self
    }

    /// The ghost text shown after the cursor.
    pub fn suggestion(&self) -> String {
        read(&self.state).suggestion.clone()
    }

    /// The open autocomplete drop-down, if any.
    pub fn autocomplete_list(&self) -> Option<Arc<List>> {
        read(&self.state).list.clone()
    }

    /// Run the autocomplete generator on the current text and open, update
    /// or close the drop-down accordingly.
    pub fn autocomplete(&self) -> &Self {
        let (generator, text, existing, theme, colors, background) = {
            let state = read(&self.state);
            (
                state.autocomplete.clone(),
                state.text.clone(),
                state.list.clone(),
                state.theme,
                state.list_colors,
                state.list_background,
            )
        };
        let Some(generator) = generator else {
            return self;
        };

        let entries = generator(&text);
        if entries.is_empty() {
            let mut state = write(&self.state);
            if state.list.take().is_some() {
                tracing::debug!("autocomplete list closed");
            }
            state.suggestion.clear();
            return self;
        }

        let selected = entries
            .iter()
            .position(|entry| entry.main_text == text || entry.value() == text)
            .unwrap_or(0);
        let suggestion = suggestion_for(&entries, selected, &text);

        let list = existing.unwrap_or_else(|| {
            tracing::debug!(candidates = entries.len(), "autocomplete list opened");
            let list = List::with_theme(&theme);
            list.set_show_secondary_text(false).set_colors(colors);
            list.block().set_background_color(background);
            let field = self.this.clone();
            list.set_changed_func(move |index, _| {
                if let Some(field) = field.upgrade() {
                    field.autocomplete_changed(index);
                }
            });
            list
        });
        list.set_items(entries).set_current_item(selected);

        let mut state = write(&self.state);
        state.list = Some(list);
        state.suggestion = suggestion;
        drop(state);
        self
    }

    fn close_autocomplete(&self) {
        let mut state = write(&self.state);
        state.list = None;
        state.suggestion.clear();
        tracing::debug!("autocomplete list closed");
    }

    /// Replace the text with the highlighted candidate and close the list.
    fn accept_autocomplete(&self) {
        let Some(list) = write(&self.state).list.take() else {
            return;
        };
        let Some(item) = list.current() else {
            return;
        };
        let changed = {
            let mut state = write(&self.state);
            state.text = item.value().to_string();
            state.cursor = state.text.len();
            state.suggestion.clear();
            state.changed.clone().map(|changed| (changed, state.text.clone()))
        };
        tracing::debug!(value = item.value(), "autocomplete accepted");
        if let Some((changed, text)) = changed {
            changed(&text);
        }
    }

    /// Move the highlight in the open list, wrapping at either end.
    fn cycle_autocomplete(&self, forward: bool) {
        let Some(list) = read(&self.state).list.clone() else {
            return;
        };
        let count = list.item_count();
        if count == 0 {
            return;
        }
        let current = list.current_item();
        let next = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        list.set_current_item(next);
    }

    /// Recompute the suggestion after the list's current item moved.
    fn autocomplete_changed(&self, index: usize) {
        let Some(list) = read(&self.state).list.clone() else {
            return;
        };
        let items = list.items();
        let mut state = write(&self.state);
        state.suggestion = suggestion_for(&items, index, &state.text);
    }

    fn insert(&self, ch: char) {
        let (candidate, accept) = {
            let state = read(&self.state);
            let mut candidate = state.text.clone();
            candidate.insert(state.cursor, ch);
            (candidate, state.accept.clone())
        };
        if let Some(accept) = accept {
            if !accept(&candidate, ch) {
                tracing::trace!(?ch, "character rejected");
                return;
            }
        }
        {
            let mut state = write(&self.state);
            let cursor = state.cursor + ch.len_utf8();
            state.cursor = ceil_boundary(&candidate, cursor);
            state.text = candidate;
        }
        self.text_changed();
    }

    fn text_changed(&self) {
        self.autocomplete();
        let (changed, text) = {
            let state = read(&self.state);
            (state.changed.clone(), state.text.clone())
        };
        if let Some(changed) = changed {
            changed(&text);
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

    /// Place the cursor under screen column `x`, counting from the current
    /// scroll offset.
    #[allow(clippy::cast_sign_loss)]
    fn set_cursor_from_column(&self, x: i32) {
        let mut state = write(&self.state);
        if x < state.field_x {
            return;
        }
        let column = (x - state.field_x) as usize;
        let offset = state.offset;

        let mut cursor = state.text.len();
        let mut pos = 0;
        for unit in graphemes(&state.text[offset..]) {
            let width = state.unit_width(&unit);
            if column < pos + width {
                cursor = offset + unit.byte_pos;
                break;
            }
            pos += width;
        }
        state.cursor = cursor;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn draw_autocomplete(&self, screen: &mut dyn Screen, list: &List, x: i32, y: i32) {
        let items = list.items();
        let height = items.len() as i32;
        let width = items
            .iter()
            .map(|item| string_width(&item.main_text))
            .max()
            .unwrap_or(0) as i32;
        let (_, screen_height) = screen.size();

        // Drop down, or up when there is more room above.
        let mut top = y + 1;
        if top + height > screen_height && y > screen_height - top {
            top = (y - height).max(0);
        }
        let height = height.min(screen_height - top);
        list.set_rect(Rect::new(x, top, width, height));
        list.draw(screen);
    }
}

impl Primitive for InputField {
    fn block(&self) -> &Block {
        &self.block
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    fn draw(&self, screen: &mut dyn Screen) {
        let focused = self.has_focus();
        self.block.draw(screen);
        let inner = self.block.inner_rect();
        if inner.is_empty() {
            return;
        }
        let right = inner.right();
        let (mut x, y) = (inner.x, inner.y);

        let mut state = write(&self.state);
        let (label_color, text_color, background) = state.colors.resolve(focused);

        if state.label_width > 0 {
            let width = (state.label_width as i32).min(right - x);
            print(screen, &state.label, x, y, width, Alignment::Left, label_color);
            x += width;
        } else {
            let (_, drawn) = print(screen, &state.label, x, y, right - x, Alignment::Left, label_color);
            x += drawn as i32;
        }

        state.field_x = x;
        let available = (right - x).max(0);
        let field_width = match state.field_width {
            0 => available,
            width => (width as i32).min(available),
        };
        let fill = Style::new().bg(background);
        for col in x..x + field_width {
            screen.set_content(col, y, ' ', &[], fill);
        }

        let field_width = field_width as usize;
        state.scroll_to_cursor(field_width);

        let text_style = fill.fg(text_color);
        let mut cursor_col = 0;
        if state.text.is_empty() && !state.placeholder.is_empty() {
            let color = if focused {
                state.placeholder_color_focused
            } else {
                state.placeholder_color
            };
            print(screen, &state.placeholder, x, y, field_width as i32, Alignment::Left, color);
        } else {
            let mut col = 0;
            for unit in graphemes(&state.text[state.offset..]) {
                let width = state.unit_width(&unit);
                if col + width > field_width {
                    break;
                }
                let at = x + col as i32;
                match state.mask {
                    Some(mask) => screen.set_content(at, y, mask, &[], text_style),
                    None if width > 0 => {
                        screen.set_content(at, y, unit.main, &unit.combining(), text_style);
                    }
                    None => {}
                }
                col += width;
            }
            cursor_col = state.drawn_width(state.offset, state.cursor);

            let at_end = state.cursor == state.text.len();
            if focused && at_end && !state.suggestion.is_empty() && state.mask.is_none() {
                let style = fill.fg(state.suggestion_color);
                let mut col = cursor_col;
                for unit in graphemes(&state.suggestion) {
                    if col + unit.screen_width > field_width {
                        break;
                    }
                    if unit.screen_width > 0 {
                        screen.set_content(x + col as i32, y, unit.main, &unit.combining(), style);
                    }
                    col += unit.screen_width;
                }
            }
        }

        if !state.field_note.is_empty() && inner.height >= 2 {
            print(
                screen,
                &state.field_note,
                x,
                y + 1,
                field_width as i32,
                Alignment::Left,
                state.field_note_color,
            );
        }

        let list = if focused { state.list.clone() } else { None };
        drop(state);

        if focused {
            screen.show_cursor(x + cursor_col as i32, y);
        }
        if let Some(list) = list {
            self.draw_autocomplete(screen, &list, x, y);
        }
    }

    fn handle_key(&self, event: &KeyEvent, _set_focus: &FocusDelegate) {
        let (edit, list_open) = {
            let state = read(&self.state);
            (Edit::classify(event, &state.keys), state.list.is_some())
        };
        let Some(edit) = edit else {
            return;
        };

        match edit {
            Edit::Select if list_open => self.accept_autocomplete(),
            Edit::Cancel if list_open => self.close_autocomplete(),
            Edit::Next if list_open => self.cycle_autocomplete(true),
            Edit::Previous if list_open => self.cycle_autocomplete(false),
            Edit::Select => self.finish(KeyCode::Enter),
            Edit::Cancel => self.finish(KeyCode::Esc),
            Edit::Next => self.finish(KeyCode::Tab),
            Edit::Previous => self.finish(KeyCode::BackTab),
            Edit::Insert(ch) => self.insert(ch),
            edit => {
                let changed = write(&self.state).apply(edit);
                if changed {
                    self.text_changed();
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
        let list = read(&self.state).list.clone();
        if let Some(list) = list {
            if list.block().in_rect(event.x, event.y) {
                list.mouse_handler(action, event, &FocusDelegate::noop());
                if action == MouseAction::LeftClick {
                    self.accept_autocomplete();
                    return (true, None);
                }
                return (true, self.block.handle());
            }
        }

        if !self.block.in_rect(event.x, event.y) || event.y != self.block.inner_rect().y {
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
                self.set_cursor_from_column(event.x);
                (true, None)
            }
            _ => (false, None),
        }
    }
}

impl FormItem for InputField {
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
        read(&self.state).field_width
    }

    fn field_height(&self) -> usize {
        if read(&self.state).field_note.is_empty() {
            1
        } else {
            2
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

impl std::fmt::Debug for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = read(&self.state);
        f.debug_struct("InputField")
            .field("label", &state.label)
            .field("cursor", &state.cursor)
            .field("offset", &state.offset)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::text::plain_width;
    use proptest::prelude::*;
    use std::sync::Mutex;

    fn field(width: i32) -> Arc<InputField> {
        let field = InputField::new();
        field.set_rect(Rect::new(0, 0, width, 1));
        field.focus(&FocusDelegate::noop());
        field
    }

    fn key(field: &InputField, code: KeyCode) {
        field.input_handler(&KeyEvent::plain(code), &FocusDelegate::noop());
    }

    fn key_with(field: &InputField, code: KeyCode, modifiers: KeyModifiers) {
        field.input_handler(&KeyEvent::new(code, modifiers), &FocusDelegate::noop());
    }

    fn type_str(field: &InputField, text: &str) {
        for ch in text.chars() {
            key(field, KeyCode::Char(ch));
        }
    }

    fn render(field: &InputField, width: u16) -> Buffer {
        let mut buf = Buffer::new(width, 4);
        field.draw(&mut buf);
        buf
    }

    #[test]
    fn test_typing_moves_cursor() {
        let f = field(20);
        type_str(&f, "héllo");
        assert_eq!(f.text(), "héllo");
        assert_eq!(f.cursor_position(), "héllo".len());
    }

    #[test]
    fn test_insert_then_backspace_restores_bytes() {
        let f = field(20);
        f.set_text("ab");
        f.set_cursor_position(1);
        type_str(&f, "e\u{301}");
        assert_eq!(f.text(), "ae\u{301}b");
        assert_eq!(f.cursor_position(), 4);
        key(&f, KeyCode::Backspace);
        assert_eq!(f.text(), "ab");
        assert_eq!(f.cursor_position(), 1);

        type_str(&f, "日");
        key(&f, KeyCode::Backspace);
        assert_eq!(f.text().as_bytes(), b"ab");
    }

    #[test]
    fn test_insert_before_combining_mark_stays_on_boundary() {
        let f = field(20);
        f.set_text("\u{301}");
        f.set_cursor_position(0);
        type_str(&f, "e");
        assert_eq!(f.text(), "e\u{301}");
        assert_eq!(f.cursor_position(), 3);
    }

    #[test]
    fn test_arrows_skip_whole_graphemes() {
        let f = field(20);
        f.set_text("ae\u{301}日");
        key(&f, KeyCode::Left);
        assert_eq!(f.cursor_position(), 4);
        key(&f, KeyCode::Left);
        assert_eq!(f.cursor_position(), 1);
        key(&f, KeyCode::Right);
        assert_eq!(f.cursor_position(), 4);
        key(&f, KeyCode::Delete);
        assert_eq!(f.text(), "ae\u{301}");
    }

    #[test]
    fn test_accept_predicate_rejects() {
        let f = field(20);
        f.set_accept_func(|text, ch| ch.is_ascii_digit() && text.len() <= 3);
        type_str(&f, "1a2345");
        assert_eq!(f.text(), "123");
    }

    #[test]
    fn test_word_motion_and_deletion() {
        let f = field(40);
        f.set_text("foo bar  baz");
        key_with(&f, KeyCode::Left, KeyModifiers::ALT);
        assert_eq!(f.cursor_position(), 9);
        key_with(&f, KeyCode::Char('b'), KeyModifiers::ALT);
        assert_eq!(f.cursor_position(), 4);
        key_with(&f, KeyCode::Char('f'), KeyModifiers::ALT);
        assert_eq!(f.cursor_position(), 9);
        key_with(&f, KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(f.text(), "foo baz");
        assert_eq!(f.cursor_position(), 4);
        key_with(&f, KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert_eq!(f.text(), "foo ");
        key_with(&f, KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(f.cursor_position(), 0);
        key_with(&f, KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(f.cursor_position(), 4);
        key_with(&f, KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(f.text(), "");
    }

    #[test]
    fn test_mask_changes_only_rendering() {
        let f = field(10);
        f.set_mask_character(Some('*'));
        type_str(&f, "s3crét");
        assert_eq!(f.text(), "s3crét");
        let buf = render(&f, 10);
        assert_eq!(buf.row_text(0), "******    ");
        assert_eq!(buf.cursor(), Some((6, 0)));
    }

    #[test]
    fn test_long_text_scrolls() {
        let f = field(5);
        type_str(&f, "abcdefgh");
        let buf = render(&f, 5);
        assert_eq!(buf.row_text(0), "efgh ");
        assert_eq!(buf.cursor(), Some((4, 0)));

        key(&f, KeyCode::Home);
        let buf = render(&f, 5);
        assert_eq!(buf.row_text(0), "abcde");
        assert_eq!(buf.cursor(), Some((0, 0)));
    }

    #[test]
    fn test_wide_text_scrolls_by_columns() {
        let f = field(5);
        type_str(&f, "日本語");
        let buf = render(&f, 5);
        assert_eq!(buf.row_text(0), "本語 ");
        assert_eq!(buf.cursor(), Some((4, 0)));
    }

    #[test]
    fn test_label_and_placeholder() {
        let f = field(12);
        f.set_label("Name: ").set_placeholder("you");
        let buf = render(&f, 12);
        assert_eq!(buf.row_text(0), "Name: you   ");
        assert_eq!(buf.cursor(), Some((6, 0)));
    }

    #[test]
    fn test_field_note_second_row() {
        let f = field(10);
        f.set_field_note("hint");
        assert_eq!(f.field_height(), 2);
        f.set_rect(Rect::new(0, 0, 10, 2));
        let buf = render(&f, 10);
        assert_eq!(buf.row_text(1), "hint      ");
    }

    #[test]
    fn test_changed_runs_without_lock() {
        let f = field(20);
        let weak = Arc::downgrade(&f);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        f.set_changed_func(move |text| {
            if let Some(f) = weak.upgrade() {
                // Re-entrant write: would deadlock if the lock were held.
                f.set_placeholder("x");
                sink.lock().unwrap().push((text.to_string(), f.cursor_position()));
            }
        });
        type_str(&f, "ab");
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("a".to_string(), 1), ("ab".to_string(), 2)]
        );
    }

    #[test]
    fn test_done_and_finished_order() {
        let f = field(20);
        let log = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::clone(&log);
        let finished = Arc::clone(&log);
        f.set_done_func(move |key| done.lock().unwrap().push(("done", key)));
        f.set_finished_func(Arc::new(move |key| {
            finished.lock().unwrap().push(("finished", key));
        }));
        key(&f, KeyCode::Down);
        key(&f, KeyCode::Esc);
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                ("done", KeyCode::Tab),
                ("finished", KeyCode::Tab),
                ("done", KeyCode::Esc),
                ("finished", KeyCode::Esc)
            ]
        );
    }

    fn with_candidates(f: &InputField, candidates: &'static [&'static str]) {
        f.set_autocomplete_func(move |text| {
            candidates
                .iter()
                .filter(|c| !text.is_empty() && c.starts_with(text))
                .map(|c| ListItem::new(*c))
                .collect()
        });
    }

    #[test]
    fn test_autocomplete_suggestion() {
        let f = field(20);
        with_candidates(&f, &["foo", "foobar"]);
        type_str(&f, "foo");
        assert!(f.autocomplete_list().is_some());
        assert_eq!(f.suggestion(), "bar");
        assert_eq!(f.autocomplete_list().unwrap().current_item(), 0);
    }

    #[test]
    fn test_autocomplete_no_candidates() {
        let f = field(20);
        f.set_autocomplete_func(|_| Vec::new());
        type_str(&f, "foo");
        assert!(f.autocomplete_list().is_none());
        assert_eq!(f.suggestion(), "");
    }

    #[test]
    fn test_autocomplete_closes_when_candidates_run_out() {
        let f = field(20);
        with_candidates(&f, &["foo"]);
        type_str(&f, "f");
        assert!(f.autocomplete_list().is_some());
        type_str(&f, "x");
        assert!(f.autocomplete_list().is_none());
        assert_eq!(f.suggestion(), "");
    }

    #[test]
    fn test_autocomplete_cycle_and_accept() {
        let f = field(20);
        f.set_autocomplete_func(|text| {
            if text.is_empty() {
                return Vec::new();
            }
            vec![
                ListItem::with_secondary("Apple", "apple"),
                ListItem::with_secondary("Apricot", "apricot"),
            ]
        });
        let done = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&done);
        f.set_done_func(move |key| sink.lock().unwrap().push(key));

        type_str(&f, "a");
        key(&f, KeyCode::Down);
        assert_eq!(f.autocomplete_list().unwrap().current_item(), 1);
        assert_eq!(f.suggestion(), "pricot");
        key(&f, KeyCode::Down);
        assert_eq!(f.autocomplete_list().unwrap().current_item(), 0);
        key(&f, KeyCode::Up);
        assert_eq!(f.autocomplete_list().unwrap().current_item(), 1);
        key(&f, KeyCode::Enter);

        assert_eq!(f.text(), "apricot");
        assert_eq!(f.cursor_position(), 7);
        assert!(f.autocomplete_list().is_none());
        assert!(done.lock().unwrap().is_empty());
    }

    #[test]
    fn test_tab_cycles_open_list() {
        let f = field(20);
        with_candidates(&f, &["apple", "apricot", "avocado"]);
        let log = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::clone(&log);
        let finished = Arc::clone(&log);
        f.set_done_func(move |key| done.lock().unwrap().push(("done", key)));
        f.set_finished_func(Arc::new(move |key| {
            finished.lock().unwrap().push(("finished", key));
        }));

        type_str(&f, "a");
        key(&f, KeyCode::BackTab);
        assert_eq!(f.autocomplete_list().unwrap().current_item(), 2);
        assert_eq!(f.suggestion(), "vocado");
        key(&f, KeyCode::Tab);
        assert_eq!(f.autocomplete_list().unwrap().current_item(), 0);
        assert_eq!(f.suggestion(), "pple");
        key(&f, KeyCode::Tab);
        assert_eq!(f.autocomplete_list().unwrap().current_item(), 1);
        assert_eq!(f.suggestion(), "pricot");
        assert!(log.lock().unwrap().is_empty());

        key(&f, KeyCode::Esc);
        assert!(f.autocomplete_list().is_none());
        key(&f, KeyCode::Tab);
        assert_eq!(
            *log.lock().unwrap(),
            vec![("done", KeyCode::Tab), ("finished", KeyCode::Tab)]
        );
    }

    #[test]
    fn test_scrolling_list_updates_suggestion() {
        let f = field(20);
        with_candidates(&f, &["apple", "apricot"]);
        type_str(&f, "a");
        render(&f, 20);
        assert_eq!(f.suggestion(), "pple");

        let delegate = FocusDelegate::noop();
        let (consumed, _) =
            f.mouse_handler(MouseAction::ScrollDown, &MouseEvent::new(1, 1), &delegate);
        assert!(consumed);
        assert_eq!(f.autocomplete_list().unwrap().current_item(), 1);
        assert_eq!(f.suggestion(), "pricot");

        key(&f, KeyCode::Enter);
        assert_eq!(f.text(), "apricot");
    }

    #[test]
    fn test_escape_closes_list_without_done() {
        let f = field(20);
        with_candidates(&f, &["foo"]);
        let done = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&done);
        f.set_done_func(move |_| *counter.lock().unwrap() += 1);

        type_str(&f, "f");
        key(&f, KeyCode::Esc);
        assert!(f.autocomplete_list().is_none());
        assert_eq!(f.text(), "f");
        assert_eq!(*done.lock().unwrap(), 0);
        key(&f, KeyCode::Esc);
        assert_eq!(*done.lock().unwrap(), 1);
    }

    #[test]
    fn test_suggestion_drawn_after_text() {
        let f = field(10);
        with_candidates(&f, &["hello"]);
        type_str(&f, "he");
        let buf = render(&f, 10);
        assert_eq!(buf.row_text(0), "hello     ");
        assert_eq!(
            buf.get(3, 0).and_then(|c| c.fg()),
            Some(Theme::DEFAULT.contrast_secondary_text_color)
        );
        // The drop-down opens below the field.
        assert_eq!(buf.row_text(1), "hello     ");
        assert_eq!(buf.cursor(), Some((2, 0)));
    }

    #[test]
    fn test_list_drops_up_without_room() {
        let f = field(10);
        f.set_rect(Rect::new(0, 3, 10, 1));
        with_candidates(&f, &["ab", "abc"]);
        type_str(&f, "a");
        render(&f, 10);
        assert_eq!(f.autocomplete_list().unwrap().rect(), Rect::new(0, 1, 3, 2));
    }

    #[test]
    fn test_click_on_list_accepts() {
        let f = field(10);
        with_candidates(&f, &["ab", "abc"]);
        type_str(&f, "a");
        render(&f, 10);

        let (consumed, capture) =
            f.mouse_handler(MouseAction::LeftDown, &MouseEvent::new(1, 2), &FocusDelegate::noop());
        assert!(consumed);
        assert!(capture.is_some());
        let (consumed, _) =
            f.mouse_handler(MouseAction::LeftClick, &MouseEvent::new(1, 2), &FocusDelegate::noop());
        assert!(consumed);
        assert_eq!(f.text(), "abc");
        assert!(f.autocomplete_list().is_none());
    }

    #[test]
    fn test_click_places_cursor() {
        let f = field(10);
        f.set_label("> ");
        f.set_text("a日b");
        render(&f, 10);

        let delegate = FocusDelegate::noop();
        f.mouse_handler(MouseAction::LeftClick, &MouseEvent::new(4, 0), &delegate);
        assert_eq!(f.cursor_position(), 1);
        f.mouse_handler(MouseAction::LeftClick, &MouseEvent::new(3, 0), &delegate);
        assert_eq!(f.cursor_position(), 1);
        f.mouse_handler(MouseAction::LeftClick, &MouseEvent::new(5, 0), &delegate);
        assert_eq!(f.cursor_position(), 4);
        f.mouse_handler(MouseAction::LeftClick, &MouseEvent::new(9, 0), &delegate);
        assert_eq!(f.cursor_position(), 5);
        f.mouse_handler(MouseAction::LeftClick, &MouseEvent::new(2, 0), &delegate);
        assert_eq!(f.cursor_position(), 0);
    }

    #[test]
    fn test_click_requests_focus() {
        let f = InputField::new();
        f.set_rect(Rect::new(0, 0, 10, 1));
        let requested = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&requested);
        let delegate = FocusDelegate::new(move |_| *counter.lock().unwrap() += 1);
        let (consumed, _) = f.mouse_handler(MouseAction::LeftDown, &MouseEvent::new(3, 0), &delegate);
        assert!(consumed);
        let (consumed, _) = f.mouse_handler(MouseAction::LeftDown, &MouseEvent::new(3, 1), &delegate);
        assert!(!consumed);
        assert_eq!(*requested.lock().unwrap(), 1);
    }

    fn op() -> impl Strategy<Value = KeyEvent> {
        prop_oneof![
            prop::sample::select(vec!['a', 'Z', ' ', 'é', '日', '\u{301}', '😀'])
                .prop_map(|c| KeyEvent::plain(KeyCode::Char(c))),
            prop::sample::select(vec![
                KeyCode::Left,
                KeyCode::Right,
                KeyCode::Home,
                KeyCode::End,
                KeyCode::Backspace,
                KeyCode::Delete,
            ])
            .prop_map(KeyEvent::plain),
            prop::sample::select(vec!['w', 'k', 'u'])
                .prop_map(|c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)),
            prop::sample::select(vec!['b', 'f'])
                .prop_map(|c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT)),
        ]
    }

    proptest! {
        #[test]
        fn test_cursor_stays_in_bounds_and_visible(
            ops in prop::collection::vec(op(), 1..60),
            width in 1_i32..12,
        ) {
            let f = field(width);
            for event in ops {
                f.input_handler(&event, &FocusDelegate::noop());
                let text = f.text();
                let cursor = f.cursor_position();
                prop_assert!(cursor <= text.len());
                prop_assert!(text.is_char_boundary(cursor));

                let mut buf = Buffer::new(16, 1);
                f.draw(&mut buf);
                let (x, _) = buf.cursor().unwrap();
                prop_assert!((0..width).contains(&x), "cursor column {} outside field of {}", x, width);
                if plain_width(&text) < width as usize {
                    prop_assert_eq!(x as usize, plain_width(&text[..cursor]));
                }
            }
        }
    }
}
