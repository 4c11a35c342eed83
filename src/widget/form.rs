//! Form: Form items and a row of buttons with keyboard navigation.

use super::{Button, ButtonColors, CheckBox, InputField};
use crate::event::{KeyCode, MouseAction, MouseEvent};
use crate::layout::{Alignment, Padding, Rect};
use crate::primitive::{Block, FieldColors, FocusDelegate, FormItem, KeyCallback, MouseOutcome, Primitive};
use crate::style::Theme;
use crate::sync::{read, write};
use crate::terminal::Screen;
use crate::text::string_width;
use std::sync::{Arc, RwLock, Weak};

/// Field width used in horizontal layouts for items that want all the
/// space they can get.
const DEFAULT_FIELD_WIDTH: usize = 10;

#[derive(Clone)]
enum Element {
    Item(Arc<dyn FormItem>),
    Button(Arc<Button>),
}

impl Element {
    fn primitive(&self) -> Option<Arc<dyn Primitive>> {
        match self {
            Self::Item(item) => item.block().handle(),
            Self::Button(button) => Some(Arc::clone(button) as Arc<dyn Primitive>),
        }
    }

    fn has_focus(&self) -> bool {
        match self {
            Self::Item(item) => item.has_focus(),
            Self::Button(button) => button.has_focus(),
        }
    }

    fn install(&self, handler: KeyCallback) {
        match self {
            Self::Item(item) => item.set_finished_func(handler),
            Self::Button(button) => {
                button.set_exit_func(handler);
            }
        }
    }
}

struct State {
    items: Vec<Arc<dyn FormItem>>,
    buttons: Vec<Arc<Button>>,
    focused_element: usize,
    horizontal: bool,
    item_padding: i32,
    buttons_align: Alignment,
    field_colors: FieldColors,
    button_colors: ButtonColors,
    cancel: Option<Arc<dyn Fn() + Send + Sync>>,
    theme: Theme,
}

impl State {
    fn elements(&self) -> Vec<Element> {
        self.items
            .iter()
            .cloned()
            .map(Element::Item)
            .chain(self.buttons.iter().cloned().map(Element::Button))
            .collect()
    }

    fn element(&self, index: usize) -> Option<Element> {
        match self.items.get(index) {
            Some(item) => Some(Element::Item(Arc::clone(item))),
            None => self
                .buttons
                .get(index - self.items.len())
                .cloned()
                .map(Element::Button),
        }
    }

    fn total(&self) -> usize {
        self.items.len() + self.buttons.len()
    }
}

/// A list of form items followed by a row of buttons.
///
/// Focus goes to one element at a time. Tab, Enter and Down move to the
/// next element, Backtab and Up to the previous one, wrapping around at
/// either end. Escape runs the cancel callback if one is set, otherwise it
/// returns to the first element.
pub struct Form {
    block: Block,
    state: RwLock<State>,
    this: Weak<Form>,
}

impl Form {
    /// Create an empty form with the default theme.
    pub fn new() -> Arc<Self> {
        Self::with_theme(&Theme::DEFAULT)
    }

    /// Create an empty form with `theme`.
    pub fn with_theme(theme: &Theme) -> Arc<Self> {
        let form = Arc::new_cyclic(|weak: &Weak<Self>| {
            let handle: Weak<dyn Primitive> = weak.clone();
            Self {
                block: Block::new(theme, handle),
                state: RwLock::new(State {
                    items: Vec::new(),
                    buttons: Vec::new(),
                    focused_element: 0,
                    horizontal: false,
                    item_padding: 1,
                    buttons_align: Alignment::Left,
                    field_colors: FieldColors::from_theme(theme),
                    button_colors: ButtonColors::from_theme(theme),
                    cancel: None,
                    theme: *theme,
                }),
                this: weak.clone(),
            }
        });
        form.block.set_padding(Padding::uniform(1));
        form
    }

    /// Append any form item.
    pub fn add_form_item<T: FormItem + 'static>(&self, item: Arc<T>) -> &Self {
        write(&self.state).items.push(item);
        self
    }

    /// Append an input field and return it for further setup.
    pub fn add_input_field(&self, label: &str, value: &str, field_width: usize) -> Arc<InputField> {
        let theme = read(&self.state).theme;
        let field = InputField::with_theme(&theme);
        field
            .set_label(label)
            .set_text(value)
            .set_field_width(field_width);
        self.add_form_item(Arc::clone(&field));
        field
    }

    /// Append a checkbox and return it for further setup.
    pub fn add_checkbox(&self, label: &str, checked: bool) -> Arc<CheckBox> {
        let theme = read(&self.state).theme;
        let checkbox = CheckBox::with_theme(&theme);
        checkbox.set_label(label).set_checked(checked);
        self.add_form_item(Arc::clone(&checkbox));
        checkbox
    }

    /// Append a button that runs `selected` when pressed.
    pub fn add_button<F>(&self, label: &str, selected: F) -> Arc<Button>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let theme = read(&self.state).theme;
        let button = Button::with_theme(label, &theme);
        button.set_selected_func(selected);
        write(&self.state).buttons.push(Arc::clone(&button));
        button
    }

    /// The form item at `index`.
    pub fn form_item(&self, index: usize) -> Option<Arc<dyn FormItem>> {
        read(&self.state).items.get(index).cloned()
    }

    /// Number of form items (buttons not included).
    pub fn form_item_count(&self) -> usize {
        read(&self.state).items.len()
    }

    /// The button at `index`.
    pub fn button(&self, index: usize) -> Option<Arc<Button>> {
        read(&self.state).buttons.get(index).cloned()
    }

    /// Number of buttons.
    pub fn button_count(&self) -> usize {
        read(&self.state).buttons.len()
    }

    /// Labels of all buttons, in order.
    pub fn button_labels(&self) -> Vec<String> {
        let buttons = read(&self.state).buttons.clone();
        buttons.iter().map(|button| button.label()).collect()
    }

    /// Remove all buttons.
    pub fn clear_buttons(&self) -> &Self {
        write(&self.state).buttons.clear();
        self
    }

    /// Remove all form items, and the buttons too if `include_buttons`.
    pub fn clear(&self, include_buttons: bool) -> &Self {
        let mut state = write(&self.state);
        state.items.clear();
        if include_buttons {
            state.buttons.clear();
        }
        state.focused_element = 0;
        self
    }

    /// Lay items out side by side instead of one per row.
    pub fn set_horizontal(&self, horizontal: bool) -> &Self {
        write(&self.state).horizontal = horizontal;
        self
    }

    /// Rows (or columns, when horizontal) between items.
    pub fn set_item_padding(&self, padding: i32) -> &Self {
        write(&self.state).item_padding = padding;
        self
    }

    /// Alignment of the button row.
    pub fn set_buttons_align(&self, align: Alignment) -> &Self {
        write(&self.state).buttons_align = align;
        self
    }

    /// Colors applied to every form item on draw.
    pub fn set_field_colors(&self, colors: FieldColors) -> &Self {
        write(&self.state).field_colors = colors;
        self
    }

    /// Colors applied to every button on draw.
    pub fn set_button_colors(&self, colors: ButtonColors) -> &Self {
        write(&self.state).button_colors = colors;
        self
    }

    /// Current button colors.
    pub fn button_colors(&self) -> ButtonColors {
        read(&self.state).button_colors
    }

    /// Called when the user presses Escape on any element.
    pub fn set_cancel_func<F>(&self, handler: F) -> &Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        write(&self.state).cancel = Some(Arc::new(handler));
        self
    }

    /// Element to focus the next time the form receives focus. Items come
    /// first, then buttons.
    pub fn set_focus(&self, index: usize) -> &Self {
        write(&self.state).focused_element = index;
        self
    }

    /// Index of the form item that has focus.
    pub fn focused_item_index(&self) -> Option<usize> {
        let items = read(&self.state).items.clone();
        items.iter().position(|item| item.has_focus())
    }

    /// Index of the button that has focus.
    pub fn focused_button_index(&self) -> Option<usize> {
        let buttons = read(&self.state).buttons.clone();
        buttons.iter().position(|button| button.has_focus())
    }

    fn navigation_handler(&self, delegate: &FocusDelegate) -> KeyCallback {
        let form = self.this.clone();
        let delegate = delegate.clone();
        Arc::new(move |key| {
            if let Some(form) = form.upgrade() {
                form.navigate(key, &delegate);
            }
        })
    }

    fn navigate(&self, key: KeyCode, delegate: &FocusDelegate) {
        let cancel = {
            let mut state = write(&self.state);
            let total = state.total();
            if total == 0 {
                return;
            }
            let current = state.focused_element.min(total - 1);
            match key {
                KeyCode::Tab | KeyCode::Enter | KeyCode::Down => {
                    state.focused_element = (current + 1) % total;
                    None
                }
                KeyCode::BackTab | KeyCode::Up => {
                    state.focused_element = current.checked_sub(1).unwrap_or(total - 1);
                    None
                }
                KeyCode::Esc => {
                    let cancel = state.cancel.clone();
                    if cancel.is_none() {
                        state.focused_element = 0;
                    }
                    cancel
                }
                _ => return,
            }
        };

        match cancel {
            Some(cancel) => cancel(),
            None => self.focus(delegate),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn layout(&self) -> (Vec<Arc<dyn FormItem>>, Vec<Arc<Button>>) {
        let inner = self.block.inner_rect();
        let background = self.block.background_color();
        let (items, buttons, horizontal, item_padding, align, field_colors, button_colors) = {
            let state = read(&self.state);
            (
                state.items.clone(),
                state.buttons.clone(),
                state.horizontal,
                state.item_padding,
                state.buttons_align,
                state.field_colors,
                state.button_colors,
            )
        };

        let right_limit = inner.right();
        let (mut x, mut y) = (inner.x, inner.y);

        let max_label = items
            .iter()
            .map(|item| string_width(&item.label()))
            .max()
            .unwrap_or(0);
        let max_label = if max_label > 0 { max_label + 1 } else { 0 };

        for item in &items {
            let natural = string_width(&item.label());
            let (label_width, mut item_width) = if horizontal {
                let field_width = match item.field_width() {
                    0 => DEFAULT_FIELD_WIDTH,
                    width => width,
                };
                let label_width = if natural > 0 { natural + 1 } else { 0 };
                (label_width, (label_width + field_width) as i32)
            } else {
                x = inner.x;
                (max_label, inner.width)
            };
            if x + item_width > right_limit {
                item_width = right_limit - x;
            }

            item.set_label_width(label_width);
            item.set_field_colors(field_colors);
            item.block().set_background_color(background);

            let height = item.field_height() as i32;
            item.set_rect(Rect::new(x, y, item_width, height));
            if horizontal {
                x += item_width + item_padding;
            } else {
                y += height + item_padding;
            }
        }

        let widths: Vec<i32> = buttons
            .iter()
            .map(|button| string_width(&button.label()) as i32 + 4)
            .collect();
        let buttons_width = widths.iter().map(|w| w + 1).sum::<i32>() - 1;
        if !horizontal {
            x = inner.x;
            if x + buttons_width < right_limit {
                match align {
                    Alignment::Left => {}
                    Alignment::Center => x = (x + right_limit - buttons_width) / 2,
                    Alignment::Right => x = right_limit - buttons_width,
                }
            }
            if item_padding == 0 && !items.is_empty() {
                y += 1;
            }
        }

        for (button, width) in buttons.iter().zip(widths) {
            let width = width.min(right_limit - x);
            button.set_colors(button_colors);
            button.set_rect(Rect::new(x, y, width, 1));
            x += width + 1;
        }

        (items, buttons)
    }
}

impl Primitive for Form {
    fn block(&self) -> &Block {
        &self.block
    }

    fn draw(&self, screen: &mut dyn Screen) {
        self.block.draw(screen);
        if self.block.inner_rect().is_empty() {
            return;
        }

        let (items, buttons) = self.layout();
        let bottom = self.block.inner_rect().bottom();
        let fits = |rect: Rect| rect.y < bottom && !rect.is_empty();

        // The focused item goes last so its drop-down stays on top.
        let mut focused = None;
        for item in &items {
            if item.has_focus() {
                focused = Some(item);
            } else if fits(item.rect()) {
                item.draw(screen);
            }
        }
        for button in &buttons {
            if fits(button.rect()) {
                button.draw(screen);
            }
        }
        if let Some(item) = focused {
            if fits(item.rect()) {
                item.draw(screen);
            }
        }
    }

    fn focus(&self, delegate: &FocusDelegate) {
        let target = {
            let mut state = write(&self.state);
            let total = state.total();
            if total == 0 {
                None
            } else {
                if state.focused_element >= total {
                    state.focused_element = 0;
                }
                state.element(state.focused_element)
            }
        };

        let Some(element) = target else {
            self.block.set_focused(true);
            return;
        };
        self.block.set_focused(false);
        element.install(self.navigation_handler(delegate));
        if let Some(primitive) = element.primitive() {
            delegate.request(primitive);
        }
    }

    fn has_focus(&self) -> bool {
        if self.block.is_focused() {
            return true;
        }
        let elements = read(&self.state).elements();
        elements.iter().any(Element::has_focus)
    }

    fn handle_mouse(
        &self,
        action: MouseAction,
        event: &MouseEvent,
        set_focus: &FocusDelegate,
    ) -> MouseOutcome {
        let elements = read(&self.state).elements();
        for (index, element) in elements.iter().enumerate() {
            let Some(primitive) = element.primitive() else {
                continue;
            };
            let (consumed, capture) = primitive.mouse_handler(action, event, set_focus);
            if !consumed {
                continue;
            }
            if matches!(action, MouseAction::LeftDown | MouseAction::LeftClick) {
                write(&self.state).focused_element = index;
                element.install(self.navigation_handler(set_focus));
            }
            return (true, capture);
        }

        let inside = self.block.in_rect(event.x, event.y);
        (inside && action == MouseAction::LeftClick, None)
    }
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = read(&self.state);
        f.debug_struct("Form")
            .field("items", &state.items.len())
            .field("buttons", &state.buttons.len())
            .field("focused_element", &state.focused_element)
            .finish_non_exhaustive()
    }
}
