//! Key events and their conversion from crossterm.

use bitflags::bitflags;
use crossterm::event::{self as ct, KeyEventKind};

/// Key codes for keyboard input.
///
/// This is a simplified subset of crossterm's `KeyCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Function key (F1-F12).
    F(u8),
    /// Backspace key.
    Backspace,
    /// Enter/Return key.
    Enter,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Tab key.
    Tab,
    /// Backtab (Shift+Tab).
    BackTab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Escape key.
    Esc,
    /// Null (Ctrl+Space on some terminals).
    Null,
}

impl KeyCode {
    fn from_crossterm(code: ct::KeyCode) -> Option<Self> {
        Some(match code {
            ct::KeyCode::Char(c) => Self::Char(c),
            ct::KeyCode::F(n) => Self::F(n),
            ct::KeyCode::Backspace => Self::Backspace,
            ct::KeyCode::Enter => Self::Enter,
            ct::KeyCode::Left => Self::Left,
            ct::KeyCode::Right => Self::Right,
            ct::KeyCode::Up => Self::Up,
            ct::KeyCode::Down => Self::Down,
            ct::KeyCode::Home => Self::Home,
            ct::KeyCode::End => Self::End,
            ct::KeyCode::PageUp => Self::PageUp,
            ct::KeyCode::PageDown => Self::PageDown,
            ct::KeyCode::Tab => Self::Tab,
            ct::KeyCode::BackTab => Self::BackTab,
            ct::KeyCode::Delete => Self::Delete,
            ct::KeyCode::Insert => Self::Insert,
            ct::KeyCode::Esc => Self::Esc,
            ct::KeyCode::Null => Self::Null,
            _ => return None,
        })
    }
}

bitflags! {
    /// Key modifiers held during a key press or mouse event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        /// Shift key held.
        const SHIFT = 0b0001;
        /// Control key held.
        const CONTROL = 0b0010;
        /// Alt/Option key held.
        const ALT = 0b0100;
        /// Super/Command/Windows key held.
        const SUPER = 0b1000;
    }
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self::empty();

    pub(crate) fn from_crossterm(mods: ct::KeyModifiers) -> Self {
        let mut out = Self::NONE;
        out.set(Self::SHIFT, mods.contains(ct::KeyModifiers::SHIFT));
        out.set(Self::CONTROL, mods.contains(ct::KeyModifiers::CONTROL));
        out.set(Self::ALT, mods.contains(ct::KeyModifiers::ALT));
        out.set(Self::SUPER, mods.contains(ct::KeyModifiers::SUPER));
        out
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key.
    pub code: KeyCode,
    /// Modifiers held during the press.
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// Create a key event.
    #[inline]
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key press without modifiers.
    #[inline]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    /// Convert a crossterm key event. Only presses are kept.
    pub fn from_crossterm(event: ct::KeyEvent) -> Option<Self> {
        if event.kind != KeyEventKind::Press {
            return None;
        }
        let code = KeyCode::from_crossterm(event.code)?;
        Some(Self::new(code, KeyModifiers::from_crossterm(event.modifiers)))
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::plain(code)
    }
}
