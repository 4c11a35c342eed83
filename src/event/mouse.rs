//! Mouse events and their classification.

use super::key::KeyModifiers;
use crossterm::event::{self as ct, MouseButton, MouseEventKind};

/// What the mouse did.
///
/// Clicks are synthesized by the [`Dispatcher`](crate::Dispatcher) from a
/// press and release at the same position; raw conversions only produce
/// downs, ups, moves and scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    /// Pointer moved (with or without a button held).
    Move,
    /// Left button pressed.
    LeftDown,
    /// Left button released.
    LeftUp,
    /// Left button pressed and released in place.
    LeftClick,
    /// Two left clicks in quick succession.
    LeftDoubleClick,
    /// Middle button pressed.
    MiddleDown,
    /// Middle button released.
    MiddleUp,
    /// Middle button pressed and released in place.
    MiddleClick,
    /// Right button pressed.
    RightDown,
    /// Right button released.
    RightUp,
    /// Right button pressed and released in place.
    RightClick,
    /// Wheel up.
    ScrollUp,
    /// Wheel down.
    ScrollDown,
    /// Wheel left.
    ScrollLeft,
    /// Wheel right.
    ScrollRight,
}

impl MouseAction {
    /// The click action that a release of this kind completes, if any.
    pub const fn click_for_release(self) -> Option<Self> {
        match self {
            Self::LeftUp => Some(Self::LeftClick),
            Self::MiddleUp => Some(Self::MiddleClick),
            Self::RightUp => Some(Self::RightClick),
            _ => None,
        }
    }

    /// The press that must precede a release of this kind.
    pub const fn press_for_release(self) -> Option<Self> {
        match self {
            Self::LeftUp => Some(Self::LeftDown),
            Self::MiddleUp => Some(Self::MiddleDown),
            Self::RightUp => Some(Self::RightDown),
            _ => None,
        }
    }
}

/// Mouse event details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    /// X coordinate (column).
    pub x: i32,
    /// Y coordinate (row).
    pub y: i32,
    /// Key modifiers held during the event.
    pub modifiers: KeyModifiers,
}

impl MouseEvent {
    /// A mouse event at `(x, y)` without modifiers.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Convert a crossterm mouse event into an action and position.
    pub fn from_crossterm(event: ct::MouseEvent) -> (MouseAction, Self) {
        let action = match event.kind {
            MouseEventKind::Down(MouseButton::Left) => MouseAction::LeftDown,
            MouseEventKind::Down(MouseButton::Middle) => MouseAction::MiddleDown,
            MouseEventKind::Down(MouseButton::Right) => MouseAction::RightDown,
            MouseEventKind::Up(MouseButton::Left) => MouseAction::LeftUp,
            MouseEventKind::Up(MouseButton::Middle) => MouseAction::MiddleUp,
            MouseEventKind::Up(MouseButton::Right) => MouseAction::RightUp,
            MouseEventKind::Drag(_) | MouseEventKind::Moved => MouseAction::Move,
            MouseEventKind::ScrollUp => MouseAction::ScrollUp,
            MouseEventKind::ScrollDown => MouseAction::ScrollDown,
            MouseEventKind::ScrollLeft => MouseAction::ScrollLeft,
            MouseEventKind::ScrollRight => MouseAction::ScrollRight,
        };
        let position = Self {
            x: i32::from(event.column),
            y: i32::from(event.row),
            modifiers: KeyModifiers::from_crossterm(event.modifiers),
        };
        (action, position)
    }
}
