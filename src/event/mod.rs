//! Event module: Keyboard and mouse input as seen by widgets.
//!
//! Raw crossterm events are converted into the small, copyable types here,
//! and key matching goes through [`Shortcut`]s so bindings can be swapped
//! in one place ([`Keybindings`]).

mod key;
mod mouse;
mod shortcut;

pub use key::{KeyCode, KeyEvent, KeyModifiers};
pub use mouse::{MouseAction, MouseEvent};
pub use shortcut::{hit_shortcut, Keybindings, Shortcut};
