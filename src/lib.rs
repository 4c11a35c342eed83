//! # Cellform
//!
//! Focus-aware terminal widgets that draw into a character grid.
//!
//! Cellform is the core of a form-oriented TUI toolkit: input fields with
//! autocomplete, checkboxes, lists, buttons, forms and modals, built on a
//! shared drawing contract and a focus-delegation protocol.
//!
//! ## Core Concepts
//!
//! - **Primitives**: Every widget owns a [`Block`] (rect, border, title,
//!   padding) and implements [`Primitive`]
//! - **Focus delegation**: Containers pass focus to a child through a
//!   [`FocusDelegate`]; the [`Dispatcher`] routes keys to the focused leaf
//! - **Grapheme-aware text**: Cursor math, measurement and printing work on
//!   grapheme clusters and screen columns, never raw bytes
//! - **Injected themes**: Widgets take an immutable [`Theme`] at
//!   construction; [`Theme::DEFAULT`] is used when none is given
//!
//! ## Example
//!
//! ```rust,ignore
//! use cellform::{Buffer, Dispatcher, Modal, Primitive};
//!
//! let modal = Modal::new();
//! modal
//!     .set_text("Quit the application?")
//!     .add_buttons(&["Quit", "Cancel"])
//!     .set_done_func(|index, label| println!("{index:?} {label}"));
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.set_root(modal.clone());
//!
//! let mut buffer = Buffer::new(80, 24);
//! modal.draw(&mut buffer);
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod error;
pub mod event;
pub mod layout;
pub mod primitive;
pub mod style;
mod sync;
pub mod terminal;
pub mod text;
pub mod widget;

// Re-exports for convenience
pub use buffer::{Buffer, Cell, CellFlags};
pub use error::{Error, Result};
pub use event::{KeyCode, KeyEvent, KeyModifiers, Keybindings, MouseAction, MouseEvent, Shortcut};
pub use layout::{Alignment, Padding, Rect};
pub use primitive::{Block, Dispatcher, FieldColors, FocusDelegate, FormItem, Primitive};
pub use style::{Color, Modifiers, Style, Theme};
pub use terminal::Screen;
pub use widget::{Button, CheckBox, Form, Frame, InputField, List, ListItem, Modal, Panel};
