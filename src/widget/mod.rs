//! Widgets: The concrete components built on the primitive core.
//!
//! Every widget is created behind an `Arc` and owns a [`Block`] for its
//! geometry and frame. Setters take `&self` and return `&Self`, so a widget
//! can be configured in a chain and still be shared with a container.
//!
//! # Example
//!
//! ```rust,ignore
//! use cellform::widget::Form;
//!
//! let form = Form::new();
//! form.add_input_field("Name", "", 20);
//! form.add_checkbox("Admin", false);
//! form.add_button("Save", || println!("saved"));
//! ```
//!
//! [`Block`]: crate::primitive::Block

mod button;
mod checkbox;
mod form;
mod frame;
mod input_field;
mod list;
mod modal;
mod panel;

pub use button::{Button, ButtonColors};
pub use checkbox::{CheckBox, CheckedCallback};
pub use form::Form;
pub use frame::Frame;
pub use input_field::{AcceptFn, AutocompleteFn, InputField, TextCallback};
pub use list::{List, ListCallback, ListColors, ListItem};
pub use modal::{Modal, ModalCallback};
pub use panel::Panel;
