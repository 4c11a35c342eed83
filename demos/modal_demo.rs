//! Modal Demo: A sign-up form with autocomplete and a quit confirmation.
//!
//! Demonstrates:
//! - InputField with placeholder, mask and autocomplete drop-down
//! - CheckBox and Button inside a Form
//! - Modal focus delegation (Modal -> Form -> Button)
//! - Mouse clicks routed through the Dispatcher
//!
//! Set `RUST_LOG=cellform=debug` to write a trace to `modal_demo.log`.

use cellform::terminal::flush;
use cellform::widget::{Form, ListItem, Modal};
use cellform::{Buffer, Dispatcher, Primitive, Rect};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::execute;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

const LANGUAGES: &[&str] = &[
    "Ada", "C", "C++", "Clojure", "Elixir", "Erlang", "Go", "Haskell", "Java", "Kotlin", "OCaml",
    "Python", "Ruby", "Rust", "Scala", "Swift", "Zig",
];

fn init_logging() -> io::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let file = std::fs::File::create("modal_demo.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> cellform::Result<()> {
    init_logging()?;

    let mut out = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;

    let result = run(&mut out);

    execute!(out, DisableMouseCapture, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run<W: Write>(out: &mut W) -> cellform::Result<()> {
    let (width, height) = terminal::size()?;
    let mut buffer = Buffer::new(width, height);

    let open_modal = Arc::new(AtomicBool::new(false));
    let close_modal = Arc::new(AtomicBool::new(false));
    let quit = Arc::new(AtomicBool::new(false));

    // Sign-up form
    let form = Form::new();
    form.block().set_border(true);
    form.block().set_title(" Sign up ");
    form.add_input_field("Name", "", 24)
        .set_placeholder("Ada Lovelace");
    form.add_input_field("Language", "", 24)
        .set_placeholder("start typing")
        .set_autocomplete_func(|text| {
            if text.is_empty() {
                return Vec::new();
            }
            let lower = text.to_lowercase();
            LANGUAGES
                .iter()
                .filter(|name| name.to_lowercase().starts_with(&lower))
                .map(|name| ListItem::new(*name))
                .collect()
        });
    form.add_input_field("Password", "", 24)
        .set_mask_character(Some('*'));
    form.add_checkbox("Newsletter", false);
    form.add_button("Save", || tracing::info!("form saved"));
    let opener = Arc::clone(&open_modal);
    form.add_button("Quit", move || opener.store(true, Ordering::SeqCst));
    {
        let opener = Arc::clone(&open_modal);
        form.set_cancel_func(move || opener.store(true, Ordering::SeqCst));
    }

    // Quit confirmation
    let modal = Modal::new();
    let quitter = Arc::clone(&quit);
    let closer = Arc::clone(&close_modal);
    modal
        .set_text("Do you want to quit the application?")
        .add_buttons(&["Quit", "Cancel"])
        .set_done_func(move |index, _label| {
            if index == Some(0) {
                quitter.store(true, Ordering::SeqCst);
            } else {
                closer.store(true, Ordering::SeqCst);
            }
        });

    let mut dispatcher = Dispatcher::new();
    dispatcher.set_root(form.clone());
    let mut modal_open = false;

    loop {
        buffer.clear();
        let (w, h) = (i32::from(buffer.width()), i32::from(buffer.height()));
        form.set_rect(Rect::centered(w, h, 48.min(w), 16.min(h)));
        form.draw(&mut buffer);
        if modal_open {
            modal.draw(&mut buffer);
        }
        flush(&buffer, out)?;

        match event::read()? {
            Event::Key(key)
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                break;
            }
            Event::Resize(width, height) => buffer.resize(width, height),
            event => {
                dispatcher.handle_event(&event);
            }
        }

        if quit.load(Ordering::SeqCst) {
            break;
        }
        if open_modal.swap(false, Ordering::SeqCst) {
            modal_open = true;
            modal.set_focus(1);
            dispatcher.set_root(modal.clone());
        }
        if close_modal.swap(false, Ordering::SeqCst) {
            modal_open = false;
            dispatcher.set_root(form.clone());
        }
    }
    Ok(())
}
