//! Focus: Focus delegation and event dispatch to the focused leaf.
//!
//! Handlers never move focus directly. They call
//! [`FocusDelegate::request`], and the [`Dispatcher`] applies the last
//! request once the handler has returned and every widget lock is
//! released.

use super::Primitive;
use crate::event::{KeyEvent, MouseAction, MouseEvent};
use crate::sync::lock;
use crossterm::event::Event;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Two left clicks at one position within this window make a double click.
const DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(500);

/// Upper bound on delegation hops for one focus change.
const MAX_DELEGATION_DEPTH: usize = 64;

/// The `set_focus` capability handed to focus, input and mouse handlers.
#[derive(Clone)]
pub struct FocusDelegate {
    inner: Arc<dyn Fn(Arc<dyn Primitive>) + Send + Sync>,
}

impl FocusDelegate {
    /// Wrap a focus request sink.
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(Arc<dyn Primitive>) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(sink),
        }
    }

    /// A delegate that ignores every request.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// Ask for `target` to receive focus.
    pub fn request(&self, target: Arc<dyn Primitive>) {
        (self.inner)(target);
    }
}

impl std::fmt::Debug for FocusDelegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FocusDelegate")
    }
}

fn same(a: &Arc<dyn Primitive>, b: &Arc<dyn Primitive>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Routes events to widgets and owns the focus chain.
///
/// Keys go to the focused leaf. Mouse events go to the primitive that
/// captured the mouse, otherwise to the root, which forwards them down to
/// its children.
pub struct Dispatcher {
    root: Option<Arc<dyn Primitive>>,
    focused: Option<Arc<dyn Primitive>>,
    capture: Option<Arc<dyn Primitive>>,
    pending: Arc<Mutex<Vec<Arc<dyn Primitive>>>>,
    delegate: FocusDelegate,
    last_press: Option<(MouseAction, i32, i32)>,
    last_click: Option<(Instant, i32, i32)>,
}

impl Dispatcher {
    /// Create a dispatcher with nothing to draw or focus.
    pub fn new() -> Self {
        let pending: Arc<Mutex<Vec<Arc<dyn Primitive>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&pending);
        Self {
            root: None,
            focused: None,
            capture: None,
            pending,
            delegate: FocusDelegate::new(move |target| lock(&sink).push(target)),
            last_press: None,
            last_click: None,
        }
    }

    /// Set the root primitive and give it focus.
    pub fn set_root(&mut self, root: Arc<dyn Primitive>) {
        self.root = Some(Arc::clone(&root));
        self.capture = None;
        self.set_focus(root);
    }

    /// The root primitive.
    pub fn root(&self) -> Option<Arc<dyn Primitive>> {
        self.root.clone()
    }

    /// The leaf that currently receives key events.
    pub fn focused(&self) -> Option<Arc<dyn Primitive>> {
        self.focused.clone()
    }

    /// The delegate handed to handlers. Requests made through it are
    /// applied on the next dispatch.
    pub fn delegate(&self) -> FocusDelegate {
        self.delegate.clone()
    }

    /// Move focus to `target`, following delegation until a leaf takes it.
    pub fn set_focus(&mut self, target: Arc<dyn Primitive>) {
        let mut target = target;
        for _ in 0..MAX_DELEGATION_DEPTH {
            if let Some(old) = self.focused.take() {
                if !same(&old, &target) {
                    old.blur();
                }
            }
            self.focused = Some(Arc::clone(&target));
            target.focus(&self.delegate);

            match self.take_request() {
                Some(next) => target = next,
                None => {
                    tracing::debug!(rect = ?target.rect(), "focus settled");
                    return;
                }
            }
        }
        tracing::warn!("focus delegation did not settle");
    }

    /// Last request issued since the previous call. Earlier ones are dropped.
    fn take_request(&self) -> Option<Arc<dyn Primitive>> {
        let mut pending = lock(&self.pending);
        let last = pending.pop();
        pending.clear();
        last
    }

    fn apply_requests(&mut self) {
        if let Some(target) = self.take_request() {
            self.set_focus(target);
        }
    }

    /// Send a key to the focused leaf. Returns `false` when nothing has
    /// focus.
    pub fn dispatch_key(&mut self, event: &KeyEvent) -> bool {
        let Some(focused) = self.focused.clone() else {
            return false;
        };
        focused.input_handler(event, &self.delegate);
        self.apply_requests();
        true
    }

    /// Send a mouse event to the capturing primitive, or the root.
    pub fn dispatch_mouse(&mut self, action: MouseAction, event: &MouseEvent) -> bool {
        let Some(target) = self.capture.clone().or_else(|| self.root.clone()) else {
            return false;
        };
        let (consumed, capture) = target.mouse_handler(action, event, &self.delegate);
        self.capture = capture;
        self.apply_requests();
        consumed
    }

    /// Convert and dispatch a raw terminal event.
    ///
    /// Button releases at the press position also produce a click, and a
    /// second left click at the same spot within 500 ms produces a double
    /// click. Returns whether any widget consumed the event.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) => {
                KeyEvent::from_crossterm(*key).is_some_and(|key| self.dispatch_key(&key))
            }
            Event::Mouse(mouse) => {
                let (action, event) = MouseEvent::from_crossterm(*mouse);
                self.handle_mouse_at(action, &event, Instant::now())
            }
            _ => false,
        }
    }

    fn handle_mouse_at(&mut self, action: MouseAction, event: &MouseEvent, now: Instant) -> bool {
        let mut consumed = self.dispatch_mouse(action, event);

        match action {
            MouseAction::LeftDown | MouseAction::MiddleDown | MouseAction::RightDown => {
                self.last_press = Some((action, event.x, event.y));
            }
            _ => {}
        }

        let Some(click) = action.click_for_release() else {
            return consumed;
        };
        let pressed_here = self.last_press.take()
            == action.press_for_release().map(|press| (press, event.x, event.y));
        if !pressed_here {
            return consumed;
        }
        consumed |= self.dispatch_mouse(click, event);

        if click == MouseAction::LeftClick {
            let double = self.last_click.take().is_some_and(|(at, x, y)| {
                x == event.x && y == event.y && now.duration_since(at) <= DOUBLE_CLICK_INTERVAL
            });
            if double {
                consumed |= self.dispatch_mouse(MouseAction::LeftDoubleClick, event);
            } else {
                self.last_click = Some((now, event.x, event.y));
            }
        }
        consumed
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("has_root", &self.root.is_some())
            .field("has_focus", &self.focused.is_some())
            .field("has_capture", &self.capture.is_some())
            .finish_non_exhaustive()
    }
}
