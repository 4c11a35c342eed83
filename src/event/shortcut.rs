//! Shortcuts: Named key bindings and matching.
//!
//! Widgets never compare raw key codes for their commands. They ask
//! [`hit_shortcut`] whether an event matches any binding of an action in
//! their [`Keybindings`], so rebinding a key is a configuration change.

use super::key::{KeyCode, KeyEvent, KeyModifiers};
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

/// A key together with the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    /// The key.
    pub code: KeyCode,
    /// Required modifiers (exact match).
    pub modifiers: KeyModifiers,
}

impl Shortcut {
    /// Create a shortcut. Character keys are normalized the same way events
    /// are matched (Shift folded into the character, lowercase under Ctrl).
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        let (code, modifiers) = normalize(code, modifiers);
        Self { code, modifiers }
    }

    /// Check whether `event` triggers this shortcut.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let (code, modifiers) = normalize(event.code, event.modifiers);
        code == self.code && modifiers == self.modifiers
    }
}

/// Shift is implied by the character itself, and terminals disagree on the
/// case they report for Ctrl+letter.
fn normalize(code: KeyCode, mut modifiers: KeyModifiers) -> (KeyCode, KeyModifiers) {
    match code {
        KeyCode::Char(c) => {
            let c = if modifiers.contains(KeyModifiers::SHIFT) && !modifiers.contains(KeyModifiers::CONTROL) {
                c.to_ascii_uppercase()
            } else if modifiers.contains(KeyModifiers::CONTROL) {
                c.to_ascii_lowercase()
            } else {
                c
            };
            modifiers.remove(KeyModifiers::SHIFT);
            (KeyCode::Char(c), modifiers)
        }
        KeyCode::BackTab => {
            modifiers.remove(KeyModifiers::SHIFT);
            (code, modifiers)
        }
        KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => {
            modifiers.remove(KeyModifiers::SHIFT);
            (KeyCode::BackTab, modifiers)
        }
        _ => (code, modifiers),
    }
}

impl FromStr for Shortcut {
    type Err = Error;

    /// Parse bindings such as `"Enter"`, `"Ctrl+K"`, `"Alt+Left"`, `"Space"`
    /// or a single character.
    fn from_str(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidShortcut(text.to_string());

        // "Ctrl++" binds the plus key.
        let (prefix, key) = match text.strip_suffix("++") {
            Some(rest) => (rest, "+"),
            None => match text.rsplit_once('+') {
                Some((prefix, key)) => (prefix, key),
                None => ("", text),
            },
        };
        if key.is_empty() {
            return Err(invalid());
        }

        let mut modifiers = KeyModifiers::NONE;
        for part in prefix.split('+').filter(|p| !p.is_empty()) {
            modifiers |= match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" | "meta" | "option" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                "super" | "cmd" | "win" => KeyModifiers::SUPER,
                _ => return Err(invalid()),
            };
        }

        let mut chars = key.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            _ => match key.to_ascii_lowercase().as_str() {
                "enter" | "return" => KeyCode::Enter,
                "esc" | "escape" => KeyCode::Esc,
                "tab" => KeyCode::Tab,
                "backtab" => KeyCode::BackTab,
                "backspace" => KeyCode::Backspace,
                "delete" | "del" => KeyCode::Delete,
                "insert" | "ins" => KeyCode::Insert,
                "home" => KeyCode::Home,
                "end" => KeyCode::End,
                "pageup" | "pgup" => KeyCode::PageUp,
                "pagedown" | "pgdn" => KeyCode::PageDown,
                "up" => KeyCode::Up,
                "down" => KeyCode::Down,
                "left" => KeyCode::Left,
                "right" => KeyCode::Right,
                "space" => KeyCode::Char(' '),
                other => match other.strip_prefix('f').map(str::parse::<u8>) {
                    Some(Ok(n)) if (1..=24).contains(&n) => KeyCode::F(n),
                    _ => return Err(invalid()),
                },
            },
        };

        Ok(Self::new(code, modifiers))
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
            (KeyModifiers::SUPER, "Super+"),
        ] {
            if self.modifiers.contains(flag) {
                f.write_str(name)?;
            }
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "F{n}"),
            KeyCode::Esc => f.write_str("Escape"),
            KeyCode::BackTab => f.write_str("Backtab"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Check whether `event` matches any shortcut in any of the binding lists.
pub fn hit_shortcut(event: &KeyEvent, bindings: &[&[Shortcut]]) -> bool {
    bindings
        .iter()
        .flat_map(|list| list.iter())
        .any(|shortcut| shortcut.matches(event))
}

/// Key bindings for every widget action.
///
/// The defaults follow common readline and form conventions. Replace a list
/// with [`Keybindings::parse_list`] to rebind an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybindings {
    /// Abort editing, close a drop-down, dismiss a modal.
    pub cancel: Vec<Shortcut>,
    /// Confirm (Enter).
    pub select: Vec<Shortcut>,
    /// Secondary confirm, used for toggles (Space).
    pub select2: Vec<Shortcut>,
    /// Move to the previous form element.
    pub move_previous_field: Vec<Shortcut>,
    /// Move to the next form element.
    pub move_next_field: Vec<Shortcut>,
    /// Move up one entry.
    pub move_up: Vec<Shortcut>,
    /// Move down one entry.
    pub move_down: Vec<Shortcut>,
    /// Move left one grapheme.
    pub move_left: Vec<Shortcut>,
    /// Move right one grapheme.
    pub move_right: Vec<Shortcut>,
    /// Move to the start.
    pub move_first: Vec<Shortcut>,
    /// Move to the end.
    pub move_last: Vec<Shortcut>,
    /// Move to the start of the previous word.
    pub move_word_left: Vec<Shortcut>,
    /// Move past the next word.
    pub move_word_right: Vec<Shortcut>,
    /// Delete all text.
    pub delete_all: Vec<Shortcut>,
    /// Delete from the cursor to the end.
    pub delete_to_end: Vec<Shortcut>,
    /// Delete the word before the cursor.
    pub delete_word: Vec<Shortcut>,
    /// Delete the grapheme before the cursor.
    pub backspace: Vec<Shortcut>,
    /// Delete the grapheme under the cursor.
    pub delete_forward: Vec<Shortcut>,
}

impl Keybindings {
    /// Parse a list of bindings, failing on the first invalid one.
    pub fn parse_list(bindings: &[&str]) -> Result<Vec<Shortcut>> {
        bindings.iter().map(|b| b.parse()).collect()
    }

    /// The process-wide default bindings.
    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<Keybindings>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::default())))
    }
}

fn defaults(bindings: &[&str]) -> Vec<Shortcut> {
    bindings.iter().filter_map(|b| b.parse().ok()).collect()
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            cancel: defaults(&["Escape"]),
            select: defaults(&["Enter"]),
            select2: defaults(&["Space"]),
            move_previous_field: defaults(&["Backtab"]),
            move_next_field: defaults(&["Tab"]),
            move_up: defaults(&["Up"]),
            move_down: defaults(&["Down"]),
            move_left: defaults(&["Left"]),
            move_right: defaults(&["Right"]),
            move_first: defaults(&["Home", "Ctrl+A", "Alt+a"]),
            move_last: defaults(&["End", "Ctrl+E", "Alt+e"]),
            move_word_left: defaults(&["Alt+Left", "Alt+b"]),
            move_word_right: defaults(&["Alt+Right", "Alt+f"]),
            delete_all: defaults(&["Ctrl+U"]),
            delete_to_end: defaults(&["Ctrl+K"]),
            delete_word: defaults(&["Ctrl+W"]),
            backspace: defaults(&["Backspace"]),
            delete_forward: defaults(&["Delete"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_parse_named_keys() {
        let s: Shortcut = "Enter".parse().unwrap();
        assert_eq!(s, Shortcut::new(KeyCode::Enter, KeyModifiers::NONE));

        let s: Shortcut = "Alt+Left".parse().unwrap();
        assert_eq!(s, Shortcut::new(KeyCode::Left, KeyModifiers::ALT));

        let s: Shortcut = "Space".parse().unwrap();
        assert_eq!(s.code, KeyCode::Char(' '));

        let s: Shortcut = "F5".parse().unwrap();
        assert_eq!(s.code, KeyCode::F(5));

        let s: Shortcut = "Ctrl++".parse().unwrap();
        assert_eq!(s, Shortcut::new(KeyCode::Char('+'), KeyModifiers::CONTROL));
    }

    #[test]
    fn test_parse_invalid() {
        assert!("Ctrl+".parse::<Shortcut>().is_err());
        assert!("Hyper+a".parse::<Shortcut>().is_err());
        assert!("Banana".parse::<Shortcut>().is_err());
        assert!(matches!(
            "F99".parse::<Shortcut>(),
            Err(Error::InvalidShortcut(text)) if text == "F99"
        ));
    }

    #[test]
    fn test_ctrl_letter_case_insensitive() {
        let s: Shortcut = "Ctrl+K".parse().unwrap();
        assert!(s.matches(&key(KeyCode::Char('k'), KeyModifiers::CONTROL)));
        assert!(s.matches(&key(KeyCode::Char('K'), KeyModifiers::CONTROL | KeyModifiers::SHIFT)));
        assert!(!s.matches(&key(KeyCode::Char('k'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_alt_letter_is_case_sensitive() {
        let s: Shortcut = "Alt+a".parse().unwrap();
        assert!(s.matches(&key(KeyCode::Char('a'), KeyModifiers::ALT)));
        assert!(!s.matches(&key(KeyCode::Char('A'), KeyModifiers::ALT | KeyModifiers::SHIFT)));
        assert!(!s.matches(&key(KeyCode::Char('a'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_backtab_ignores_shift() {
        let s: Shortcut = "Backtab".parse().unwrap();
        assert!(s.matches(&key(KeyCode::BackTab, KeyModifiers::SHIFT)));
        assert!(s.matches(&key(KeyCode::BackTab, KeyModifiers::NONE)));
        assert!(s.matches(&key(KeyCode::Tab, KeyModifiers::SHIFT)));
    }

    #[test]
    fn test_modifiers_must_match_exactly() {
        let s: Shortcut = "Left".parse().unwrap();
        assert!(s.matches(&key(KeyCode::Left, KeyModifiers::NONE)));
        assert!(!s.matches(&key(KeyCode::Left, KeyModifiers::ALT)));
    }

    #[test]
    fn test_hit_shortcut_any_list() {
        let keys = Keybindings::default();
        let down = key(KeyCode::Down, KeyModifiers::NONE);
        assert!(hit_shortcut(&down, &[&keys.move_up, &keys.move_down]));
        assert!(!hit_shortcut(&down, &[&keys.move_up]));
        assert!(!hit_shortcut(&down, &[]));
    }

    #[test]
    fn test_defaults_complete() {
        let keys = Keybindings::default();
        assert_eq!(keys.move_first.len(), 3);
        assert_eq!(keys.move_word_right.len(), 2);
        assert_eq!(keys.select2, vec![Shortcut::new(KeyCode::Char(' '), KeyModifiers::NONE)]);
    }

    #[test]
    fn test_rebinding() {
        let mut keys = Keybindings::default();
        keys.cancel = Keybindings::parse_list(&["Escape", "Ctrl+G"]).unwrap();
        assert!(hit_shortcut(&key(KeyCode::Char('g'), KeyModifiers::CONTROL), &[&keys.cancel]));
        assert!(Keybindings::parse_list(&["Escape", "Nope+x"]).is_err());
    }

    #[test]
    fn test_shared_is_default() {
        assert_eq!(*Keybindings::shared(), Keybindings::default());
    }

    #[test]
    fn test_display() {
        let s: Shortcut = "Ctrl+Alt+Delete".parse().unwrap();
        assert_eq!(s.to_string(), "Ctrl+Alt+Delete");
        let s: Shortcut = "Space".parse().unwrap();
        assert_eq!(s.to_string(), "Space");
    }
}
