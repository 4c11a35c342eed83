//! Error: Failures surfaced by configuration parsing and terminal output.
//!
//! Drawing and input handling never fail; they clamp or ignore bad input.
//! Errors only come from parsing user-supplied configuration text and from
//! writing a screen buffer to a terminal.

use thiserror::Error;

/// Errors produced by this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// A key binding such as `"Ctrl+K"` could not be parsed.
    #[error("invalid shortcut `{0}`")]
    InvalidShortcut(String),
    /// A color name or `#rrggbb` value could not be parsed.
    #[error("unknown color `{0}`")]
    UnknownColor(String),
    /// Writing to the terminal failed.
    #[error("terminal output failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidShortcut("Ctrl+".to_string());
        assert_eq!(err.to_string(), "invalid shortcut `Ctrl+`");

        let err = Error::UnknownColor("chartreuse-ish".to_string());
        assert_eq!(err.to_string(), "unknown color `chartreuse-ish`");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
