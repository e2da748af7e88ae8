//! Error types for Pagesmith.
//!
//! Library crates use [`PagesmithError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Pagesmith operations.
#[derive(Debug, thiserror::Error)]
pub enum PagesmithError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error during metadata fetching.
    #[error("network error: {0}")]
    Network(String),

    /// JSON, HTML or date parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad URL, invalid option value, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A content source document is missing required structure.
    #[error("content error in {source_name}: {message}")]
    Content {
        source_name: String,
        message: String,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagesmithError>;

impl PagesmithError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a content error for the named source document.
    pub fn content(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Content {
            source_name: source_name.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = PagesmithError::config("unknown key `fetch.delay`");
        assert_eq!(err.to_string(), "config error: unknown key `fetch.delay`");

        let err = PagesmithError::content("draft.md", "no title header found");
        assert_eq!(
            err.to_string(),
            "content error in draft.md: no title header found"
        );
    }

    #[test]
    fn io_error_carries_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = PagesmithError::io("/site/_data/finds.json", source);
        assert!(err.to_string().contains("finds.json"));
        assert!(err.to_string().contains("gone"));
    }
}
