//! Error types for pageforge.
//!
//! Library crates use [`PageForgeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all pageforge operations.
///
/// Per-keyword errors (`Generation`, `Template`) are caught at the
/// keyword-iteration boundary and turned into log entries; run-level errors
/// (`Input`, `Archive`, `Config`, `Io`) abort the run.
#[derive(Debug, thiserror::Error)]
pub enum PageForgeError {
    /// Malformed or absent keyword input; fatal before any processing begins.
    #[error("input error: {message}")]
    Input { message: String },

    /// Content synthesis failed for one keyword; recovered locally.
    #[error("generation error: {0}")]
    Generation(String),

    /// Template parsing or rendering failed.
    #[error("template error: {message}")]
    Template { message: String },

    /// The archive could not be written or finalized; fatal to the run.
    #[error("archive error: {0}")]
    Archive(String),

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PageForgeError>;

impl PageForgeError {
    /// Create an input error from any displayable message.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input {
            message: msg.into(),
        }
    }

    /// Create a template error from any displayable message.
    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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

    /// Whether this error is recovered at the keyword-iteration boundary
    /// rather than aborting the run.
    pub fn is_per_keyword(&self) -> bool {
        matches!(self, Self::Generation(_) | Self::Template { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = PageForgeError::input("empty input");
        assert_eq!(err.to_string(), "input error: empty input");

        let err = PageForgeError::Generation("model refused".into());
        assert!(err.to_string().contains("model refused"));
    }

    #[test]
    fn per_keyword_classification() {
        assert!(PageForgeError::Generation("x".into()).is_per_keyword());
        assert!(PageForgeError::template("missing variable").is_per_keyword());
        assert!(!PageForgeError::input("empty").is_per_keyword());
        assert!(!PageForgeError::Archive("zip closed".into()).is_per_keyword());
    }
}
