//! Error types for mindscribe.
//!
//! Library crates use [`MindscribeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all mindscribe operations.
///
/// Malformed model output and malformed outline text never produce one of
/// these; both pipelines degrade instead. Errors come from configuration,
/// file I/O, and serializing a tree that was not built by the parser.
#[derive(Debug, thiserror::Error)]
pub enum MindscribeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Structural error, such as a tree whose levels do not nest.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON/TOML encoding error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MindscribeError>;

impl MindscribeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
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
        let err = MindscribeError::config("unknown marker");
        assert_eq!(err.to_string(), "config error: unknown marker");

        let err = MindscribeError::validation("child level 1 under level 2");
        assert!(err.to_string().contains("level 1 under level 2"));
    }

    #[test]
    fn io_error_keeps_path() {
        let err = MindscribeError::io(
            "/tmp/mindmap.mm",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("mindmap.mm"));
        assert!(msg.contains("denied"));
    }
}
