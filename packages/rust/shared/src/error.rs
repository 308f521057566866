//! Error types for spacedown.
//!
//! Library crates use [`SpacedownError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all spacedown operations.
#[derive(Debug, thiserror::Error)]
pub enum SpacedownError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// HTML parsing or content extraction error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The external renderer reported a failure for one page.
    #[error("render error: {0}")]
    Render(String),

    /// The external renderer binary could not be started at all.
    #[error("renderer unavailable: {0}")]
    RendererUnavailable(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SpacedownError>;

impl SpacedownError {
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

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
