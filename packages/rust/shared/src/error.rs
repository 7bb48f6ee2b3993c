//! Error types for pipedoc.
//!
//! Library crates use [`PipedocError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

use crate::types::MetadataFormat;

/// Top-level error type for all pipedoc operations.
#[derive(Debug, thiserror::Error)]
pub enum PipedocError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Input that could not be parsed at all (e.g. a notebook that is not JSON).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A metadata payload was rejected, surfaced only when the caller asks for strict results.
    #[error(transparent)]
    Metadata(#[from] MetadataDecodeError),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PipedocError>;

impl PipedocError {
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

/// A section's metadata payload was rejected by its format parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("metadata of depth-{depth} section '{title}' is not valid {format}: {message}")]
pub struct MetadataDecodeError {
    /// Title of the offending section.
    pub title: String,
    /// Heading depth of the offending section.
    pub depth: u8,
    /// Declared payload format.
    pub format: MetadataFormat,
    /// Parser diagnostic.
    pub message: String,
}
