//! Error types for the tipsy library.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for snapshot and scene operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Snapshot or input file cannot be opened for reading
    #[error("Cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Read failure on an opened snapshot
    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fewer bytes available than the record layout requires
    #[error("Truncated {context}: need {needed} bytes, {available} available")]
    Truncated {
        context: String,
        needed: usize,
        available: usize,
    },

    /// Snapshot times are not in ascending order
    #[error("Snapshot times not in ascending order: index {index} ({time}) > index {next} ({next_time})")]
    Unsorted {
        index: usize,
        next: usize,
        time: f64,
        next_time: f64,
    },

    /// Lookup of an unknown snapshot identifier
    #[error("Snapshot not found: {0}")]
    NotFound(String),

    /// Bad argument passed by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Header values that cannot describe a particle payload
    #[error("Invalid header in {context}: {reason}")]
    InvalidHeader { context: String, reason: String },

    /// Source was already released (full read done or closed)
    #[error("Snapshot source already closed: {}", .0.display())]
    SourceClosed(PathBuf),

    /// Destination cannot be created or written
    #[error("Cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid argument error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a truncation error for the given record context.
    pub fn truncated(context: impl Into<String>, needed: usize, available: usize) -> Self {
        Self::Truncated {
            context: context.into(),
            needed,
            available,
        }
    }

    /// Prefix the context of truncation and header errors with a file path,
    /// and attach the path to bare I/O errors. Other variants pass through
    /// unchanged.
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            Self::Truncated { context, needed, available } => Self::Truncated {
                context: format!("{} in {}", context, path.display()),
                needed,
                available,
            },
            Self::InvalidHeader { context, reason } => Self::InvalidHeader {
                context: format!("{} of {}", context, path.display()),
                reason,
            },
            Self::Io(source) => Self::Read {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}

/// Result type alias for tipsy operations.
pub type Result<T> = std::result::Result<T, Error>;
