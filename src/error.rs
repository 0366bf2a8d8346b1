//! Error types for todo
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// All error types that can occur while managing a todo list
#[derive(Debug, Error)]
pub enum TodoError {
    /// Wrong argument count or shape
    #[error("{0}")]
    Usage(String),

    /// A string that should have been an index but isn't one
    #[error("'{0}' isn't a valid positive integer")]
    InvalidIndex(String),

    /// Index past the end of the list
    #[error("index {index} is out of range (list has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    /// No home directory to build the default path from
    #[error("HOME is not set")]
    HomeNotSet,

    #[error("failed to open '{}'", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{}'", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TodoError {
    /// True for errors caused by how the program was invoked rather than by the file
    pub fn is_usage(&self) -> bool {
        matches!(self, TodoError::Usage(_))
    }
}

/// Result type alias for todo operations
pub type Result<T> = std::result::Result<T, TodoError>;
