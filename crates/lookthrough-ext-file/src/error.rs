//! Errors for file-backed collaborators.

use std::path::{Path, PathBuf};

use lookthrough_core::LookthroughError;
use thiserror::Error;

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

/// Errors raised while reading or writing files.
#[derive(Error, Debug)]
pub enum FileError {
    /// Filesystem operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding or decoding failed.
    #[error("CSV error in {}: {reason}", path.display())]
    Csv {
        /// File involved.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// The store was asked to do something it cannot.
    #[error("Store error: {0}")]
    Store(String),
}

impl FileError {
    /// Creates an I/O error for a path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a CSV error for a path.
    #[must_use]
    pub fn csv(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::Csv {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }
}

impl From<FileError> for LookthroughError {
    fn from(e: FileError) -> Self {
        match e {
            FileError::Csv { path, reason } => {
                LookthroughError::format(path.display().to_string(), reason)
            }
            other => LookthroughError::Io(other.to_string()),
        }
    }
}
