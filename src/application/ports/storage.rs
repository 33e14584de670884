//! Capture file storage port

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::recording::CaptureFileName;

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Failed to create directory {path}: {reason}")]
    CreateDir { path: String, reason: String },

    #[error("Failed to create {path}: {reason}")]
    Create { path: String, reason: String },

    #[error("Capture file already exists: {0}")]
    AlreadyExists(String),
}

/// Creates the sinks capture sessions write into
pub trait CaptureStore: Send + Sync + 'static {
    type Writer: Write;

    /// Create a new file for `name`, applying the store's collision policy.
    /// Returns the path actually used.
    fn create(&self, name: &CaptureFileName) -> Result<(PathBuf, Self::Writer), StorageError>;

    /// Remove a file whose session never started
    fn discard(&self, path: &Path);

    /// Directory files are written to
    fn location(&self) -> &Path;
}
