//! Capture permission port

use thiserror::Error;

/// Why capture may not proceed
#[derive(Debug, Clone, Error)]
pub enum PermissionDenied {
    #[error("Microphone access denied: {0}")]
    Microphone(String),

    #[error("Cannot write recordings to {path}: {reason}")]
    Storage { path: String, reason: String },
}

/// Checked once before any capture is attempted
pub trait PermissionGate: Send + Sync {
    fn check(&self) -> Result<(), PermissionDenied>;
}
