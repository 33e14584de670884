//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the capture use cases
//! and the audio hardware, storage and configuration adapters.

pub mod config;
pub mod input;
pub mod permission;
pub mod storage;

// Re-export common types
pub use config::ConfigStore;
pub use input::{AudioInput, AudioInputFactory, DeviceError};
pub use permission::{PermissionDenied, PermissionGate};
pub use storage::{CaptureStore, StorageError};
