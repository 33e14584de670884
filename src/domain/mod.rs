//! Domain layer - Core recording logic
//!
//! Contains value objects, the capture state and domain errors.
//! This layer has no dependencies on audio hardware or the filesystem.

pub mod config;
pub mod error;
pub mod recording;
pub mod session;

// Re-export common types
pub use config::{AppConfig, CollisionPolicy};
pub use error::*;
pub use recording::{ByteOrder, CaptureFileName, Duration, PcmWriter, SampleRate};
pub use session::CaptureState;
