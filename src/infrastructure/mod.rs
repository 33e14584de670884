//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces:
//! cpal audio input, on-disk capture files, host permission checks and
//! the TOML config file.

pub mod config;
pub mod permission;
pub mod recording;

// Re-export adapters
pub use config::XdgConfigStore;
pub use permission::HostPermissionGate;
pub use recording::{create_input_factory, CpalInput, CpalInputFactory, MusicDirStore};
