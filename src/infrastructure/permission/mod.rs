//! Capture permission adapters

mod host;

pub use host::HostPermissionGate;
