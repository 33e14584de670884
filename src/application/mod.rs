//! Application layer - Use cases and port interfaces
//!
//! Contains the capture controller, the capture loop it runs, and the
//! trait definitions for devices, storage and configuration.

pub mod capture;
pub mod capture_loop;
pub mod ports;
pub mod sample_rates;

// Re-export use cases
pub use capture::{CaptureController, CaptureError, CaptureReport, StartOutcome};
pub use capture_loop::{frame_buffer, resolve_buffer_bytes, run_capture_loop, LoopError};
pub use sample_rates::{available_sample_rates, probe_sample_rates, RateProbe};
