//! Capture session domain module

mod state;

pub use state::CaptureState;
