//! Capture session state

use std::fmt;

/// Lifecycle of the capture controller.
///
/// There is no paused or draining state: `start` moves IDLE -> RECORDING,
/// `stop` (or a failed worker) moves RECORDING -> IDLE. Repeating either
/// call in its target state is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Recording,
}

impl CaptureState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
        }
    }

    pub const fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
