//! Audio input device port

use thiserror::Error;

use crate::domain::recording::SampleRate;

/// Audio device errors
#[derive(Debug, Clone, Error)]
pub enum DeviceError {
    #[error("No audio input device available")]
    NoDevice,

    #[error("Device does not support {rate}: {reason}")]
    Unsupported { rate: SampleRate, reason: String },

    #[error("Audio input could not be initialized: {0}")]
    NotInitialized(String),

    #[error("Device cannot report a minimum buffer size for {0}")]
    BufferSizeUnavailable(SampleRate),

    #[error("Audio read failed: {0}")]
    Read(String),

    #[error("Audio input disconnected")]
    Disconnected,
}

/// Opens input devices and answers capability queries.
///
/// Shared with the capture worker, so it must be `Send + Sync`. The inputs it
/// opens are created and used on the worker thread only.
pub trait AudioInputFactory: Send + Sync + 'static {
    type Input: AudioInput;

    /// Minimum viable buffer size in bytes for mono 16-bit input at `rate`.
    /// An error (or zero) means the device cannot say.
    fn min_buffer_size(&self, rate: SampleRate) -> Result<usize, DeviceError>;

    /// Open a mono 16-bit input at `rate` with a buffer of `buffer_bytes`.
    fn open(&self, rate: SampleRate, buffer_bytes: usize) -> Result<Self::Input, DeviceError>;
}

/// An opened, mono, signed 16-bit input
pub trait AudioInput {
    /// Begin delivering samples
    fn start(&mut self) -> Result<(), DeviceError>;

    /// Blocking read of up to `frame.len()` samples.
    ///
    /// Returns the number of samples filled. Short reads, including zero,
    /// are valid. Blocking is bounded so callers can poll a stop flag.
    fn read(&mut self, frame: &mut [i16]) -> Result<usize, DeviceError>;

    /// Stop delivering samples. Resources are released on drop.
    fn stop(&mut self);
}
