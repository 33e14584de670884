//! The capture loop: blocking device reads copied sample-by-sample to a sink

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use thiserror::Error;
use tracing::{trace, warn};

use crate::domain::recording::{PcmWriter, SampleRate, BYTES_PER_SAMPLE};

use super::ports::{AudioInput, DeviceError};

/// Why the loop ended before being asked to stop
#[derive(Debug, Error)]
pub enum LoopError {
    #[error("Audio read failed after {samples} samples: {source}")]
    Read {
        samples: u64,
        #[source]
        source: DeviceError,
    },

    #[error("Write failed after {samples} samples: {source}")]
    Write {
        samples: u64,
        #[source]
        source: io::Error,
    },
}

/// Pick the buffer size for a session.
///
/// Uses the device-reported minimum when it is positive, otherwise one
/// second of audio (`rate * 2` bytes).
pub fn resolve_buffer_bytes(query: Result<usize, DeviceError>, rate: SampleRate) -> usize {
    match query {
        Ok(bytes) if bytes > 0 => bytes,
        Ok(_) => {
            warn!("Device reported a zero buffer size for {}, using fallback", rate);
            rate.fallback_buffer_bytes()
        }
        Err(e) => {
            warn!("{}, using fallback of {} bytes", e, rate.fallback_buffer_bytes());
            rate.fallback_buffer_bytes()
        }
    }
}

/// Allocate the per-session frame buffer for `buffer_bytes` of 16-bit audio
pub fn frame_buffer(buffer_bytes: usize) -> Vec<i16> {
    vec![0; (buffer_bytes / BYTES_PER_SAMPLE).max(1)]
}

/// Read from `input` into `frame` and write every returned sample to `sink`
/// until `running` is cleared.
///
/// The flag is checked once per iteration, so a read that is in flight when
/// the flag clears still completes and its samples are kept. Returns the
/// total number of samples read; `captured` tracks the same count while the
/// loop runs.
pub fn run_capture_loop<I, W>(
    input: &mut I,
    sink: &mut PcmWriter<W>,
    frame: &mut [i16],
    running: &AtomicBool,
    captured: &AtomicU64,
) -> Result<u64, LoopError>
where
    I: AudioInput + ?Sized,
    W: Write,
{
    let mut total: u64 = 0;

    while running.load(Ordering::Acquire) {
        let count = input
            .read(frame)
            .map_err(|source| LoopError::Read {
                samples: total,
                source,
            })?
            .min(frame.len());

        total += count as u64;
        captured.fetch_add(count as u64, Ordering::Relaxed);
        trace!(count, total, "frame read");

        for &sample in &frame[..count] {
            sink.write_sample(sample).map_err(|source| LoopError::Write {
                samples: sink.samples_written(),
                source,
            })?;
        }
    }

    Ok(total)
}
