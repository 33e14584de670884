//! Blocking audio input on top of cpal
//!
//! cpal delivers audio through a callback on its own thread. The callback
//! downmixes to mono 16-bit and pushes chunks into a bounded channel; `read`
//! drains that channel into the caller's frame. When the channel is full the
//! chunk is dropped and counted as an overrun, so the device is never
//! throttled.
//!
//! cpal::Stream is not Send, so a `CpalInput` must be opened on the thread
//! that reads from it.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig, SupportedBufferSize, SupportedStreamConfigRange};
use tracing::{debug, error, info, warn};

use crate::application::ports::{AudioInput, AudioInputFactory, DeviceError};
use crate::domain::recording::{SampleRate, BYTES_PER_SAMPLE};

/// Upper bound on how long one `read` blocks
pub const READ_TIMEOUT: Duration = Duration::from_millis(250);

/// Callback chunks buffered between cpal and the reader
const CHUNK_QUEUE_DEPTH: usize = 64;

/// Preferred device buffer: 40 ms of audio
const PREFERRED_BUFFER_DIVISOR: u32 = 25;

/// Opens the host's default cpal input device
#[derive(Debug, Clone, Default)]
pub struct CpalInputFactory;

impl CpalInputFactory {
    pub fn new() -> Self {
        Self
    }

    fn input_device(&self) -> Result<cpal::Device, DeviceError> {
        cpal::default_host()
            .default_input_device()
            .ok_or(DeviceError::NoDevice)
    }

    /// Find a supported i16/f32 configuration containing `rate`,
    /// preferring fewer channels, then native i16
    fn select_config(
        device: &cpal::Device,
        rate: SampleRate,
    ) -> Result<SupportedStreamConfigRange, DeviceError> {
        let configs = device
            .supported_input_configs()
            .map_err(|e| DeviceError::Unsupported {
                rate,
                reason: e.to_string(),
            })?;

        configs
            .filter(|c| matches!(c.sample_format(), SampleFormat::I16 | SampleFormat::F32))
            .filter(|c| {
                c.min_sample_rate().0 <= rate.hz() && c.max_sample_rate().0 >= rate.hz()
            })
            .min_by_key(|c| (c.channels(), c.sample_format() != SampleFormat::I16))
            .ok_or_else(|| DeviceError::Unsupported {
                rate,
                reason: "no mono-capable 16-bit or float configuration".to_string(),
            })
    }
}

impl AudioInputFactory for CpalInputFactory {
    type Input = CpalInput;

    fn min_buffer_size(&self, rate: SampleRate) -> Result<usize, DeviceError> {
        let device = self.input_device()?;
        let config = Self::select_config(&device, rate)?;

        match *config.buffer_size() {
            SupportedBufferSize::Range { min, max } => {
                Ok(buffer_frames(rate, min, max) as usize * BYTES_PER_SAMPLE)
            }
            SupportedBufferSize::Unknown => Err(DeviceError::BufferSizeUnavailable(rate)),
        }
    }

    fn open(&self, rate: SampleRate, buffer_bytes: usize) -> Result<CpalInput, DeviceError> {
        let device = self.input_device()?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());
        let supported = Self::select_config(&device, rate)?
            .with_sample_rate(cpal::SampleRate(rate.hz()));

        let channels = supported.channels();
        let sample_format = supported.sample_format();
        let config = StreamConfig {
            channels,
            sample_rate: supported.sample_rate(),
            buffer_size: cpal::BufferSize::Default,
        };

        debug!(
            "Opening {}: {} channel(s), {:?}, {} byte frame",
            device_name, channels, sample_format, buffer_bytes
        );

        let (tx, rx) = mpsc::sync_channel(CHUNK_QUEUE_DEPTH);
        let overruns = Arc::new(AtomicU64::new(0));
        let device_lost = Arc::new(AtomicBool::new(false));

        let err_fn = {
            let device_lost = Arc::clone(&device_lost);
            move |err: cpal::StreamError| {
                error!("Audio stream error: {}", err);
                if matches!(err, cpal::StreamError::DeviceNotAvailable) {
                    device_lost.store(true, Ordering::Release);
                }
            }
        };

        let stream = match sample_format {
            SampleFormat::I16 => {
                let sink = ChunkSender::new(tx, Arc::clone(&overruns));
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        sink.push(downmix(data, channels));
                    },
                    err_fn,
                    None,
                )
            }
            SampleFormat::F32 => {
                let sink = ChunkSender::new(tx, Arc::clone(&overruns));
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let converted: Vec<i16> = data.iter().map(|&s| f32_to_i16(s)).collect();
                        sink.push(downmix(&converted, channels));
                    },
                    err_fn,
                    None,
                )
            }
            other => {
                return Err(DeviceError::Unsupported {
                    rate,
                    reason: format!("sample format {:?}", other),
                })
            }
        }
        .map_err(|e| DeviceError::NotInitialized(e.to_string()))?;

        info!("Using audio device: {}", device_name);

        Ok(CpalInput {
            stream,
            reader: ChunkReader::new(rx, device_lost),
            overruns,
        })
    }
}

/// An open cpal input stream
pub struct CpalInput {
    stream: cpal::Stream,
    reader: ChunkReader,
    overruns: Arc<AtomicU64>,
}

impl AudioInput for CpalInput {
    fn start(&mut self) -> Result<(), DeviceError> {
        self.stream
            .play()
            .map_err(|e| DeviceError::NotInitialized(e.to_string()))
    }

    fn read(&mut self, frame: &mut [i16]) -> Result<usize, DeviceError> {
        self.reader.read(frame, READ_TIMEOUT)
    }

    fn stop(&mut self) {
        if let Err(e) = self.stream.pause() {
            debug!("Pausing input stream failed: {}", e);
        }
        let dropped = self.overruns.load(Ordering::Relaxed);
        if dropped > 0 {
            warn!("{} audio chunks dropped because the reader fell behind", dropped);
        }
    }
}

/// Callback side of the chunk queue
struct ChunkSender {
    tx: SyncSender<Vec<i16>>,
    overruns: Arc<AtomicU64>,
}

impl ChunkSender {
    fn new(tx: SyncSender<Vec<i16>>, overruns: Arc<AtomicU64>) -> Self {
        Self { tx, overruns }
    }

    fn push(&self, chunk: Vec<i16>) {
        if self.tx.try_send(chunk).is_err() {
            self.overruns.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Reader side of the chunk queue; turns pushed chunks into bounded
/// blocking reads
struct ChunkReader {
    rx: Receiver<Vec<i16>>,
    pending: VecDeque<i16>,
    device_lost: Arc<AtomicBool>,
}

impl ChunkReader {
    fn new(rx: Receiver<Vec<i16>>, device_lost: Arc<AtomicBool>) -> Self {
        Self {
            rx,
            pending: VecDeque::new(),
            device_lost,
        }
    }

    /// Fill `frame` from queued audio, blocking up to `timeout`.
    /// Returns early with a short count when the deadline passes.
    fn read(&mut self, frame: &mut [i16], timeout: Duration) -> Result<usize, DeviceError> {
        let deadline = Instant::now() + timeout;
        let mut filled = self.drain_into(frame);

        while filled < frame.len() {
            if self.device_lost.load(Ordering::Acquire) && self.pending.is_empty() {
                return if filled == 0 {
                    Err(DeviceError::Disconnected)
                } else {
                    Ok(filled)
                };
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            match self.rx.recv_timeout(remaining) {
                Ok(chunk) => {
                    self.pending.extend(chunk);
                    filled += self.drain_into(&mut frame[filled..]);
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) if filled == 0 => {
                    return Err(DeviceError::Disconnected)
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        Ok(filled)
    }

    fn drain_into(&mut self, out: &mut [i16]) -> usize {
        let n = out.len().min(self.pending.len());
        for (slot, sample) in out.iter_mut().zip(self.pending.drain(..n)) {
            *slot = sample;
        }
        n
    }
}

/// Device buffer in frames for `rate`, clamped to what the device allows
fn buffer_frames(rate: SampleRate, min: u32, max: u32) -> u32 {
    (rate.hz() / PREFERRED_BUFFER_DIVISOR).clamp(min, max.max(min))
}

/// Average interleaved channels down to mono
fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}
