//! Recording domain module

mod capture_file;
mod duration;
mod pcm;
mod sample_rate;

pub use capture_file::{CaptureFileName, FILE_EXTENSION, FILE_PREFIX};
pub use duration::Duration;
pub use pcm::{decode_samples, ByteOrder, PcmWriter};
pub use sample_rate::{SampleRate, BYTES_PER_SAMPLE, SUPPORTED_SAMPLE_RATES};
