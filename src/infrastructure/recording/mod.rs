//! Recording infrastructure module
//!
//! Provides the cpal-backed audio input and the file store capture
//! sessions write raw PCM into.

mod cpal_input;
mod music_dir;

pub use cpal_input::{CpalInput, CpalInputFactory, READ_TIMEOUT};
pub use music_dir::MusicDirStore;

/// Create the input factory for the host's default microphone
pub fn create_input_factory() -> CpalInputFactory {
    CpalInputFactory::new()
}
