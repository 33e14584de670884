//! MicRecorder - capture microphone audio to raw PCM files
//!
//! Records 16-bit mono audio from the default input device at one of four
//! candidate sample rates and writes the samples, headerless, to
//! `sample_HH_MM_SS.pcm` in the music directory.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Sample rates, the PCM writer, file naming, config and errors
//! - **Application**: The capture controller and loop, plus port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal input, capture files, XDG config)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
