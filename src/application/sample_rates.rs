//! Sample-rate availability probing

use tracing::debug;

use crate::domain::recording::SampleRate;

use super::ports::{AudioInputFactory, DeviceError};

/// One candidate rate and what the device said about it
#[derive(Debug, Clone)]
pub struct RateProbe {
    pub rate: SampleRate,
    pub min_buffer_bytes: Result<usize, DeviceError>,
}

impl RateProbe {
    /// A rate is usable when the device reports a positive minimum buffer
    pub fn is_available(&self) -> bool {
        matches!(self.min_buffer_bytes, Ok(bytes) if bytes > 0)
    }
}

/// Query the device for every candidate rate
pub fn probe_sample_rates<F: AudioInputFactory + ?Sized>(factory: &F) -> Vec<RateProbe> {
    SampleRate::all()
        .map(|rate| {
            let min_buffer_bytes = factory.min_buffer_size(rate);
            debug!("{}: {:?}", rate, min_buffer_bytes);
            RateProbe {
                rate,
                min_buffer_bytes,
            }
        })
        .collect()
}

/// Candidate rates the device accepts, in candidate-list order
pub fn available_sample_rates<F: AudioInputFactory + ?Sized>(factory: &F) -> Vec<SampleRate> {
    probe_sample_rates(factory)
        .into_iter()
        .filter(RateProbe::is_available)
        .map(|probe| probe.rate)
        .collect()
}
