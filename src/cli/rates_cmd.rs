//! Rates command handler

use crate::application::ports::{AudioInputFactory, DeviceError};
use crate::application::{probe_sample_rates, RateProbe};

use super::presenter::Presenter;

/// Probe every candidate rate and print one line per rate.
///
/// Returns the number of rates the device accepts.
pub fn handle_rates_command<F: AudioInputFactory>(factory: &F, presenter: &Presenter) -> usize {
    let probes = probe_sample_rates(factory);
    for probe in &probes {
        presenter.output(&format_probe(probe));
    }

    let available = probes.iter().filter(|p| p.is_available()).count();
    let unknown = probes
        .iter()
        .filter(|p| {
            matches!(
                p.min_buffer_bytes,
                Ok(0) | Err(DeviceError::BufferSizeUnavailable(_))
            )
        })
        .count();
    if available == 0 && unknown == 0 {
        presenter.warn("The input device accepts none of the candidate rates");
    }
    available
}

fn format_probe(probe: &RateProbe) -> String {
    match &probe.min_buffer_bytes {
        Ok(bytes) if *bytes > 0 => format!(
            "[{}] {:>9}  available (min buffer {} bytes)",
            probe.rate.index(),
            probe.rate.to_string(),
            bytes
        ),
        Ok(_) | Err(DeviceError::BufferSizeUnavailable(_)) => format!(
            "[{}] {:>9}  buffer size unknown (records with a {} byte fallback)",
            probe.rate.index(),
            probe.rate.to_string(),
            probe.rate.fallback_buffer_bytes()
        ),
        Err(e) => format!(
            "[{}] {:>9}  unavailable ({})",
            probe.rate.index(),
            probe.rate.to_string(),
            e
        ),
    }
}
