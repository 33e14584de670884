//! Sample rate value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidSampleRateError;

/// Candidate capture rates in Hz, in selection-index order.
pub const SUPPORTED_SAMPLE_RATES: [u32; 4] = [44_100, 48_000, 88_200, 96_000];

/// Bytes per mono 16-bit sample.
pub const BYTES_PER_SAMPLE: usize = 2;

/// A capture rate drawn from [`SUPPORTED_SAMPLE_RATES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleRate(u32);

impl SampleRate {
    /// All candidate rates
    pub fn all() -> impl Iterator<Item = SampleRate> {
        SUPPORTED_SAMPLE_RATES.iter().copied().map(SampleRate)
    }

    /// Look up a rate by its position in the candidate list
    pub fn from_index(index: usize) -> Option<Self> {
        SUPPORTED_SAMPLE_RATES.get(index).copied().map(SampleRate)
    }

    /// Position of this rate in the candidate list
    pub fn index(&self) -> usize {
        SUPPORTED_SAMPLE_RATES
            .iter()
            .position(|&hz| hz == self.0)
            .unwrap_or(0)
    }

    pub const fn hz(&self) -> u32 {
        self.0
    }

    /// Buffer size used when the device cannot report a minimum:
    /// one second of mono 16-bit audio.
    pub const fn fallback_buffer_bytes(&self) -> usize {
        self.0 as usize * BYTES_PER_SAMPLE
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        SampleRate(SUPPORTED_SAMPLE_RATES[0])
    }
}

impl TryFrom<u32> for SampleRate {
    type Error = InvalidSampleRateError;

    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        if SUPPORTED_SAMPLE_RATES.contains(&hz) {
            Ok(SampleRate(hz))
        } else {
            Err(InvalidSampleRateError {
                input: hz.to_string(),
            })
        }
    }
}

impl FromStr for SampleRate {
    type Err = InvalidSampleRateError;

    /// Accepts "48000", "48000hz", "48khz" and "44.1khz".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidSampleRateError {
            input: s.to_string(),
        };
        let input = s.trim().to_lowercase();

        let hz = if let Some(khz) = input.strip_suffix("khz") {
            let value: f64 = khz.trim().parse().map_err(|_| err())?;
            (value * 1000.0).round() as u32
        } else {
            input
                .strip_suffix("hz")
                .unwrap_or(&input)
                .trim()
                .parse::<u32>()
                .map_err(|_| err())?
        };

        SampleRate::try_from(hz).map_err(|_| err())
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_first_candidate() {
        assert_eq!(SampleRate::default().hz(), 44_100);
        assert_eq!(SampleRate::default().index(), 0);
    }

    #[test]
    fn from_index_round_trips_position() {
        for (i, hz) in SUPPORTED_SAMPLE_RATES.iter().enumerate() {
            let rate = SampleRate::from_index(i).unwrap();
            assert_eq!(rate.hz(), *hz);
            assert_eq!(rate.index(), i);
        }
        assert!(SampleRate::from_index(4).is_none());
    }

    #[test]
    fn parse_plain_and_suffixed() {
        assert_eq!("48000".parse::<SampleRate>().unwrap().hz(), 48_000);
        assert_eq!("96000Hz".parse::<SampleRate>().unwrap().hz(), 96_000);
        assert_eq!("48kHz".parse::<SampleRate>().unwrap().hz(), 48_000);
        assert_eq!("44.1khz".parse::<SampleRate>().unwrap().hz(), 44_100);
        assert_eq!(" 88.2 kHz ".parse::<SampleRate>().unwrap().hz(), 88_200);
    }

    #[test]
    fn parse_rejects_unsupported() {
        assert!("22050".parse::<SampleRate>().is_err());
        assert!("16khz".parse::<SampleRate>().is_err());
        assert!("fast".parse::<SampleRate>().is_err());
        assert!("".parse::<SampleRate>().is_err());
    }

    #[test]
    fn try_from_rejects_unsupported() {
        assert!(SampleRate::try_from(8_000).is_err());
        assert!(SampleRate::try_from(48_000).is_ok());
    }

    #[test]
    fn fallback_buffer_is_one_second() {
        let rate = SampleRate::try_from(44_100).unwrap();
        assert_eq!(rate.fallback_buffer_bytes(), 88_200);
    }

    #[test]
    fn display_includes_unit() {
        assert_eq!(SampleRate::default().to_string(), "44100 Hz");
    }
}
