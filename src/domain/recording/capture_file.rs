//! Output file naming

use std::fmt;

use chrono::{DateTime, Local, TimeZone};

pub const FILE_PREFIX: &str = "sample_";
pub const FILE_EXTENSION: &str = "pcm";

/// Name of a capture file, derived from the wall-clock time the session
/// started: `sample_<HH_MM_SS>.pcm`.
///
/// Two sessions started within the same second produce the same base name;
/// [`CaptureFileName::with_suffix`] gives the store a way to tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureFileName {
    stem: String,
}

impl CaptureFileName {
    /// Name for a session starting now
    pub fn now() -> Self {
        Self::at(&Local::now())
    }

    /// Name for a session starting at `time`
    pub fn at<Tz>(time: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            stem: format!("{}{}", FILE_PREFIX, time.format("%H_%M_%S")),
        }
    }

    /// Disambiguated variant, e.g. `sample_10_04_59_2.pcm`
    pub fn with_suffix(&self, n: u32) -> Self {
        Self {
            stem: format!("{}_{}", self.stem, n),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.stem, FILE_EXTENSION)
    }
}

impl fmt::Display for CaptureFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.stem, FILE_EXTENSION)
    }
}
