//! Recording time limit value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// A positive recording length with whole-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    secs: u64,
}

impl Duration {
    pub const fn from_secs(secs: u64) -> Self {
        Self { secs }
    }

    pub const fn as_secs(&self) -> u64 {
        self.secs
    }

    pub const fn as_millis(&self) -> u64 {
        self.secs.saturating_mul(1000)
    }

    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_secs(self.secs)
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parses "30s", "2m" and "2m30s". Units are case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DurationParseError {
            input: s.to_string(),
        };
        let input = s.trim().to_lowercase();
        if input.is_empty() {
            return Err(err());
        }

        let (minutes, rest) = match input.split_once('m') {
            Some((m, rest)) => (m.parse::<u64>().map_err(|_| err())?, rest),
            None => (0, input.as_str()),
        };

        let seconds = if rest.is_empty() {
            0
        } else {
            rest.strip_suffix('s')
                .filter(|digits| !digits.is_empty())
                .and_then(|digits| digits.parse::<u64>().ok())
                .ok_or_else(err)?
        };

        match minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
        {
            None | Some(0) => Err(err()),
            Some(secs) => Ok(Self { secs }),
        }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.secs / 60, self.secs % 60) {
            (0, s) => write!(f, "{}s", s),
            (m, 0) => write!(f, "{}m", m),
            (m, s) => write!(f, "{}m{}s", m, s),
        }
    }
}
