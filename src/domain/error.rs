//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 30s, 1m, 2m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when a sample rate is not one of the supported candidates
#[derive(Debug, Clone, Error)]
#[error("Invalid sample rate: \"{input}\". Supported rates are: 44100, 48000, 88200, 96000")]
pub struct InvalidSampleRateError {
    pub input: String,
}

/// Error when a value is not one of a fixed set of choices
#[derive(Debug, Clone, Error)]
#[error("Invalid {what}: \"{input}\". Valid values are: {valid}")]
pub struct InvalidChoiceError {
    pub what: &'static str,
    pub input: String,
    pub valid: &'static str,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
