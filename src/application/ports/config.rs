//! Configuration port interface

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for persisted settings (the sample-rate selection and output options)
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load configuration.
    /// A missing file yields an empty config rather than an error.
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Persist configuration, creating parent directories as needed.
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Location of the backing file.
    fn path(&self) -> PathBuf;

    fn exists(&self) -> bool;

    /// Write a file populated with defaults.
    /// Fails with [`ConfigError::AlreadyExists`] if one is present.
    async fn init(&self) -> Result<(), ConfigError>;
}
