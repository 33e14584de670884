//! XDG config store adapter

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Directory under the user config dir holding `config.toml`
pub const APP_DIR_NAME: &str = "mic-recorder";

const CONFIG_FILE_NAME: &str = "config.toml";

/// TOML config file under `$XDG_CONFIG_HOME/mic-recorder`
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    /// Store at `<config dir>/mic-recorder/config.toml`
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(APP_DIR_NAME);

        Self {
            path: config_dir.join(CONFIG_FILE_NAME),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse a config file body. Values are checked on save, so a
    /// hand-edited file with a bad value still loads and can be repaired.
    fn parse_toml(content: &str) -> Result<AppConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn to_toml(config: &AppConfig) -> Result<String, ConfigError> {
        toml::to_string_pretty(config).map_err(|e| ConfigError::WriteError(e.to_string()))
    }

    /// Sibling file the new contents are written to before the rename
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| CONFIG_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AppConfig::empty()),
            Err(e) => {
                return Err(ConfigError::ReadError(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        Self::parse_toml(&content)
    }

    /// Validate, then replace the file in one rename so a crash never
    /// leaves a half-written config behind
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let content = Self::to_toml(config)?;
        let write_error = |e: std::io::Error| ConfigError::WriteError(e.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(write_error)?;
        }

        let staging = self.staging_path();
        fs::write(&staging, content).await.map_err(write_error)?;
        if let Err(e) = fs::rename(&staging, &self.path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(write_error(e));
        }

        debug!("Saved config to {}", self.path.display());
        Ok(())
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path.display().to_string(),
            ));
        }

        self.save(&AppConfig::defaults()).await
    }
}
