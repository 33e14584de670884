//! Permission checks against the local host
//!
//! Desktop hosts have no runtime permission dialog. Microphone access is
//! taken to mean "an input device is visible", and storage access means the
//! output directory can be created and written.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use cpal::traits::HostTrait;
use tracing::debug;

use crate::application::ports::{PermissionDenied, PermissionGate};

const PROBE_FILE_NAME: &str = ".mic-recorder-write-probe";

/// Checks microphone presence and output directory writability
pub struct HostPermissionGate {
    output_dir: PathBuf,
    require_input: bool,
}

impl HostPermissionGate {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            require_input: true,
        }
    }

    /// Skip the input device check
    pub fn storage_only(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            require_input: false,
        }
    }

    fn check_microphone() -> Result<(), PermissionDenied> {
        cpal::default_host()
            .default_input_device()
            .map(|_| ())
            .ok_or_else(|| PermissionDenied::Microphone("no audio input device is available".to_string()))
    }

    fn check_storage(dir: &Path) -> Result<(), PermissionDenied> {
        let denied = |reason: String| PermissionDenied::Storage {
            path: dir.display().to_string(),
            reason,
        };

        fs::create_dir_all(dir).map_err(|e| denied(e.to_string()))?;

        let probe = dir.join(PROBE_FILE_NAME);
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&probe)
            .map_err(|e| denied(e.to_string()))?;

        if let Err(e) = fs::remove_file(&probe) {
            debug!("Could not remove write probe {}: {}", probe.display(), e);
        }
        Ok(())
    }
}

impl PermissionGate for HostPermissionGate {
    fn check(&self) -> Result<(), PermissionDenied> {
        if self.require_input {
            Self::check_microphone()?;
        }
        Self::check_storage(&self.output_dir)
    }
}
