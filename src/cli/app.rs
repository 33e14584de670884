//! Main app runner for a recording session

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::ports::{ConfigStore, PermissionGate};
use crate::application::{CaptureController, StartOutcome};
use crate::domain::config::AppConfig;
use crate::domain::error::DurationParseError;
use crate::domain::recording::Duration;
use crate::infrastructure::{
    create_input_factory, HostPermissionGate, MusicDirStore, XdgConfigStore,
};

use super::args::RecordOptions;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;
pub const EXIT_PERMISSION_DENIED: u8 = 3;

/// How often the status line refreshes
const STATUS_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);

/// Record until Ctrl+C, SIGTERM or the duration limit, then finalize the file
pub async fn run_record(options: RecordOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let gate = HostPermissionGate::new(&options.output_dir);
    if let Err(e) = gate.check() {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_PERMISSION_DENIED);
    }

    // Setup signal handler
    let shutdown = ShutdownSignal::new();
    if let Err(e) = shutdown.setup().await {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    let controller = Arc::new(CaptureController::new(
        create_input_factory(),
        MusicDirStore::new(&options.output_dir, options.collision),
        options.byte_order,
    ));

    let rate = options.rate;
    let started = {
        let controller = Arc::clone(&controller);
        tokio::task::spawn_blocking(move || controller.start(rate)).await
    };

    let path = match started {
        Ok(Ok(StartOutcome::Started { path })) => path,
        Ok(Ok(StartOutcome::AlreadyRecording)) => {
            presenter.error("A recording is already in progress");
            return ExitCode::from(EXIT_ERROR);
        }
        Ok(Err(e)) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        Err(e) => {
            presenter.error(&format!("Capture task failed: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    info!("Recording at {} to {}", rate, path.display());
    presenter.show_recording_progress(&format!("Recording to {}", path.display()));

    let limit_ms = options.duration.map(|d| d.as_millis());
    let started_at = Instant::now();
    let mut ticker = tokio::time::interval(STATUS_INTERVAL);

    loop {
        tokio::select! {
            _ = shutdown.wait() => {
                debug!("Shutdown requested");
                break;
            }
            _ = ticker.tick() => {
                let elapsed_ms = started_at.elapsed().as_millis() as u64;
                presenter.update_recording_progress(
                    elapsed_ms,
                    controller.samples_captured(),
                    limit_ms,
                );

                if limit_ms.is_some_and(|limit| elapsed_ms >= limit) {
                    debug!("Duration limit reached");
                    break;
                }
                // The worker ended on its own; stop() reports why.
                if !controller.is_recording() {
                    break;
                }
            }
        }
    }

    let stopped = {
        let controller = Arc::clone(&controller);
        tokio::task::spawn_blocking(move || controller.stop()).await
    };

    match stopped {
        Ok(Ok(Some(report))) => {
            presenter.spinner_success("Recording complete");
            presenter.capture_summary(&report);
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(Ok(None)) => {
            presenter.stop_spinner();
            presenter.warn("No recording was active");
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(Err(e)) => {
            presenter.spinner_fail("Recording failed");
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            presenter.spinner_fail("Recording failed");
            presenter.error(&format!("Capture task failed: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Turn a merged config plus the raw `--duration` into run options
pub fn record_options(
    config: &AppConfig,
    duration: Option<&str>,
) -> Result<RecordOptions, DurationParseError> {
    let duration = duration.map(str::parse::<Duration>).transpose()?;

    Ok(RecordOptions {
        rate: config.sample_rate_or_default(),
        output_dir: config.output_dir_or_default(),
        duration,
        byte_order: config.byte_order_or_default(),
        collision: config.collision_policy_or_default(),
    })
}

/// Load and merge configuration from file and CLI.
///
/// `MIC_RECORDER_OUTPUT_DIR` is folded into the CLI layer by clap, so the
/// precedence is defaults < file < env < flags.
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await.and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring config file {}: {}", store.path().display(), e);
            AppConfig::empty()
        }
    };

    AppConfig::defaults().merge(file_config).merge(cli_config)
}
