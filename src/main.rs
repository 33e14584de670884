//! MicRecorder CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mic_recorder::cli::{
    app::{load_merged_config, record_options, run_record, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    rates_cmd::handle_rates_command,
};
use mic_recorder::domain::config::{AppConfig, CollisionPolicy};
use mic_recorder::domain::recording::ByteOrder;
use mic_recorder::infrastructure::{create_input_factory, XdgConfigStore};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    let presenter = Presenter::new();

    // Handle subcommands
    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Rates) => {
            let factory = create_input_factory();
            handle_rates_command(&factory, &presenter);
            return ExitCode::SUCCESS;
        }
        None => {}
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        sample_rate_index: cli.rate.map(|rate| rate.index()),
        output_dir: cli.output_dir.clone(),
        byte_order: cli.byte_order.map(|o| ByteOrder::from(o).to_string()),
        on_collision: cli.on_collision.map(|c| CollisionPolicy::from(c).to_string()),
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    let options = match record_options(&config, cli.duration.as_deref()) {
        Ok(options) => options,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    run_record(options).await
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("mic_recorder={},warn", level))),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
