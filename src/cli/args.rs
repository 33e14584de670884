//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::config::CollisionPolicy;
use crate::domain::recording::{ByteOrder, Duration, SampleRate};

/// MicRecorder - record the microphone to raw PCM
#[derive(Parser, Debug)]
#[command(name = "mic-recorder")]
#[command(version)]
#[command(about = "Record microphone audio to headerless 16-bit mono PCM files")]
#[command(long_about = None)]
pub struct Cli {
    /// Sample rate: 44100, 48000, 88200 or 96000 (default: configured selection)
    #[arg(short = 'r', long, value_name = "HZ")]
    pub rate: Option<SampleRate>,

    /// Directory to write recordings to (default: your music directory)
    #[arg(short = 'o', long, value_name = "DIR", env = "MIC_RECORDER_OUTPUT_DIR")]
    pub output_dir: Option<String>,

    /// Stop automatically after this long (e.g., 30s, 1m, 2m30s)
    #[arg(short = 'd', long, value_name = "TIME")]
    pub duration: Option<String>,

    /// Byte order of each sample in the output file
    #[arg(long, value_name = "ORDER")]
    pub byte_order: Option<ByteOrderArg>,

    /// What to do when the output file name is already taken
    #[arg(long, value_name = "POLICY")]
    pub on_collision: Option<CollisionArg>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List candidate sample rates and whether the input device accepts them
    Rates,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Byte order argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ByteOrderArg {
    Big,
    Little,
}

impl From<ByteOrderArg> for ByteOrder {
    fn from(arg: ByteOrderArg) -> Self {
        match arg {
            ByteOrderArg::Big => ByteOrder::Big,
            ByteOrderArg::Little => ByteOrder::Little,
        }
    }
}

/// Collision policy argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CollisionArg {
    Uniquify,
    Overwrite,
    Fail,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::Uniquify => CollisionPolicy::Uniquify,
            CollisionArg::Overwrite => CollisionPolicy::Overwrite,
            CollisionArg::Fail => CollisionPolicy::Fail,
        }
    }
}

/// Parsed options for a recording run
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub rate: SampleRate,
    pub output_dir: PathBuf,
    pub duration: Option<Duration>,
    pub byte_order: ByteOrder,
    pub collision: CollisionPolicy,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "sample_rate_index",
    "output_dir",
    "byte_order",
    "on_collision",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::try_parse_from(["mic-recorder"]).unwrap();
        assert!(cli.rate.is_none());
        assert!(cli.duration.is_none());
        assert!(cli.byte_order.is_none());
        assert!(cli.on_collision.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_rate() {
        let cli = Cli::parse_from(["mic-recorder", "-r", "48000"]);
        assert_eq!(cli.rate.map(|r| r.hz()), Some(48_000));

        let cli = Cli::parse_from(["mic-recorder", "--rate", "96khz"]);
        assert_eq!(cli.rate.map(|r| r.hz()), Some(96_000));
    }

    #[test]
    fn cli_rejects_unsupported_rate() {
        assert!(Cli::try_parse_from(["mic-recorder", "--rate", "22050"]).is_err());
    }

    #[test]
    fn cli_parses_output_options() {
        let cli = Cli::parse_from([
            "mic-recorder",
            "-o",
            "/tmp/rec",
            "-d",
            "30s",
            "--byte-order",
            "little",
            "--on-collision",
            "fail",
        ]);
        assert_eq!(cli.output_dir, Some("/tmp/rec".to_string()));
        assert_eq!(cli.duration, Some("30s".to_string()));
        assert_eq!(cli.byte_order, Some(ByteOrderArg::Little));
        assert_eq!(cli.on_collision, Some(CollisionArg::Fail));
    }

    #[test]
    fn cli_counts_verbosity() {
        let cli = Cli::parse_from(["mic-recorder", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert!(Cli::try_parse_from(["mic-recorder", "-v", "-q"]).is_err());
    }

    #[test]
    fn cli_parses_rates() {
        let cli = Cli::parse_from(["mic-recorder", "rates"]);
        assert!(matches!(cli.command, Some(Commands::Rates)));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["mic-recorder", "config", "set", "byte_order", "little"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "byte_order");
            assert_eq!(value, "little");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn value_enums_convert() {
        assert_eq!(ByteOrder::from(ByteOrderArg::Big), ByteOrder::Big);
        assert_eq!(
            CollisionPolicy::from(CollisionArg::Overwrite),
            CollisionPolicy::Overwrite
        );
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("sample_rate_index"));
        assert!(is_valid_config_key("on_collision"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
