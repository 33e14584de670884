//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::recording::{ByteOrder, SampleRate, SUPPORTED_SAMPLE_RATES};

use super::CollisionPolicy;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Index into the candidate sample-rate list
    pub sample_rate_index: Option<usize>,
    pub output_dir: Option<String>,
    pub byte_order: Option<String>,
    pub on_collision: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            sample_rate_index: Some(0),
            output_dir: None,
            byte_order: Some(ByteOrder::default().to_string()),
            on_collision: Some(CollisionPolicy::default().to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            sample_rate_index: other.sample_rate_index.or(self.sample_rate_index),
            output_dir: other.output_dir.or(self.output_dir),
            byte_order: other.byte_order.or(self.byte_order),
            on_collision: other.on_collision.or(self.on_collision),
        }
    }

    /// Selected sample rate, or the first candidate if unset or out of range
    pub fn sample_rate_or_default(&self) -> SampleRate {
        self.sample_rate_index
            .and_then(SampleRate::from_index)
            .unwrap_or_default()
    }

    /// Configured output directory, or the platform music directory
    pub fn output_dir_or_default(&self) -> PathBuf {
        self.output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_music_dir)
    }

    pub fn byte_order_or_default(&self) -> ByteOrder {
        self.byte_order
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn collision_policy_or_default(&self) -> CollisionPolicy {
        self.on_collision
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Check every set field, naming the first bad key
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: String| ConfigError::ValidationError {
            key: key.to_string(),
            message,
        };

        if let Some(index) = self.sample_rate_index {
            if SampleRate::from_index(index).is_none() {
                return Err(invalid(
                    "sample_rate_index",
                    format!(
                        "{} is out of range 0 to {}",
                        index,
                        SUPPORTED_SAMPLE_RATES.len() - 1
                    ),
                ));
            }
        }
        if self.output_dir.as_deref().is_some_and(|dir| dir.trim().is_empty()) {
            return Err(invalid("output_dir", "Value must not be empty".to_string()));
        }
        if let Some(order) = &self.byte_order {
            order
                .parse::<ByteOrder>()
                .map_err(|e| invalid("byte_order", e.to_string()))?;
        }
        if let Some(policy) = &self.on_collision {
            policy
                .parse::<CollisionPolicy>()
                .map_err(|e| invalid("on_collision", e.to_string()))?;
        }
        Ok(())
    }
}

/// `dirs::audio_dir()`, falling back to `~/Music`
pub fn default_music_dir() -> PathBuf {
    dirs::audio_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Music")))
        .unwrap_or_else(|| PathBuf::from("Music"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.sample_rate_index, Some(0));
        assert!(config.output_dir.is_none());
        assert_eq!(config.byte_order, Some("big".to_string()));
        assert_eq!(config.on_collision, Some("uniquify".to_string()));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.sample_rate_index.is_none());
        assert!(config.output_dir.is_none());
        assert!(config.byte_order.is_none());
        assert!(config.on_collision.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            sample_rate_index: Some(1),
            output_dir: Some("/base".to_string()),
            ..Default::default()
        };
        let other = AppConfig {
            sample_rate_index: Some(3),
            output_dir: None,
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.sample_rate_index, Some(3));
        assert_eq!(merged.output_dir, Some("/base".to_string()));
    }

    #[test]
    fn sample_rate_from_index() {
        let config = AppConfig {
            sample_rate_index: Some(2),
            ..Default::default()
        };
        assert_eq!(config.sample_rate_or_default().hz(), 88_200);
    }

    #[test]
    fn sample_rate_out_of_range_uses_default() {
        let config = AppConfig {
            sample_rate_index: Some(9),
            ..Default::default()
        };
        assert_eq!(config.sample_rate_or_default().hz(), 44_100);
        assert_eq!(AppConfig::empty().sample_rate_or_default().hz(), 44_100);
    }

    #[test]
    fn output_dir_configured() {
        let config = AppConfig {
            output_dir: Some("/tmp/captures".to_string()),
            ..Default::default()
        };
        assert_eq!(config.output_dir_or_default(), PathBuf::from("/tmp/captures"));
    }

    #[test]
    fn invalid_choices_fall_back() {
        let config = AppConfig {
            byte_order: Some("sideways".to_string()),
            on_collision: Some("ask".to_string()),
            ..Default::default()
        };
        assert_eq!(config.byte_order_or_default(), ByteOrder::Big);
        assert_eq!(config.collision_policy_or_default(), CollisionPolicy::Uniquify);
    }

    #[test]
    fn parsed_choices() {
        let config = AppConfig {
            byte_order: Some("little".to_string()),
            on_collision: Some("fail".to_string()),
            ..Default::default()
        };
        assert_eq!(config.byte_order_or_default(), ByteOrder::Little);
        assert_eq!(config.collision_policy_or_default(), CollisionPolicy::Fail);
    }

    #[test]
    fn validate_accepts_defaults_and_empty() {
        assert!(AppConfig::defaults().validate().is_ok());
        assert!(AppConfig::empty().validate().is_ok());
    }

    #[test]
    fn validate_names_the_bad_key() {
        let cases = [
            AppConfig {
                sample_rate_index: Some(4),
                ..Default::default()
            },
            AppConfig {
                output_dir: Some(" ".to_string()),
                ..Default::default()
            },
            AppConfig {
                byte_order: Some("sideways".to_string()),
                ..Default::default()
            },
            AppConfig {
                on_collision: Some("ask".to_string()),
                ..Default::default()
            },
        ];
        let keys = ["sample_rate_index", "output_dir", "byte_order", "on_collision"];

        for (config, expected) in cases.iter().zip(keys) {
            match config.validate() {
                Err(ConfigError::ValidationError { key, .. }) => assert_eq!(key, expected),
                other => panic!("expected {} to be rejected, got {:?}", expected, other),
            }
        }
    }
}
