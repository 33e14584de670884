//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, CollisionPolicy};
use crate::domain::error::ConfigError;
use crate::domain::recording::{ByteOrder, SampleRate, SUPPORTED_SAMPLE_RATES};

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    presenter.output(
        &config_value(&config, key).unwrap_or_else(|| NOT_SET.to_string()),
    );

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = config_value(&config, key).unwrap_or_else(|| NOT_SET.to_string());
        let value = match (*key, config.sample_rate_index.and_then(SampleRate::from_index)) {
            ("sample_rate_index", Some(rate)) => format!("{} ({})", value, rate),
            _ => value,
        };
        presenter.key_value(key, &value);
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

fn invalid(key: &str, message: impl ToString) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// Validate `value` for `key` and store its normalized form
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "sample_rate_index" => {
            let index = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&i| SampleRate::from_index(i).is_some())
                .ok_or_else(|| {
                    invalid(
                        key,
                        format!(
                            "Value must be an index from 0 to {} ({})",
                            SUPPORTED_SAMPLE_RATES.len() - 1,
                            SampleRate::all()
                                .map(|r| format!("{}={}", r.index(), r.hz()))
                                .collect::<Vec<_>>()
                                .join(", ")
                        ),
                    )
                })?;
            config.sample_rate_index = Some(index);
        }
        "output_dir" => {
            let dir = value.trim();
            if dir.is_empty() {
                return Err(invalid(key, "Value must not be empty"));
            }
            config.output_dir = Some(dir.to_string());
        }
        "byte_order" => {
            let order = value.parse::<ByteOrder>().map_err(|e| invalid(key, e))?;
            config.byte_order = Some(order.to_string());
        }
        "on_collision" => {
            let policy = value
                .parse::<CollisionPolicy>()
                .map_err(|e| invalid(key, e))?;
            config.on_collision = Some(policy.to_string());
        }
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

fn config_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "sample_rate_index" => config.sample_rate_index.map(|i| i.to_string()),
        "output_dir" => config.output_dir.clone(),
        "byte_order" => config.byte_order.clone(),
        "on_collision" => config.on_collision.clone(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_rate_index_in_range() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "sample_rate_index", "2").unwrap();
        assert_eq!(config.sample_rate_index, Some(2));
    }

    #[test]
    fn sample_rate_index_out_of_range() {
        let mut config = AppConfig::empty();
        let err = apply_value(&mut config, "sample_rate_index", "4").unwrap_err();
        assert!(err.to_string().contains("0 to 3"));
        assert!(apply_value(&mut config, "sample_rate_index", "-1").is_err());
        assert!(apply_value(&mut config, "sample_rate_index", "48000").is_err());
        assert_eq!(config.sample_rate_index, None);
    }

    #[test]
    fn byte_order_is_normalized() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "byte_order", "LE").unwrap();
        assert_eq!(config.byte_order.as_deref(), Some("little"));
        assert!(apply_value(&mut config, "byte_order", "middle").is_err());
    }

    #[test]
    fn collision_policy_values() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "on_collision", "overwrite").unwrap();
        assert_eq!(config.on_collision.as_deref(), Some("overwrite"));
        assert!(apply_value(&mut config, "on_collision", "append").is_err());
    }

    #[test]
    fn output_dir_must_not_be_blank() {
        let mut config = AppConfig::empty();
        assert!(apply_value(&mut config, "output_dir", "  ").is_err());
        apply_value(&mut config, "output_dir", "/tmp/takes").unwrap();
        assert_eq!(config_value(&config, "output_dir").as_deref(), Some("/tmp/takes"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = check_key("api_key").unwrap_err();
        assert!(err.to_string().contains("sample_rate_index"));
    }
}
