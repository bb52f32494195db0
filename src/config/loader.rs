//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::Config;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.client.url.parse::<url::Url>().is_err() {
        return Err(ConfigError::Validation(format!(
            "invalid wallet URL: {}",
            config.client.url
        )));
    }
    if config.client.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be nonzero".to_string(),
        ));
    }
    if config.load.confirm_attempts == 0 {
        return Err(ConfigError::Validation(
            "confirm_attempts must be nonzero".to_string(),
        ));
    }
    Ok(())
}
