//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (TASKBOARD__*, then API_URL)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "taskboard.toml",
    ".taskboard.toml",
    "~/.config/taskboard/config.toml",
    "/etc/taskboard/config.toml",
];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // First existing default path wins
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // e.g., TASKBOARD__API__URL, TASKBOARD__AUTH__VERIFY_METHOD
    builder = builder.add_source(
        Environment::with_prefix("TASKBOARD")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    // API_URL is the backend's own convention; only used when the prefixed
    // variable is absent
    if std::env::var("TASKBOARD__API__URL").is_err()
        && let Ok(url) = std::env::var("API_URL")
    {
        builder = builder
            .set_override("api.url", url)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.api.url.is_empty() {
        return Err(ConfigError::Missing {
            field: "api.url (set API_URL environment variable)".to_string(),
        });
    }

    if !config.api.url.starts_with("http://") && !config.api.url.starts_with("https://") {
        return Err(ConfigError::Invalid {
            message: format!(
                "api.url must start with http:// or https://, got: {}",
                config.api.url
            ),
        });
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            message: "api.timeout_secs must be greater than 0".to_string(),
        });
    }

    if !config.auth.verify_path.starts_with('/') {
        return Err(ConfigError::Invalid {
            message: format!(
                "auth.verify_path must start with '/', got: {}",
                config.auth.verify_path
            ),
        });
    }

    Ok(())
}
