//! Configuration types for taskboard
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Dashboard backend connection settings
    pub api: ApiConfig,

    /// Token verification settings
    pub auth: AuthConfig,

    /// Local state files
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Dashboard backend connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL (e.g., `https://api.example.com`)
    pub url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum retries for failed requests (verification never retries)
    pub max_retries: u32,

    /// Whether to verify SSL certificates
    pub verify_ssl: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),
            timeout_secs: 30,
            max_retries: 3,
            verify_ssl: true,
        }
    }
}

impl ApiConfig {
    /// Base URL without a trailing slash
    pub fn base_url(&self) -> String {
        self.url.trim_end_matches('/').to_string()
    }
}

/// Token verification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Path of the token check endpoint, relative to `api.url`
    pub verify_path: String,

    /// HTTP method used for the token check
    pub verify_method: VerifyMethod,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            verify_path: "/user/auth/check_token".to_string(),
            verify_method: VerifyMethod::Post,
        }
    }
}

/// HTTP method of the verification endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyMethod {
    /// POST with an empty JSON body
    #[default]
    Post,
    /// Plain GET
    Get,
}

/// Locations of local state files
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Session file holding the token and cached role
    pub session_path: Option<String>,

    /// File holding the local "done" marks
    pub assignments_path: Option<String>,
}

impl StorageConfig {
    /// Resolved session file path
    pub fn session_file(&self) -> PathBuf {
        resolve(self.session_path.as_deref(), "session.json")
    }

    /// Resolved assignments file path
    pub fn assignments_file(&self) -> PathBuf {
        resolve(self.assignments_path.as_deref(), "assignments.json")
    }
}

fn resolve(configured: Option<&str>, file_name: &str) -> PathBuf {
    match configured {
        Some(path) => PathBuf::from(shellexpand::tilde(path).as_ref()),
        None => dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("taskboard")
            .join(file_name),
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_base_url() {
        let config = ApiConfig {
            url: "https://api.example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://api.example.com");
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.auth.verify_path, "/user/auth/check_token");
        assert_eq!(config.auth.verify_method, VerifyMethod::Post);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_deserialize_verify_method() {
        let method: VerifyMethod = serde_json::from_str(r#""get""#).unwrap();
        assert_eq!(method, VerifyMethod::Get);

        let method: VerifyMethod = serde_json::from_str(r#""post""#).unwrap();
        assert_eq!(method, VerifyMethod::Post);
    }

    #[test]
    fn test_storage_paths() {
        let storage = StorageConfig {
            session_path: Some("/tmp/tb/session.json".to_string()),
            assignments_path: None,
        };
        assert_eq!(storage.session_file(), PathBuf::from("/tmp/tb/session.json"));
        assert!(storage.assignments_file().ends_with("taskboard/assignments.json"));
    }
}
