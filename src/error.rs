//! Error types for taskboard
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors that are part of the API;
//! the binary converts them to `anyhow` at the boundary.

use crate::auth::gate::DenyReason;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Access denied: {0}")]
    AccessDenied(#[from] AccessDeniedError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },
}

/// Dashboard REST API errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized: invalid or expired token")]
    Unauthorized,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Invalid response from API: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Create an appropriate error from an HTTP status code and response body
    ///
    /// The backend reports failures as `{"message": "..."}`; that text is
    /// preferred over the raw body when present.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = backend_message(body);
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden {
                message: message.unwrap_or_else(|| "insufficient permissions".into()),
            },
            404 => ApiError::NotFound {
                resource: message.unwrap_or_else(|| "requested resource".into()),
            },
            429 => ApiError::RateLimited { retry_after: 60 },
            _ => ApiError::Api {
                status,
                message: message.unwrap_or_else(|| {
                    if body.is_empty() {
                        format!("HTTP {}", status)
                    } else {
                        body.to_string()
                    }
                }),
            },
        }
    }

    /// HTTP status carried by this error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
            ApiError::Api { status, .. } => Some(*status),
            ApiError::RateLimited { .. } => Some(429),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::InvalidResponse(_) => None,
        }
    }
}

fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Session and local state file errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode local state: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{path} is not valid local state ({source}); remove it or run 'taskboard logout'")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Session store lock poisoned")]
    Poisoned,
}

/// Why a token could not be verified
///
/// Every variant maps to a denied navigation plus credential clearing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("verification endpoint unreachable: {0}")]
    Transport(String),

    #[error("verification rejected with HTTP {status}")]
    Rejected { status: u16 },

    #[error("malformed verification response: {0}")]
    Malformed(String),
}

impl From<ApiError> for VerifyError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Request(e) => match e.status() {
                Some(status) => VerifyError::Rejected {
                    status: status.as_u16(),
                },
                None => VerifyError::Transport(e.to_string()),
            },
            ApiError::InvalidResponse(msg) => VerifyError::Malformed(msg),
            other => VerifyError::Rejected {
                status: other.status().unwrap_or(500),
            },
        }
    }
}

/// Client-side input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be a positive number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} {value} already exists")]
    Duplicate { field: &'static str, value: u32 },

    #[error("invalid email format: '{0}'")]
    InvalidEmail(String),

    #[error("invalid deadline '{0}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDeadline(String),
}

/// A navigation the gate refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct AccessDeniedError {
    pub reason: DenyReason,
}

impl AccessDeniedError {
    pub fn new(reason: DenyReason) -> Self {
        Self { reason }
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for API operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_response() {
        assert!(matches!(
            ApiError::from_response(401, ""),
            ApiError::Unauthorized
        ));

        assert!(matches!(
            ApiError::from_response(403, ""),
            ApiError::Forbidden { .. }
        ));

        assert!(matches!(
            ApiError::from_response(404, ""),
            ApiError::NotFound { .. }
        ));

        assert!(matches!(
            ApiError::from_response(429, ""),
            ApiError::RateLimited { .. }
        ));

        let api_err = ApiError::from_response(500, "Internal server error");
        assert!(matches!(api_err, ApiError::Api { status: 500, .. }));
    }

    #[test]
    fn test_backend_message_preferred() {
        let err = ApiError::from_response(400, r#"{"message":"Email sudah terdaftar"}"#);
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Email sudah terdaftar");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_verify_error_from_api_error() {
        assert_eq!(
            VerifyError::from(ApiError::Unauthorized),
            VerifyError::Rejected { status: 401 }
        );
        assert_eq!(
            VerifyError::from(ApiError::Api {
                status: 502,
                message: "bad gateway".into()
            }),
            VerifyError::Rejected { status: 502 }
        );
        assert!(matches!(
            VerifyError::from(ApiError::InvalidResponse("not json".into())),
            VerifyError::Malformed(_)
        ));
    }
}
