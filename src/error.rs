//! Error types for Ezyr
//!
//! This module provides the error hierarchy using thiserror.
//! All errors can be converted to EzyrError for unified error handling;
//! the HTTP layer maps each variant onto the wire status and body shape.

use thiserror::Error;

/// Main error type for Ezyr operations
#[derive(Error, Debug)]
pub enum EzyrError {
    /// A required request input is absent or empty (400)
    #[error("{0}")]
    MissingInput(String),

    /// Authentication failed; `requires_reauth` asks the client to restart
    /// the OAuth flow (401)
    #[error("{message}")]
    Auth {
        message: String,
        requires_reauth: bool,
    },

    /// Unknown block or operation (kept at 400 for front-end compatibility)
    #[error("{0}")]
    NotFound(String),

    /// A third-party API call completed with a non-success status (500,
    /// except direct endpoints which remap 401/403 upstream statuses)
    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// OAuth code exchange or refresh grant failed; `details` carries the
    /// provider's message through to the response body
    #[error("{message}")]
    OAuth {
        message: String,
        details: Option<String>,
        requires_reauth: bool,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient result type for Ezyr operations
pub type Result<T> = std::result::Result<T, EzyrError>;

impl EzyrError {
    /// Create a missing-input error
    #[inline]
    pub fn missing_input<S: Into<String>>(msg: S) -> Self {
        EzyrError::MissingInput(msg.into())
    }

    /// Create an auth error without the reauth flag
    #[inline]
    pub fn auth<S: Into<String>>(msg: S) -> Self {
        EzyrError::Auth {
            message: msg.into(),
            requires_reauth: false,
        }
    }

    /// Create an auth error asking the client to re-authorize
    #[inline]
    pub fn reauth<S: Into<String>>(msg: S) -> Self {
        EzyrError::Auth {
            message: msg.into(),
            requires_reauth: true,
        }
    }

    /// Create a not-found error
    #[inline]
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        EzyrError::NotFound(msg.into())
    }

    /// Create an upstream error carrying the third-party status code
    #[inline]
    pub fn upstream<S: Into<String>>(status: u16, msg: S) -> Self {
        EzyrError::Upstream {
            status: Some(status),
            message: msg.into(),
        }
    }

    /// Create a config error
    #[inline]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        EzyrError::Config(msg.into())
    }

    /// True when the upstream status indicates the access token was rejected
    pub fn is_upstream_auth_failure(&self) -> bool {
        matches!(
            self,
            EzyrError::Upstream {
                status: Some(401) | Some(403),
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_auth_failure_detection() {
        assert!(EzyrError::upstream(401, "unauthorized").is_upstream_auth_failure());
        assert!(EzyrError::upstream(403, "forbidden").is_upstream_auth_failure());
        assert!(!EzyrError::upstream(500, "boom").is_upstream_auth_failure());
        assert!(!EzyrError::missing_input("values").is_upstream_auth_failure());
    }

    #[test]
    fn display_passes_message_through() {
        let err = EzyrError::reauth("Token refresh failed");
        assert_eq!(err.to_string(), "Token refresh failed");
    }
}
