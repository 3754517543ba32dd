//! Configuration management for Ezyr
//!
//! All configuration is read once at startup from the environment (after an
//! optional `.env` load in main); there is no hot reload. Upstream endpoints
//! are overridable so tests can point the gateway at a local mock server.

use crate::constants::*;
use crate::{EzyrError, Result};
use std::env;

/// Complete Ezyr configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Google OAuth client id used for refreshes the middleware performs
    pub client_id: Option<String>,

    /// Google OAuth client secret
    pub client_secret: Option<String>,

    /// Spreadsheet the direct entry endpoints operate on
    pub spreadsheet_id: Option<String>,

    /// OAuth 2.0 authorization endpoint
    pub auth_url: String,

    /// OAuth 2.0 token endpoint
    pub token_url: String,

    /// Google Sheets API base URL
    pub sheets_base_url: String,

    /// Gmail API base URL
    pub gmail_base_url: String,

    /// Airtable API base URL (used by the declarative airtable block)
    pub airtable_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            client_id: None,
            client_secret: None,
            spreadsheet_id: None,
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            sheets_base_url: SHEETS_API_BASE.to_string(),
            gmail_base_url: GMAIL_API_BASE.to_string(),
            airtable_base_url: AIRTABLE_API_BASE.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Split out from [`from_env`](Self::from_env) so tests can supply a
    /// deterministic map instead of mutating process-global state.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = AppConfig::default();
        let nonempty = |name: &str| get(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match nonempty(ENV_PORT) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| EzyrError::config(format!("Invalid {ENV_PORT}: {raw}")))?,
            None => defaults.port,
        };

        Ok(AppConfig {
            host: nonempty(ENV_HOST).unwrap_or(defaults.host),
            port,
            client_id: nonempty(ENV_CLIENT_ID),
            client_secret: nonempty(ENV_CLIENT_SECRET),
            spreadsheet_id: nonempty(ENV_SPREADSHEET_ID),
            auth_url: defaults.auth_url,
            token_url: nonempty(ENV_TOKEN_URL).unwrap_or(defaults.token_url),
            sheets_base_url: nonempty(ENV_SHEETS_BASE_URL).unwrap_or(defaults.sheets_base_url),
            gmail_base_url: nonempty(ENV_GMAIL_BASE_URL).unwrap_or(defaults.gmail_base_url),
            airtable_base_url: nonempty(ENV_AIRTABLE_BASE_URL).unwrap_or(defaults.airtable_base_url),
        })
    }
}

#[cfg(test)]
mod config_test;
