//! Core data model for Ezyr
//!
//! Token and credential shapes shared by the auth layer, the block
//! dispatcher, and the HTTP handlers. Field names follow the wire format the
//! front-end already speaks.

use crate::constants::TOKEN_EXPIRY_BUFFER_MS;
use serde::{Deserialize, Serialize};

/// An OAuth2 token set as stored and returned to clients.
///
/// Replaced wholesale on refresh; there are no partial updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenData {
    pub access_token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Expiry as epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,

    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenData {
    /// Token carrying only an access token, as assembled from request parts.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        TokenData {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
            token_type: default_token_type(),
        }
    }

    /// Whether the token is expired or about to expire at `now_ms`.
    ///
    /// A token within five minutes of its expiry counts as expired. A token
    /// without an expiry never does: without a timestamp there is nothing to
    /// compare against, and the upstream API is the final arbiter anyway.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => now_ms > expires_at - TOKEN_EXPIRY_BUFFER_MS,
            None => false,
        }
    }

    /// [`is_expired_at`](Self::is_expired_at) against the current clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp_millis())
    }
}

/// Third-party credentials accompanying a block execution.
///
/// Front-ends send these under snake_case or camelCase names depending on
/// which integration produced them; the aliases accept both so downstream
/// code only ever sees one shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default, alias = "clientId")]
    pub client_id: Option<String>,

    #[serde(default, alias = "clientSecret", alias = "secretId")]
    pub client_secret: Option<String>,

    #[serde(default, alias = "accessToken")]
    pub access_token: Option<String>,

    #[serde(default, alias = "apiKey")]
    pub api_key: Option<String>,

    #[serde(default, alias = "spreadsheetId")]
    pub spreadsheet_id: Option<String>,
}

/// One spreadsheet row as returned by the direct entries endpoints.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntryRecord {
    pub id: usize,
    pub fields: EntryFields,
}

/// The fixed two-column layout of the entries sheet.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntryFields {
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn token_far_from_expiry_is_not_expired() {
        let mut token = TokenData::bearer("abc");
        token.expires_at = Some(NOW + 10 * 60 * 1000);
        assert!(!token.is_expired_at(NOW));
    }

    #[test]
    fn token_inside_buffer_window_is_expired() {
        let mut token = TokenData::bearer("abc");
        token.expires_at = Some(NOW + 4 * 60 * 1000);
        assert!(token.is_expired_at(NOW));
    }

    #[test]
    fn token_past_expiry_is_expired() {
        let mut token = TokenData::bearer("abc");
        token.expires_at = Some(NOW - 1);
        assert!(token.is_expired_at(NOW));
    }

    #[test]
    fn token_without_expiry_is_never_expired() {
        let token = TokenData::bearer("abc");
        assert!(!token.is_expired_at(NOW));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        // Exactly at expires_at - buffer the token is still considered live.
        let mut token = TokenData::bearer("abc");
        token.expires_at = Some(NOW + TOKEN_EXPIRY_BUFFER_MS);
        assert!(!token.is_expired_at(NOW));
        assert!(token.is_expired_at(NOW + 1));
    }

    #[test]
    fn credentials_accept_camel_case_aliases() {
        let creds: Credentials = serde_json::from_value(serde_json::json!({
            "clientId": "id-1",
            "secretId": "sec-1",
            "accessToken": "tok-1",
            "apiKey": "key-1",
            "spreadsheetId": "sheet-1",
        }))
        .unwrap();

        assert_eq!(creds.client_id.as_deref(), Some("id-1"));
        assert_eq!(creds.client_secret.as_deref(), Some("sec-1"));
        assert_eq!(creds.access_token.as_deref(), Some("tok-1"));
        assert_eq!(creds.api_key.as_deref(), Some("key-1"));
        assert_eq!(creds.spreadsheet_id.as_deref(), Some("sheet-1"));
    }

    #[test]
    fn credentials_accept_snake_case_names() {
        let creds: Credentials = serde_json::from_value(serde_json::json!({
            "client_id": "id-2",
            "client_secret": "sec-2",
            "access_token": "tok-2",
        }))
        .unwrap();

        assert_eq!(creds.client_id.as_deref(), Some("id-2"));
        assert_eq!(creds.client_secret.as_deref(), Some("sec-2"));
        assert_eq!(creds.access_token.as_deref(), Some("tok-2"));
        assert!(creds.api_key.is_none());
    }

    #[test]
    fn token_serializes_without_absent_fields() {
        let token = TokenData::bearer("abc");
        let json = serde_json::to_value(&token).unwrap();
        assert!(json.get("refresh_token").is_none());
        assert!(json.get("expires_at").is_none());
        assert_eq!(json["token_type"], "Bearer");
    }
}
