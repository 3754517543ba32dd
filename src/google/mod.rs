//! Google API REST clients
//!
//! One authenticated JSON client plus thin per-service facades. Both the
//! imperative block handlers and the direct entry endpoints go through these
//! facades, so the third-party call logic exists exactly once.

pub mod gmail;
pub mod sheets;

pub use gmail::GmailApi;
pub use sheets::SheetsApi;

use crate::{EzyrError, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

/// Google API HTTP client with bearer-token injection.
pub struct GoogleClient {
    http: Client,
    access_token: String,
}

impl GoogleClient {
    /// Create a client around a shared reqwest client and an access token.
    pub fn new(http: Client, access_token: impl Into<String>) -> Self {
        Self {
            http,
            access_token: access_token.into(),
        }
    }

    /// Authenticated GET request
    pub async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        let builder = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(&self.access_token);
        self.execute(builder).await
    }

    /// Authenticated POST request with JSON body
    pub async fn post(&self, url: &str, query: &[(&str, String)], body: &Value) -> Result<Value> {
        let builder = self
            .http
            .post(url)
            .query(query)
            .bearer_auth(&self.access_token)
            .json(body);
        self.execute(builder).await
    }

    /// Authenticated PUT request with JSON body
    pub async fn put(&self, url: &str, query: &[(&str, String)], body: &Value) -> Result<Value> {
        let builder = self
            .http
            .put(url)
            .query(query)
            .bearer_auth(&self.access_token)
            .json(body);
        self.execute(builder).await
    }

    /// Execute a request and handle Google API response patterns.
    async fn execute(&self, builder: RequestBuilder) -> Result<Value> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, "Google API response");

        // Empty successful responses (e.g. some batch operations)
        if status.is_success() && body.is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        if !status.is_success() {
            let message = extract_error_message(&body, status);
            tracing::error!("Google API error: {}", message);
            return Err(EzyrError::upstream(status.as_u16(), message));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Extract the message from a Google API error body.
///
/// Google APIs wrap failures as `{"error": {"code": .., "message": ..}}`;
/// anything else falls back to the HTTP status.
fn extract_error_message(body: &str, status: StatusCode) -> String {
    if let Ok(parsed) = serde_json::from_str::<Value>(body)
        && let Some(error_obj) = parsed.get("error")
        && let Some(message) = error_obj.get("message").and_then(Value::as_str)
    {
        let code = error_obj
            .get("code")
            .and_then(Value::as_i64)
            .unwrap_or(status.as_u16() as i64);
        return format!("Google API error {code}: {message}");
    }

    format!("HTTP {} error", status.as_u16())
}

#[cfg(test)]
mod google_test;
