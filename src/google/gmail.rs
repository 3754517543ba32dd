//! Gmail API v1 client
//!
//! Search support only: a message list followed by per-message metadata
//! fetches, flattened into the record shape the front-end tables render.

use super::GoogleClient;
use crate::constants::{GMAIL_MAX_RESULTS, GMAIL_METADATA_HEADERS};
use crate::Result;
use futures::future::try_join_all;
use serde_json::{Map, Value, json};

pub struct GmailApi {
    client: GoogleClient,
    base_url: String,
}

impl GmailApi {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client: GoogleClient::new(http, access_token),
            base_url: base_url.into(),
        }
    }

    /// Search messages, returning `{id, fields: {From, Subject, Date,
    /// Snippet}}` records for up to the first ten matches.
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<Value>> {
        let url = format!("{}/gmail/v1/users/me/messages", self.base_url);

        let mut params = vec![("maxResults", GMAIL_MAX_RESULTS.to_string())];
        if let Some(q) = query {
            params.push(("q", q.to_string()));
        }

        let response = self.client.get(&url, &params).await?;
        let ids: Vec<String> = response
            .get("messages")
            .and_then(Value::as_array)
            .map(|messages| {
                messages
                    .iter()
                    .filter_map(|m| m.get("id").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!("Gmail search matched {} messages", ids.len());

        // Fetch all metadata concurrently; one failure fails the search.
        try_join_all(ids.iter().map(|id| self.message_record(id))).await
    }

    /// Fetch a single message's metadata and flatten it into a record.
    async fn message_record(&self, id: &str) -> Result<Value> {
        let url = format!("{}/gmail/v1/users/me/messages/{}", self.base_url, id);

        let mut params = vec![("format", "metadata".to_string())];
        for name in GMAIL_METADATA_HEADERS {
            params.push(("metadataHeaders", name.to_string()));
        }

        let message = self.client.get(&url, &params).await?;

        let mut fields = Map::new();
        if let Some(headers) = message
            .pointer("/payload/headers")
            .and_then(Value::as_array)
        {
            for header in headers {
                if let (Some(name), Some(value)) = (
                    header.get("name").and_then(Value::as_str),
                    header.get("value").and_then(Value::as_str),
                ) && GMAIL_METADATA_HEADERS.contains(&name)
                {
                    fields.insert(name.to_string(), Value::String(value.to_string()));
                }
            }
        }
        fields.insert(
            "Snippet".to_string(),
            message.get("snippet").cloned().unwrap_or(Value::Null),
        );

        Ok(json!({ "id": id, "fields": fields }))
    }
}
