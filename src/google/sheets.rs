//! Google Sheets API v4 client
//!
//! Covers the four row operations the gateway exposes: append, read,
//! in-place update, and row deletion. Row indices arriving from the
//! front-end are zero-based; ranges use the one-based A1 notation, hence
//! the +1 adjustments.

use super::GoogleClient;
use crate::constants::SHEET_APPEND_RANGE;
use crate::Result;
use serde_json::{Value, json};

pub struct SheetsApi {
    client: GoogleClient,
    base_url: String,
}

impl SheetsApi {
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

    /// Append one row after the current data region.
    pub async fn append_row(&self, spreadsheet_id: &str, values: &[Value]) -> Result<Value> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}:append",
            self.base_url, spreadsheet_id, SHEET_APPEND_RANGE
        );
        self.client
            .post(
                &url,
                &[("valueInputOption", "RAW".to_string())],
                &json!({ "values": [values] }),
            )
            .await
    }

    /// Read a range, returning the raw row grid (absent trailing cells are
    /// simply missing, as the API returns them).
    pub async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<Value>>> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url, spreadsheet_id, range
        );
        let response = self.client.get(&url, &[]).await?;

        let rows = response
            .get("values")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .map(|row| row.as_array().cloned().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();

        Ok(rows)
    }

    /// Overwrite the row at `row_index` (zero-based) starting at column A.
    pub async fn update_row(
        &self,
        spreadsheet_id: &str,
        row_index: u64,
        values: &[Value],
    ) -> Result<Value> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/Sheet1!A{}",
            self.base_url,
            spreadsheet_id,
            row_index + 1
        );
        self.client
            .put(
                &url,
                &[("valueInputOption", "RAW".to_string())],
                &json!({ "values": [values] }),
            )
            .await
    }

    /// Delete the row at `row_index` (zero-based) from the first sheet.
    pub async fn delete_row(&self, spreadsheet_id: &str, row_index: u64) -> Result<Value> {
        let url = format!(
            "{}/v4/spreadsheets/{}:batchUpdate",
            self.base_url, spreadsheet_id
        );
        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": 0,
                        "dimension": "ROWS",
                        "startIndex": row_index,
                        "endIndex": row_index + 1,
                    }
                }
            }]
        });
        self.client.post(&url, &[], &body).await
    }
}
