//! Direct per-service endpoints: Sheets row CRUD and Gmail search
//!
//! All routes here sit behind the token middleware and receive the validated
//! token via [`AuthorizedContext`]. Each wraps a single `google` API call and
//! translates an upstream 401/403 into a 401 with `requiresReauth` so the
//! front-end restarts the OAuth flow instead of retrying.

use super::{AppError, AppState};
use crate::auth::AuthorizedContext;
use crate::constants::ENTRIES_RANGE;
use crate::google::{GmailApi, SheetsApi};
use crate::model::{EntryFields, EntryRecord};
use crate::EzyrError;
use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub struct AddEntryRequest {
    pub values: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    pub row_index: Option<u64>,
    pub values: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntryRequest {
    pub row_index: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct GmailSearchRequest {
    pub query: Option<String>,
}

/// Map upstream auth rejections to a reauth demand, everything else through.
fn map_upstream_auth(err: EzyrError, fallback: &str) -> EzyrError {
    if err.is_upstream_auth_failure() {
        EzyrError::reauth("Authentication failed")
    } else if matches!(err, EzyrError::Upstream { .. } | EzyrError::Network(_)) {
        EzyrError::Upstream {
            status: None,
            message: fallback.to_string(),
        }
    } else {
        err
    }
}

fn sheets(state: &AppState, auth: &AuthorizedContext) -> Result<(SheetsApi, String), EzyrError> {
    let spreadsheet_id = state
        .config
        .spreadsheet_id
        .clone()
        .ok_or_else(|| EzyrError::config("Spreadsheet id is not configured"))?;
    let api = SheetsApi::new(
        state.http.clone(),
        state.config.sheets_base_url.clone(),
        auth.token.access_token.clone(),
    );
    Ok((api, spreadsheet_id))
}

/// POST /add-entry: append one row.
pub async fn add_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthorizedContext>,
    Json(req): Json<AddEntryRequest>,
) -> Result<Json<Value>, AppError> {
    let Some(values) = req.values else {
        return Err(EzyrError::missing_input("Missing values").into());
    };

    let (api, spreadsheet_id) = sheets(&state, &auth)?;
    api.append_row(&spreadsheet_id, &values)
        .await
        .map_err(|e| map_upstream_auth(e, "Error adding entry"))?;

    Ok(Json(json!({ "status": "success" })))
}

/// GET /get-entries: all non-blank rows as name/email records.
pub async fn get_entries(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthorizedContext>,
) -> Result<Json<Value>, AppError> {
    let (api, spreadsheet_id) = sheets(&state, &auth)?;
    let rows = api
        .get_values(&spreadsheet_id, ENTRIES_RANGE)
        .await
        .map_err(|e| map_upstream_auth(e, "Failed to fetch entries"))?;

    let records: Vec<EntryRecord> = rows
        .iter()
        .filter(|row| {
            row.first()
                .and_then(Value::as_str)
                .is_some_and(|cell| !cell.trim().is_empty())
        })
        .enumerate()
        .map(|(id, row)| EntryRecord {
            id,
            fields: EntryFields {
                name: cell_string(row, 0),
                email: cell_string(row, 1),
            },
        })
        .collect();

    Ok(Json(json!({ "data": records })))
}

/// PUT /update-entry: overwrite one row in place.
pub async fn update_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthorizedContext>,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<Json<Value>, AppError> {
    let (Some(row_index), Some(values)) = (req.row_index, req.values) else {
        return Err(EzyrError::missing_input("Missing data").into());
    };

    let (api, spreadsheet_id) = sheets(&state, &auth)?;
    api.update_row(&spreadsheet_id, row_index, &values)
        .await
        .map_err(|e| map_upstream_auth(e, "Error updating entry"))?;

    Ok(Json(json!({ "status": "updated" })))
}

/// DELETE /delete-entry: remove one row.
pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthorizedContext>,
    Json(req): Json<DeleteEntryRequest>,
) -> Result<Json<Value>, AppError> {
    let Some(row_index) = req.row_index else {
        return Err(EzyrError::missing_input("Missing rowIndex").into());
    };

    let (api, spreadsheet_id) = sheets(&state, &auth)?;
    api.delete_row(&spreadsheet_id, row_index)
        .await
        .map_err(|e| map_upstream_auth(e, "Error deleting entry"))?;

    Ok(Json(json!({ "status": "deleted" })))
}

/// POST /gmail/search: search messages, returning flattened records.
pub async fn gmail_search(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthorizedContext>,
    Json(req): Json<GmailSearchRequest>,
) -> Result<Json<Value>, AppError> {
    let Some(query) = req.query.as_deref().filter(|q| !q.is_empty()) else {
        return Err(EzyrError::missing_input("Search query missing").into());
    };

    let api = GmailApi::new(
        state.http.clone(),
        state.config.gmail_base_url.clone(),
        auth.token.access_token.clone(),
    );
    let records = api
        .search(Some(query))
        .await
        .map_err(|e| map_upstream_auth(e, "Error searching emails"))?;

    Ok(Json(json!({ "records": records })))
}

fn cell_string(row: &[Value], index: usize) -> String {
    row.get(index)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
