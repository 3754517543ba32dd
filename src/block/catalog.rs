//! Built-in block catalog
//!
//! Three integration targets ship with the gateway: Airtable record CRUD
//! (declarative REST templates), Gmail search, and Google Sheets row CRUD
//! (imperative handlers over the `google` API clients).

use super::operation::{
    BlockConfig, BlockHandler, BlockSettings, ExecutionContext, JsonMap, OperationSpec,
    RestTemplate,
};
use crate::constants::SHEET_FETCH_RANGE;
use crate::google::{GmailApi, SheetsApi};
use crate::model::Credentials;
use crate::utils::value_to_plain_string;
use crate::{EzyrError, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Arc;

/// Build the built-in block table.
pub fn builtin(airtable_base_url: &str) -> HashMap<&'static str, BlockConfig> {
    let mut blocks = HashMap::new();
    blocks.insert("airtable-crud", airtable_crud(airtable_base_url));
    blocks.insert("gmail_search_emails", gmail_search_emails());
    blocks.insert("google-sheets-crud", google_sheets_crud());
    blocks
}

// ============================================================================
// AIRTABLE (declarative)
// ============================================================================

fn input(params: &JsonMap, key: &str) -> String {
    params.get(key).map(value_to_plain_string).unwrap_or_default()
}

fn airtable_auth(credentials: &Credentials) -> Vec<(&'static str, String)> {
    let api_key = credentials.api_key.clone().unwrap_or_default();
    vec![("Authorization", format!("Bearer {api_key}"))]
}

fn airtable_auth_json(credentials: &Credentials) -> Vec<(&'static str, String)> {
    let mut headers = airtable_auth(credentials);
    headers.push(("Content-Type", "application/json".to_string()));
    headers
}

fn airtable_record_payload(params: &JsonMap) -> Value {
    json!({ "fields": params.get("dataFields").cloned().unwrap_or_else(|| json!({})) })
}

fn airtable_crud(base_url: &str) -> BlockConfig {
    let mut operations: HashMap<&'static str, OperationSpec> = HashMap::new();

    operations.insert(
        "fetch",
        OperationSpec::Rest(RestTemplate {
            service: "airtable",
            method: Method::GET,
            required_fields: &["baseId", "tableName"],
            response_field: Some("records"),
            build_url: |params, settings| {
                format!(
                    "{}/{}/{}",
                    settings.base_url,
                    input(params, "baseId"),
                    input(params, "tableName")
                )
            },
            build_headers: airtable_auth,
            build_payload: None,
            transform: None,
        }),
    );

    operations.insert(
        "create",
        OperationSpec::Rest(RestTemplate {
            service: "airtable",
            method: Method::POST,
            required_fields: &["baseId", "tableName"],
            response_field: None,
            build_url: |params, settings| {
                format!(
                    "{}/{}/{}",
                    settings.base_url,
                    input(params, "baseId"),
                    input(params, "tableName")
                )
            },
            build_headers: airtable_auth_json,
            build_payload: Some(airtable_record_payload),
            transform: None,
        }),
    );

    operations.insert(
        "update",
        OperationSpec::Rest(RestTemplate {
            service: "airtable",
            method: Method::PATCH,
            required_fields: &["baseId", "tableName", "recordId"],
            response_field: None,
            build_url: |params, settings| {
                format!(
                    "{}/{}/{}/{}",
                    settings.base_url,
                    input(params, "baseId"),
                    input(params, "tableName"),
                    input(params, "recordId")
                )
            },
            build_headers: airtable_auth_json,
            build_payload: Some(airtable_record_payload),
            transform: None,
        }),
    );

    operations.insert(
        "delete",
        OperationSpec::Rest(RestTemplate {
            service: "airtable",
            method: Method::DELETE,
            required_fields: &["baseId", "tableName", "recordId"],
            response_field: None,
            build_url: |params, settings| {
                format!(
                    "{}/{}/{}/{}",
                    settings.base_url,
                    input(params, "baseId"),
                    input(params, "tableName"),
                    input(params, "recordId")
                )
            },
            build_headers: airtable_auth,
            build_payload: None,
            transform: None,
        }),
    );

    BlockConfig {
        operations,
        settings: BlockSettings {
            base_url: base_url.to_string(),
        },
    }
}

// ============================================================================
// IMPERATIVE HANDLER SUPPORT
// ============================================================================

fn require_access_token(credentials: &Credentials) -> Result<&str> {
    credentials
        .access_token
        .as_deref()
        .ok_or_else(|| EzyrError::auth("Missing access token"))
}

fn require_spreadsheet_id<'a>(credentials: &'a Credentials, inputs: &'a JsonMap) -> Result<&'a str> {
    credentials
        .spreadsheet_id
        .as_deref()
        .or_else(|| inputs.get("spreadsheetId").and_then(Value::as_str))
        .ok_or_else(|| EzyrError::missing_input("Missing spreadsheetId"))
}

fn sheets_api(ctx: &ExecutionContext, credentials: &Credentials) -> Result<SheetsApi> {
    let access_token = require_access_token(credentials)?;
    Ok(SheetsApi::new(
        ctx.http.clone(),
        ctx.sheets_base_url.clone(),
        access_token,
    ))
}

/// Zero-based row index from the `recordId` input (number or numeric string).
fn parse_row_index(inputs: &JsonMap) -> Result<u64> {
    let parsed = match inputs.get("recordId") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| EzyrError::missing_input("Invalid or missing recordId"))
}

fn values_array(inputs: &JsonMap) -> Vec<Value> {
    inputs
        .get("valuesArray")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

// ============================================================================
// GMAIL (imperative)
// ============================================================================

struct GmailSearch;

#[async_trait]
impl BlockHandler for GmailSearch {
    async fn call(
        &self,
        ctx: &ExecutionContext,
        credentials: &Credentials,
        inputs: &JsonMap,
    ) -> Result<Value> {
        let access_token = require_access_token(credentials)?;
        let gmail = GmailApi::new(ctx.http.clone(), ctx.gmail_base_url.clone(), access_token);

        let query = inputs.get("query").and_then(Value::as_str);
        let records = gmail.search(query).await?;
        Ok(json!({ "records": records }))
    }
}

fn gmail_search_emails() -> BlockConfig {
    let mut operations: HashMap<&'static str, OperationSpec> = HashMap::new();
    operations.insert("fetch", OperationSpec::Handler(Arc::new(GmailSearch)));
    BlockConfig {
        operations,
        settings: BlockSettings::default(),
    }
}

// ============================================================================
// GOOGLE SHEETS (imperative)
// ============================================================================

struct SheetsFetch;
struct SheetsCreate;
struct SheetsUpdate;
struct SheetsDelete;

#[async_trait]
impl BlockHandler for SheetsFetch {
    async fn call(
        &self,
        ctx: &ExecutionContext,
        credentials: &Credentials,
        inputs: &JsonMap,
    ) -> Result<Value> {
        let spreadsheet_id = require_spreadsheet_id(credentials, inputs)?;
        let sheets = sheets_api(ctx, credentials)?;

        let rows = sheets.get_values(spreadsheet_id, SHEET_FETCH_RANGE).await?;

        let field_keys: Vec<String> = inputs
            .get("fieldKeys")
            .and_then(Value::as_array)
            .map(|keys| {
                keys.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let records: Vec<Value> = rows
            .iter()
            .filter(|row| has_content(row))
            .enumerate()
            .map(|(index, row)| {
                let mut fields = Map::new();
                for (i, key) in field_keys.iter().enumerate() {
                    fields.insert(key.clone(), parse_cell(row.get(i)));
                }
                json!({ "id": index, "fields": fields })
            })
            .collect();

        Ok(json!({ "data": records }))
    }
}

#[async_trait]
impl BlockHandler for SheetsCreate {
    async fn call(
        &self,
        ctx: &ExecutionContext,
        credentials: &Credentials,
        inputs: &JsonMap,
    ) -> Result<Value> {
        let spreadsheet_id = require_spreadsheet_id(credentials, inputs)?;
        let sheets = sheets_api(ctx, credentials)?;

        sheets
            .append_row(spreadsheet_id, &values_array(inputs))
            .await?;
        Ok(json!({ "status": "success" }))
    }
}

#[async_trait]
impl BlockHandler for SheetsUpdate {
    async fn call(
        &self,
        ctx: &ExecutionContext,
        credentials: &Credentials,
        inputs: &JsonMap,
    ) -> Result<Value> {
        let spreadsheet_id = require_spreadsheet_id(credentials, inputs)?;
        let sheets = sheets_api(ctx, credentials)?;
        let row_index = parse_row_index(inputs)?;

        sheets
            .update_row(spreadsheet_id, row_index, &values_array(inputs))
            .await?;
        Ok(json!({ "status": "updated" }))
    }
}

#[async_trait]
impl BlockHandler for SheetsDelete {
    async fn call(
        &self,
        ctx: &ExecutionContext,
        credentials: &Credentials,
        inputs: &JsonMap,
    ) -> Result<Value> {
        let spreadsheet_id = require_spreadsheet_id(credentials, inputs)?;
        let sheets = sheets_api(ctx, credentials)?;
        let row_index = parse_row_index(inputs)?;

        sheets.delete_row(spreadsheet_id, row_index).await?;
        Ok(json!({ "status": "deleted" }))
    }
}

fn google_sheets_crud() -> BlockConfig {
    let mut operations: HashMap<&'static str, OperationSpec> = HashMap::new();
    operations.insert("fetch", OperationSpec::Handler(Arc::new(SheetsFetch)));
    operations.insert("create", OperationSpec::Handler(Arc::new(SheetsCreate)));
    operations.insert("update", OperationSpec::Handler(Arc::new(SheetsUpdate)));
    operations.insert("delete", OperationSpec::Handler(Arc::new(SheetsDelete)));
    BlockConfig {
        operations,
        settings: BlockSettings::default(),
    }
}

/// Whether a row has a non-blank first cell.
fn has_content(row: &[Value]) -> bool {
    match row.first() {
        None => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Decode a cell: JSON when it parses, the raw string otherwise, "" when
/// the cell is absent or blank.
fn parse_cell(cell: Option<&Value>) -> Value {
    match cell {
        Some(Value::String(s)) if !s.is_empty() => {
            serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.clone()))
        }
        Some(Value::String(_)) | None => Value::String(String::new()),
        Some(other) => other.clone(),
    }
}
