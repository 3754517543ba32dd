//! Block dispatch
//!
//! A block is a named integration target (a SaaS resource type) with a set
//! of operations. The registry is built once at startup and resolved through
//! [`BlockRegistry::execute`], which handles credential/key normalization,
//! the required-field precondition, and the generic REST execution for
//! declarative templates.

pub mod catalog;
pub mod operation;

pub use operation::{
    BlockConfig, BlockHandler, BlockSettings, ExecutionContext, JsonMap, OperationSpec,
    RestTemplate,
};

use crate::model::Credentials;
use crate::utils::is_truthy;
use crate::{EzyrError, Result};
use reqwest::Method;
use serde_json::Value;
use std::collections::HashMap;

/// Immutable lookup table from block id to block configuration.
pub struct BlockRegistry {
    blocks: HashMap<&'static str, BlockConfig>,
}

impl BlockRegistry {
    /// Registry with the built-in blocks, wired to the given Airtable base.
    pub fn with_builtin(airtable_base_url: &str) -> Self {
        Self {
            blocks: catalog::builtin(airtable_base_url),
        }
    }

    /// Look up a block by id.
    pub fn get(&self, block_id: &str) -> Option<&BlockConfig> {
        self.blocks.get(block_id)
    }

    /// Registered block ids (stable order not guaranteed).
    pub fn block_ids(&self) -> Vec<&'static str> {
        self.blocks.keys().copied().collect()
    }

    /// Execute one operation of one block.
    pub async fn execute(
        &self,
        block_id: &str,
        operation: &str,
        mut params: JsonMap,
        credentials: Credentials,
        ctx: &ExecutionContext,
    ) -> Result<Value> {
        let block = self
            .blocks
            .get(block_id)
            .ok_or_else(|| EzyrError::not_found("Block not found"))?;
        let op = block
            .operations
            .get(operation)
            .ok_or_else(|| EzyrError::not_found("Operation not found"))?;

        match op {
            OperationSpec::Handler(handler) => {
                // Derive the compatibility inputs from the raw params before
                // the spreadsheet id injection can leak into them.
                normalize_inputs(&mut params);
                if !params.contains_key("spreadsheetId")
                    && let Some(id) = &credentials.spreadsheet_id
                {
                    params.insert("spreadsheetId".to_string(), Value::String(id.clone()));
                }
                handler.call(ctx, &credentials, &params).await
            }
            OperationSpec::Rest(template) => {
                self.execute_rest(template, &block.settings, &params, &credentials, ctx)
                    .await
            }
        }
    }

    /// Generic execution of a declarative REST template.
    async fn execute_rest(
        &self,
        template: &RestTemplate,
        settings: &BlockSettings,
        params: &JsonMap,
        credentials: &Credentials,
        ctx: &ExecutionContext,
    ) -> Result<Value> {
        // Precondition check before anything touches the network.
        let missing = template
            .required_fields
            .iter()
            .any(|field| !params.get(*field).is_some_and(is_truthy));
        if missing {
            return Err(EzyrError::missing_input("Missing required fields"));
        }

        let url = (template.build_url)(params, settings);
        let headers = (template.build_headers)(credentials);
        let payload = (template.build_payload).map(|build| build(params));

        tracing::debug!(service = template.service, %url, method = %template.method, "Executing REST block operation");

        let mut request = ctx.http.request(template.method.clone(), &url);
        for (name, value) in &headers {
            request = request.header(*name, value.as_str());
        }

        // GET/DELETE templates carry no payload builder; anything else
        // attaches its JSON body.
        let bodyless = template.method == Method::GET || template.method == Method::DELETE;
        if let Some(body) = &payload
            && !(bodyless && body.is_null())
        {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(EzyrError::upstream(
                status.as_u16(),
                format!("Request failed with status code {}", status.as_u16()),
            ));
        }

        let mut out: Value = if body.is_empty() {
            Value::Object(JsonMap::new())
        } else {
            serde_json::from_str(&body)?
        };

        if let Some(field) = template.response_field {
            out = out.get(field).cloned().unwrap_or(Value::Null);
        }
        if let Some(transform) = template.transform {
            out = transform(out);
        }

        Ok(out)
    }
}

/// Provide `dataFields`/`valuesArray` compatibility inputs.
///
/// Front-ends differ in how they ship row data: some send `dataFields`, some
/// `fields`, some just the flat params object. `valuesArray` falls out of
/// whichever won, in key insertion order.
fn normalize_inputs(params: &mut JsonMap) {
    if !params.contains_key("dataFields") {
        let fields = params
            .get("fields")
            .cloned()
            .unwrap_or_else(|| Value::Object(params.clone()));
        params.insert("dataFields".to_string(), fields);
    }

    if !params.contains_key("valuesArray") {
        let values = match params.get("dataFields") {
            Some(Value::Object(map)) => map.values().cloned().collect(),
            _ => Vec::new(),
        };
        params.insert("valuesArray".to_string(), Value::Array(values));
    }
}
