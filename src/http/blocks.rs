//! Generic block execution endpoint

use super::{AppError, AppState};
use crate::block::JsonMap;
use crate::model::Credentials;
use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockExecuteRequest {
    pub block_id: Option<String>,
    pub operation: Option<String>,
    #[serde(default)]
    pub params: JsonMap,
    #[serde(default)]
    pub credentials: Credentials,
}

/// POST /block/execute: resolve and run one block operation.
///
/// An absent `blockId` or `operation` falls through the registry lookup and
/// surfaces as the same "not found" error an unknown one would.
pub async fn execute(
    State(state): State<AppState>,
    Json(req): Json<BlockExecuteRequest>,
) -> Result<Json<Value>, AppError> {
    let block_id = req.block_id.unwrap_or_default();
    let operation = req.operation.unwrap_or_default();

    tracing::debug!(block_id = %block_id, operation = %operation, "Executing block operation");

    let ctx = state.execution_context();
    let result = state
        .blocks
        .execute(&block_id, &operation, req.params, req.credentials, &ctx)
        .await?;

    Ok(Json(result))
}
