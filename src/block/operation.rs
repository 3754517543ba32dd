//! Operation specifications for blocks
//!
//! An operation is either declarative (a REST template executed generically
//! by the dispatcher) or imperative, an async handler with full control over
//! the third-party call. Representing the two as a tagged union keeps data
//! and logic visibly separate and resolves both through one dispatch path.

use crate::Result;
use crate::model::Credentials;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// JSON object map; insertion-ordered so value enumeration matches the
/// order keys arrived in (what front-ends sending positional row data rely
/// on).
pub type JsonMap = Map<String, Value>;

/// System-level resources handed to imperative handlers.
///
/// Kept separate from the operation inputs: inputs are user data from the
/// request, the context is runtime plumbing (shared HTTP client, upstream
/// endpoints). Handlers never reach into ambient globals.
#[derive(Clone)]
pub struct ExecutionContext {
    /// Shared HTTP client (connection reuse across requests)
    pub http: reqwest::Client,
    /// Google Sheets API base URL
    pub sheets_base_url: String,
    /// Gmail API base URL
    pub gmail_base_url: String,
}

/// An imperative operation body.
#[async_trait]
pub trait BlockHandler: Send + Sync {
    /// Execute with normalized credentials and inputs.
    async fn call(
        &self,
        ctx: &ExecutionContext,
        credentials: &Credentials,
        inputs: &JsonMap,
    ) -> Result<Value>;
}

/// A declarative REST operation.
///
/// The builder functions are plain fn pointers: templates stay data-like and
/// cannot capture credentials or other ambient state.
pub struct RestTemplate {
    /// Service label, used for logging only
    pub service: &'static str,
    pub method: Method,
    /// Inputs that must be present (and truthy) before any request is made
    pub required_fields: &'static [&'static str],
    /// Response key to unwrap, when the caller wants a sub-field
    pub response_field: Option<&'static str>,
    pub build_url: fn(&JsonMap, &BlockSettings) -> String,
    pub build_headers: fn(&Credentials) -> Vec<(&'static str, String)>,
    pub build_payload: Option<fn(&JsonMap) -> Value>,
    pub transform: Option<fn(Value) -> Value>,
}

/// One operation within a block.
pub enum OperationSpec {
    Rest(RestTemplate),
    Handler(Arc<dyn BlockHandler>),
}

/// Per-block static settings shared by its operations.
#[derive(Debug, Clone, Default)]
pub struct BlockSettings {
    /// Base URL for declarative templates
    pub base_url: String,
}

/// A block: a named integration target with its operations.
pub struct BlockConfig {
    pub operations: HashMap<&'static str, OperationSpec>,
    pub settings: BlockSettings,
}
