//! HTTP server for Ezyr
//!
//! One axum router merging the OAuth endpoints, the direct per-service
//! entry routes (behind the token middleware), the generic block-execution
//! endpoint, and the health check.

pub mod blocks;
pub mod entries;
pub mod oauth;

use crate::auth::{OAuthExchanger, TokenStore, token_gate};
use crate::block::{BlockRegistry, ExecutionContext};
use crate::config::AppConfig;
use crate::{EzyrError, Result};
use axum::{
    Json, Router, middleware,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    LatencyUnit,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenStore>,
    pub oauth: Arc<OAuthExchanger>,
    pub blocks: Arc<BlockRegistry>,
    pub http: reqwest::Client,
}

impl AppState {
    /// Build the full application state from configuration.
    pub fn new(config: AppConfig) -> Result<Self> {
        let oauth = OAuthExchanger::new(config.auth_url.clone(), config.token_url.clone())?;
        let blocks = BlockRegistry::with_builtin(&config.airtable_base_url);

        Ok(Self {
            config: Arc::new(config),
            tokens: Arc::new(TokenStore::new()),
            oauth: Arc::new(oauth),
            blocks: Arc::new(blocks),
            http: reqwest::Client::new(),
        })
    }

    /// Execution context handed to imperative block handlers.
    pub fn execution_context(&self) -> ExecutionContext {
        ExecutionContext {
            http: self.http.clone(),
            sheets_base_url: self.config.sheets_base_url.clone(),
            gmail_base_url: self.config.gmail_base_url.clone(),
        }
    }
}

/// Error type for HTTP handlers.
///
/// Maps every [`EzyrError`] variant onto the status and flat JSON body the
/// front-end expects: `{"error": ..}` plus optional `details` and
/// `requiresReauth` keys.
#[derive(Debug)]
pub struct AppError(EzyrError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            EzyrError::MissingInput(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            // Unknown block/operation stays 400: the deployed front-end
            // branches on it.
            EzyrError::NotFound(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            EzyrError::Auth {
                message,
                requires_reauth,
            } => {
                let mut body = json!({ "error": message });
                if *requires_reauth {
                    body["requiresReauth"] = json!(true);
                }
                (StatusCode::UNAUTHORIZED, body)
            }
            EzyrError::OAuth {
                message,
                details,
                requires_reauth,
            } => {
                let mut body = json!({ "error": message });
                if let Some(details) = details {
                    body["details"] = json!(details);
                }
                let status = if *requires_reauth {
                    body["requiresReauth"] = json!(true);
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, body)
            }
            EzyrError::Upstream { message, .. } => {
                tracing::error!("Upstream error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
            EzyrError::Network(e) => {
                tracing::error!("Network error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": e.to_string() }),
                )
            }
            other => {
                tracing::error!("Internal error: {:?}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": other.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<EzyrError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Start the HTTP server
pub async fn start_server(config: AppConfig) -> Result<()> {
    let host = config.host.clone();
    let port = config.port;

    let state = AppState::new(config)?;
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let socket_addr: SocketAddr = addr
        .parse()
        .map_err(|e| EzyrError::config(format!("Invalid address {addr}: {e}")))?;

    tracing::info!("Starting HTTP server on {}", socket_addr);

    let listener = tokio::net::TcpListener::bind(socket_addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| EzyrError::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Build the router with all endpoints
pub fn build_router(state: AppState) -> Router {
    // Direct per-service routes sit behind the token middleware; everything
    // else authenticates per request (or not at all).
    let protected = Router::new()
        .route("/add-entry", post(entries::add_entry))
        .route("/get-entries", get(entries::get_entries))
        .route("/update-entry", put(entries::update_entry))
        .route("/delete-entry", delete(entries::delete_entry))
        .route("/gmail/search", post(entries::gmail_search))
        .layer(middleware::from_fn_with_state(state.clone(), token_gate));

    Router::new()
        .route("/health", get(health_handler))
        .route("/oauth/callback", post(oauth::callback))
        .route("/oauth/refresh", post(oauth::refresh))
        .route("/oauth/debug", get(oauth::debug))
        .route("/block/execute", post(blocks::execute))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                // Tracing layer for request/response logging
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new())
                        .on_response(
                            DefaultOnResponse::new()
                                .level(tracing::Level::INFO)
                                .latency_unit(LatencyUnit::Micros),
                        ),
                )
                // The gateway fronts a browser app on another origin.
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
