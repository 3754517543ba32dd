//! OAuth endpoints: initial code exchange, manual refresh, config debug

use super::{AppError, AppState};
use crate::constants::DEFAULT_USER_ID;
use crate::model::TokenData;
use crate::utils::strip_zero_width;
use crate::EzyrError;
use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// Resolve client credentials: request body first (sanitized, since provider
/// consoles sneak zero-width characters into copied values), configured pair
/// next.
fn resolve_client_pair(
    state: &AppState,
    client_id: Option<&str>,
    client_secret: Option<&str>,
) -> Option<(String, String)> {
    let id = client_id
        .map(strip_zero_width)
        .filter(|s| !s.is_empty())
        .or_else(|| state.config.client_id.clone())?;
    let secret = client_secret
        .map(strip_zero_width)
        .filter(|s| !s.is_empty())
        .or_else(|| state.config.client_secret.clone())?;
    Some((id, secret))
}

/// POST /oauth/callback: exchange an authorization code for tokens.
pub async fn callback(
    State(state): State<AppState>,
    Json(req): Json<CallbackRequest>,
) -> Result<Json<TokenData>, AppError> {
    let (Some(code), Some(redirect_uri)) = (req.code.as_deref(), req.redirect_uri.as_deref())
    else {
        return Err(EzyrError::missing_input("Missing authorization code or redirect_uri").into());
    };

    let Some((client_id, client_secret)) =
        resolve_client_pair(&state, req.client_id.as_deref(), req.client_secret.as_deref())
    else {
        return Err(
            EzyrError::missing_input("Missing client_id or client_secret in request body").into(),
        );
    };

    let token = state
        .oauth
        .exchange_code(&client_id, &client_secret, code, redirect_uri)
        .await?;

    state.tokens.put(DEFAULT_USER_ID, token.clone());
    tracing::info!("OAuth code exchanged for user {}", DEFAULT_USER_ID);

    Ok(Json(token))
}

/// POST /oauth/refresh: mint a new access token from a refresh token.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenData>, AppError> {
    let Some(refresh_token) = req.refresh_token.as_deref() else {
        return Err(EzyrError::missing_input("Missing refresh_token").into());
    };

    let Some((client_id, client_secret)) =
        resolve_client_pair(&state, req.client_id.as_deref(), req.client_secret.as_deref())
    else {
        return Err(
            EzyrError::missing_input("Missing client_id or client_secret in request body").into(),
        );
    };

    let token = state
        .oauth
        .refresh(&client_id, &client_secret, refresh_token)
        .await?;

    state.tokens.put(DEFAULT_USER_ID, token.clone());

    Ok(Json(token))
}

/// GET /oauth/debug: redacted configuration echo.
pub async fn debug(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;

    let client_id = match &config.client_id {
        Some(id) => format!("{}...", id.chars().take(20).collect::<String>()),
        None => "NOT_SET".to_string(),
    };
    let client_secret = match &config.client_secret {
        Some(secret) => format!("SET (length: {})", secret.len()),
        None => "NOT_SET".to_string(),
    };
    let spreadsheet_id = if config.spreadsheet_id.is_some() {
        "SET"
    } else {
        "NOT_SET"
    };

    Json(json!({
        "client_id": client_id,
        "client_secret": client_secret,
        "spreadsheet_id": spreadsheet_id,
    }))
}
