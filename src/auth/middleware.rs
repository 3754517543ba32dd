//! Token validation and refresh middleware
//!
//! Guards the direct entry endpoints. The decision logic lives in
//! [`authorize`], a plain function over the request's headers and (already
//! buffered) JSON body; [`token_gate`] adapts it to axum, reinstating the
//! body for the downstream handler and advertising refreshed tokens via
//! response headers.

use crate::constants::{
    DEFAULT_USER_ID, HEADER_NEW_ACCESS_TOKEN, HEADER_REFRESH_TOKEN, HEADER_TOKEN_REFRESHED,
};
use crate::http::{AppError, AppState};
use crate::model::TokenData;
use crate::{EzyrError, Result};
use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// Bodies larger than this are not buffered for token extraction.
const BODY_BUFFER_LIMIT: usize = 1024 * 1024;

/// The outcome of token validation, injected into request extensions.
#[derive(Debug, Clone)]
pub struct AuthorizedContext {
    /// The token the handler should use against upstream APIs
    pub token: TokenData,
    /// Whether the access token was refreshed while handling this request
    pub refreshed: bool,
}

/// Validate the request's tokens, refreshing the access token when needed.
///
/// Extraction precedence, in order:
/// 1. access token: `Authorization: Bearer`, else body `access_token`
/// 2. refresh token: `x-refresh-token` header, else the stored entry,
///    else body `refresh_token`
/// 3. expiry: body `expires_at`, else the stored entry
///
/// A refresh is attempted only when a refresh token is available and the
/// assembled token is within the expiry buffer. On success the store entry is
/// replaced; on failure the caller gets a 401 with `requiresReauth` so the
/// front-end restarts the OAuth flow. Otherwise the assembled token is
/// persisted whenever a refresh token is known, keeping the store warm for
/// later requests that only carry the access token.
pub async fn authorize(
    headers: &HeaderMap,
    body: Option<&Value>,
    state: &AppState,
) -> Result<AuthorizedContext> {
    let body_str = |key: &str| {
        body.and_then(|b| b.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let access_token = bearer_token(headers).or_else(|| body_str("access_token"));

    let refresh_token = headers
        .get(HEADER_REFRESH_TOKEN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| state.tokens.refresh_token(DEFAULT_USER_ID))
        .or_else(|| body_str("refresh_token"));

    let expires_at = body
        .and_then(|b| b.get("expires_at"))
        .and_then(Value::as_i64)
        .or_else(|| state.tokens.expires_at(DEFAULT_USER_ID));

    let Some(access_token) = access_token else {
        return Err(EzyrError::auth("Access token missing"));
    };

    let token = TokenData {
        access_token,
        refresh_token: refresh_token.clone(),
        expires_at,
        token_type: "Bearer".to_string(),
    };

    if let Some(refresh_token) = refresh_token
        && token.is_expired()
    {
        tracing::info!("Access token expired, attempting refresh");

        let (Some(client_id), Some(client_secret)) =
            (state.config.client_id.as_deref(), state.config.client_secret.as_deref())
        else {
            return Err(EzyrError::reauth("Token refresh failed"));
        };

        match state.oauth.refresh(client_id, client_secret, &refresh_token).await {
            Ok(refreshed) => {
                state.tokens.put(DEFAULT_USER_ID, refreshed.clone());
                tracing::info!("Token refreshed for user {}", DEFAULT_USER_ID);
                Ok(AuthorizedContext {
                    token: refreshed,
                    refreshed: true,
                })
            }
            Err(e) => {
                tracing::warn!("Token refresh failed: {}", e);
                Err(EzyrError::reauth("Token refresh failed"))
            }
        }
    } else {
        if token.refresh_token.is_some() {
            state.tokens.put(DEFAULT_USER_ID, token.clone());
        }
        Ok(AuthorizedContext {
            token,
            refreshed: false,
        })
    }
}

/// Axum middleware wrapping [`authorize`] for protected routes.
pub async fn token_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();

    let bytes = match axum::body::to_bytes(body, BODY_BUFFER_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return AppError::from(EzyrError::missing_input(format!("Unreadable body: {e}")))
                .into_response();
        }
    };
    let body_json: Option<Value> = serde_json::from_slice(&bytes).ok();

    match authorize(&parts.headers, body_json.as_ref(), &state).await {
        Ok(ctx) => {
            let refreshed = ctx.refreshed.then(|| ctx.token.access_token.clone());

            let mut req = Request::from_parts(parts, Body::from(bytes));
            req.extensions_mut().insert(ctx);
            let mut response = next.run(req).await;

            if let Some(new_token) = refreshed {
                // Hand the new token back so the client can store it.
                if let Ok(value) = HeaderValue::from_str(&new_token) {
                    response.headers_mut().insert(HEADER_NEW_ACCESS_TOKEN, value);
                }
                response
                    .headers_mut()
                    .insert(HEADER_TOKEN_REFRESHED, HeaderValue::from_static("true"));
            }
            response
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Extract the bearer token from an Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::to_string)
}
