//! OAuth 2.0 code exchange and token refresh
//!
//! Thin wrapper over the `oauth2` crate. Unlike a fixed-provider setup, the
//! client id and secret arrive per call: the callback and refresh endpoints
//! accept them in the request body and fall back to the configured pair.

use crate::constants::DEFAULT_TOKEN_TTL_MS;
use crate::model::TokenData;
use crate::{EzyrError, Result};
use chrono::Utc;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, RedirectUrl, RefreshToken, TokenResponse,
    TokenUrl, basic::BasicClient,
};

/// Performs OAuth 2.0 grants against a single provider's token endpoint.
#[derive(Debug, Clone)]
pub struct OAuthExchanger {
    auth_url: String,
    token_url: String,
    http_client: reqwest::Client,
}

impl OAuthExchanger {
    /// Create an exchanger for the given provider endpoints.
    pub fn new(auth_url: impl Into<String>, token_url: impl Into<String>) -> Result<Self> {
        // Disable redirects to prevent authorization code interception
        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(EzyrError::Network)?;

        Ok(Self {
            auth_url: auth_url.into(),
            token_url: token_url.into(),
            http_client,
        })
    }

    /// Exchange an authorization code for a token set.
    pub async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenData> {
        // Build OAuth client inline; oauth2's typestate pattern resists a
        // shared helper.
        let client = BasicClient::new(ClientId::new(client_id.to_string()))
            .set_client_secret(ClientSecret::new(client_secret.to_string()))
            .set_auth_uri(
                AuthUrl::new(self.auth_url.clone())
                    .map_err(|e| EzyrError::config(format!("Invalid auth URL: {e}")))?,
            )
            .set_token_uri(
                TokenUrl::new(self.token_url.clone())
                    .map_err(|e| EzyrError::config(format!("Invalid token URL: {e}")))?,
            )
            .set_redirect_uri(
                RedirectUrl::new(redirect_uri.to_string())
                    .map_err(|e| EzyrError::config(format!("Invalid redirect URI: {e}")))?,
            );

        let token_result = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| EzyrError::OAuth {
                message: "OAuth exchange failed".to_string(),
                details: Some(e.to_string()),
                requires_reauth: false,
            })?;

        Ok(Self::into_token_data(&token_result, None))
    }

    /// Refresh an access token via the refresh-token grant.
    ///
    /// When the provider does not return a new refresh token, the one passed
    /// in is carried over so the client never loses its ability to refresh.
    pub async fn refresh(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<TokenData> {
        let client = BasicClient::new(ClientId::new(client_id.to_string()))
            .set_client_secret(ClientSecret::new(client_secret.to_string()))
            .set_auth_uri(
                AuthUrl::new(self.auth_url.clone())
                    .map_err(|e| EzyrError::config(format!("Invalid auth URL: {e}")))?,
            )
            .set_token_uri(
                TokenUrl::new(self.token_url.clone())
                    .map_err(|e| EzyrError::config(format!("Invalid token URL: {e}")))?,
            );

        let token_result = client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| EzyrError::OAuth {
                message: "Token refresh failed".to_string(),
                details: Some(e.to_string()),
                requires_reauth: true,
            })?;

        Ok(Self::into_token_data(&token_result, Some(refresh_token)))
    }

    /// Convert an oauth2 token response into the wire shape.
    fn into_token_data(
        token_result: &oauth2::basic::BasicTokenResponse,
        fallback_refresh: Option<&str>,
    ) -> TokenData {
        let now_ms = Utc::now().timestamp_millis();
        let expires_at = token_result
            .expires_in()
            .map(|d| now_ms + d.as_secs() as i64 * 1000)
            .unwrap_or(now_ms + DEFAULT_TOKEN_TTL_MS);

        TokenData {
            access_token: token_result.access_token().secret().clone(),
            refresh_token: token_result
                .refresh_token()
                .map(|t| t.secret().clone())
                .or_else(|| fallback_refresh.map(str::to_string)),
            expires_at: Some(expires_at),
            token_type: "Bearer".to_string(),
        }
    }
}
