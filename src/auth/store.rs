//! In-memory token storage
//!
//! Tokens live for the process lifetime only; a restart forces clients back
//! through the OAuth flow. Concurrent refreshes for the same user are not
//! serialized: the last writer wins.

use crate::model::TokenData;
use dashmap::DashMap;

/// Concurrent map from user id to the user's current token set.
///
/// The gateway currently keys everything under
/// [`DEFAULT_USER_ID`](crate::constants::DEFAULT_USER_ID); the store is
/// nevertheless passed explicitly through `AppState` so per-user sessions
/// stay a data change, not a plumbing change.
#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: DashMap<String, TokenData>,
}

impl TokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token set for a user, if any
    pub fn get(&self, user_id: &str) -> Option<TokenData> {
        self.tokens.get(user_id).map(|entry| entry.clone())
    }

    /// Replace a user's token set wholesale
    pub fn put(&self, user_id: &str, token: TokenData) {
        self.tokens.insert(user_id.to_string(), token);
    }

    /// Stored refresh token for a user, if any
    pub fn refresh_token(&self, user_id: &str) -> Option<String> {
        self.tokens
            .get(user_id)
            .and_then(|entry| entry.refresh_token.clone())
    }

    /// Stored expiry for a user, if any
    pub fn expires_at(&self, user_id: &str) -> Option<i64> {
        self.tokens.get(user_id).and_then(|entry| entry.expires_at)
    }
}
