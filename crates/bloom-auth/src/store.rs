//! Persistent credential storage.

use crate::user::StoredUser;
use crate::AuthError;
use bloom_cache::ClientStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
/// Storage key for the cached user profile.
pub const USER_DATA_KEY: &str = "user_data";

/// Access/refresh token pair handed out at login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Credential state shared by every authenticated call.
///
/// The three keys live and die together: a login writes all of them, a
/// logout or an irrecoverable 401 clears all of them. Reads are
/// non-destructive; the only mutation outside login is replacing the
/// access token after a refresh.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<ClientStore>,
}

impl CredentialStore {
    /// Open the default backing store.
    pub fn open_default() -> Result<Self, AuthError> {
        Ok(Self {
            store: Arc::new(ClientStore::open_default()?),
        })
    }

    /// Wrap an existing backing store.
    pub fn new(store: Arc<ClientStore>) -> Self {
        Self { store }
    }

    /// Persist a fresh login.
    pub fn save(&self, tokens: &TokenPair, user: &StoredUser) -> Result<(), AuthError> {
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)?;
        self.store.set(USER_DATA_KEY, user)?;
        Ok(())
    }

    /// Current access token, if signed in.
    pub fn access_token(&self) -> Result<Option<String>, AuthError> {
        Ok(self.store.get(ACCESS_TOKEN_KEY)?)
    }

    /// Current refresh token, if signed in.
    pub fn refresh_token(&self) -> Result<Option<String>, AuthError> {
        Ok(self.store.get(REFRESH_TOKEN_KEY)?)
    }

    /// Cached user profile, if signed in.
    pub fn user(&self) -> Result<Option<StoredUser>, AuthError> {
        Ok(self.store.get(USER_DATA_KEY)?)
    }

    /// Check whether an access token is present.
    pub fn is_authenticated(&self) -> Result<bool, AuthError> {
        Ok(self.access_token()?.is_some())
    }

    /// Swap in a refreshed access token; the refresh token stays.
    pub fn replace_access_token(&self, access_token: &str) -> Result<(), AuthError> {
        self.store.set(ACCESS_TOKEN_KEY, &access_token)?;
        Ok(())
    }

    /// Clear all credential state. Used on logout and when a refresh
    /// attempt fails for good.
    pub fn clear(&self) -> Result<(), AuthError> {
        self.store.delete(ACCESS_TOKEN_KEY)?;
        self.store.delete(REFRESH_TOKEN_KEY)?;
        self.store.delete(USER_DATA_KEY)?;
        Ok(())
    }
}
