//! Authentication errors.

use thiserror::Error;

/// Credential state error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No access token is stored.
    #[error("not authenticated")]
    NotAuthenticated,

    /// No refresh token is stored.
    #[error("no refresh token")]
    NoRefreshToken,

    /// Cache error.
    #[error("cache error: {0}")]
    Cache(#[from] bloom_cache::CacheError),
}
