//! API error taxonomy.
//!
//! Nothing here is fatal to the process: every failure is local to the
//! operation that triggered it and leaves the rest of the client usable.

use bloom_auth::AuthError;
use bloom_commerce::CommerceError;
use bloom_data::FetchError;
use thiserror::Error;

/// Errors surfaced by backend operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Caught before any network call (missing fields, bad totals).
    #[error(transparent)]
    Invalid(#[from] CommerceError),

    /// Network or transport failure; the operation is retryable.
    #[error(transparent)]
    Transport(#[from] FetchError),

    /// The session could not be kept alive: a 401 survived the refresh
    /// attempt, and credential state has been cleared.
    #[error("authentication expired, sign in again")]
    AuthExpired,

    /// The server rejected the operation; its message is passed through
    /// verbatim, with no client-side re-interpretation.
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Credential storage failure.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    /// Whether retrying the same call might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Transport(_))
            || matches!(self, ApiError::Rejected { status, .. } if *status >= 500)
    }
}
