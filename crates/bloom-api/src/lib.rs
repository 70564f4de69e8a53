//! REST backend contract for the Bloom storefront.
//!
//! The shop's backend is an external collaborator reached over HTTP; this
//! crate pins down that contract. It provides:
//!
//! - [`CartBackend`] / [`OrderBackend`]: the traits the store layer
//!   consumes, so tests and alternative transports can be injected
//! - [`ShopClient`]: the HTTP implementation, which attaches the bearer
//!   token to every call and transparently refreshes it once on a 401
//! - [`RefreshGate`]: single-flight token refresh, so a burst of expired
//!   calls produces one refresh request instead of a thundering herd
//! - [`ApiError`]: the error taxonomy; server rejections carry the
//!   backend's message verbatim
//!
//! # Example
//!
//! ```rust,ignore
//! use bloom_api::ShopClient;
//! use bloom_auth::CredentialStore;
//!
//! let credentials = CredentialStore::open_default()?;
//! let client = ShopClient::new("http://localhost:5003", credentials);
//!
//! let cart = client.fetch_cart().await?;
//! ```

mod client;
pub mod dto;
mod error;
mod refresh;
mod traits;

pub use client::ShopClient;
pub use error::ApiError;
pub use refresh::RefreshGate;
pub use traits::{CartBackend, OrderBackend};
