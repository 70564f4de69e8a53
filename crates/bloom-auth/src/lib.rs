//! Client credential state for the Bloom storefront.
//!
//! Holds the access/refresh token pair and the cached user profile under
//! the `access_token` / `refresh_token` / `user_data` keys. All three are
//! written at login and cleared together on logout or when a token
//! refresh fails for good; the refresh itself is driven by `bloom-api`.

mod error;
mod store;
mod user;

pub use error::AuthError;
pub use store::{
    CredentialStore, TokenPair, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_DATA_KEY,
};
pub use user::{Role, StoredUser};
