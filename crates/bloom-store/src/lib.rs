//! Client-side cart state and checkout flow for the Bloom storefront.
//!
//! This crate is the stateful heart of the shop client:
//!
//! - [`CartStore`]: an observable cart with synchronous mutations,
//!   derived totals, a `watch`-based subscription feed, and (for
//!   signed-in shoppers) a coalescing single-flight sync to the remote
//!   cart
//! - [`CheckoutSession`]: turns a cart snapshot plus contact details
//!   into a submitted order and walks orders through their lifecycle
//! - [`Notifier`]: the broadcast channel background failures report on
//!
//! Backends are injected as [`bloom_api`] trait objects; nothing in here
//! is a singleton, and tests run against in-memory fakes.
//!
//! # Example
//!
//! ```rust,ignore
//! use bloom_store::{CartStore, CheckoutSession};
//! use std::sync::Arc;
//!
//! let client = Arc::new(ShopClient::new("http://localhost:5003", credentials));
//!
//! let store = CartStore::synced(client.clone());
//! store.hydrate().await?;
//! store.add_item(rose_bouquet, 1)?;
//!
//! let checkout = CheckoutSession::new(store.clone(), client);
//! let confirmation = checkout.submit(contact, PaymentMethod::Cod).await?;
//! println!("placed {}", confirmation.order_number);
//! ```

mod checkout;
mod notify;
mod store;
mod sync;

#[cfg(test)]
mod testing;

pub use checkout::CheckoutSession;
pub use notify::{Notice, NoticeLevel, Notifier};
pub use store::{CartSnapshot, CartStore};
