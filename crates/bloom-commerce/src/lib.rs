//! E-commerce domain types and logic for the Bloom storefront.
//!
//! This crate provides the pure, synchronous core of the shop:
//!
//! - **Catalog**: product snapshots as cart lines capture them
//! - **Cart**: line items keyed by local ids, merge-on-add, derived totals
//! - **Checkout**: order drafts, the status state machine, payment methods
//!
//! Everything here is plain state with no I/O; synchronization with the
//! backend and the observable store live in the `bloom-store` and
//! `bloom-api` crates.
//!
//! # Example
//!
//! ```rust
//! use bloom_commerce::prelude::*;
//!
//! let mut cart = Cart::new();
//! let rose = ProductSnapshot::new(
//!     "p-rose-01",
//!     "Red Rose Bouquet",
//!     Money::new(450_000),
//!     Category::Birthday,
//!     FlowerType::Rose,
//! );
//! cart.add_item(rose.clone(), 1).unwrap();
//! cart.add_item(rose, 2).unwrap();
//!
//! assert_eq!(cart.total_items(), 3);
//! assert_eq!(cart.total_amount().unwrap().display(), "1.350.000đ");
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod ids;
pub mod money;

pub use error::CommerceError;
pub use ids::{LineItemId, OrderId, ProductId, UserId};
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::{LineItemId, OrderId, ProductId, UserId};
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{Category, FlowerType, ProductSnapshot};

    // Cart
    pub use crate::cart::{Cart, CartItem, CartTotals, MAX_QUANTITY_PER_ITEM};

    // Checkout
    pub use crate::checkout::{
        CustomerInfo, Order, OrderConfirmation, OrderDraft, OrderItem, OrderLineSummary,
        OrderStatus, PaymentMethod,
    };
}
