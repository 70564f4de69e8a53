//! Backend traits consumed by the store layer.
//!
//! The cart store and checkout take these as trait objects so tests can
//! inject fakes and so no component reaches for a global client.

use crate::ApiError;
use async_trait::async_trait;
use bloom_commerce::cart::CartItem;
use bloom_commerce::checkout::{Order, OrderConfirmation, OrderDraft, OrderStatus};
use bloom_commerce::ids::OrderId;

/// Remote cart endpoint.
#[async_trait]
pub trait CartBackend: Send + Sync {
    /// Fetch the server-side cart for the signed-in user.
    async fn fetch_cart(&self) -> Result<Vec<CartItem>, ApiError>;

    /// Overwrite the server-side cart with the given lines. Always a full
    /// replace; the backend offers no delta operation.
    async fn push_cart(&self, items: &[CartItem]) -> Result<(), ApiError>;
}

/// Order submission and lifecycle endpoint.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Create an order from a draft; returns the assigned order number.
    async fn create_order(&self, draft: &OrderDraft) -> Result<OrderConfirmation, ApiError>;

    /// Move an order to a new status.
    async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError>;

    /// The signed-in buyer's order history.
    async fn my_orders(&self) -> Result<Vec<Order>, ApiError>;
}
