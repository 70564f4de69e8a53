//! Wire payloads for the shop's REST backend.
//!
//! Field names follow the backend exactly; these types are the contract,
//! not a place to improve it.

use bloom_commerce::cart::CartItem;
use bloom_commerce::checkout::{CustomerInfo, Order, OrderDraft, OrderItem, OrderStatus, PaymentMethod};
use bloom_commerce::money::Money;
use serde::{Deserialize, Serialize};

/// `{ success, data }` envelope most read endpoints use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub success: bool,
    pub data: T,
}

/// Body of `POST /api/cart`: a full overwrite of the server-side cart.
#[derive(Debug, Clone, Serialize)]
pub struct PushCartRequest<'a> {
    pub items: &'a [CartItem],
}

/// Body of `POST /api/admin/orders`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest<'a> {
    pub customer_name: &'a str,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub customer_info: &'a CustomerInfo,
    pub payment_method: PaymentMethod,
    pub items: &'a [OrderItem],
    pub idempotency_key: &'a str,
}

impl<'a> CreateOrderRequest<'a> {
    /// Every submission goes on the wire as a pending order.
    pub fn from_draft(draft: &'a OrderDraft) -> Self {
        Self {
            customer_name: &draft.customer_name,
            total_amount: draft.total_amount,
            status: OrderStatus::Pending,
            customer_info: &draft.customer_info,
            payment_method: draft.payment_method,
            items: &draft.items,
            idempotency_key: &draft.idempotency_key,
        }
    }
}

/// Body of `PUT /api/admin/orders/{id}/status`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

/// Payload of `GET /api/admin/my-orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct MyOrdersData {
    pub orders: Vec<Order>,
}

/// Body of `POST /api/auth/refresh-token`.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshTokenRequest<'a> {
    pub refresh_token: &'a str,
}

/// Response of `POST /api/auth/refresh-token`.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
}
