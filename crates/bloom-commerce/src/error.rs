//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart and checkout operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Quantity must be at least 1.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// Quantity exceeds the per-line maximum.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(u32, u32),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Line item not in the cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Checkout requires a non-empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A required customer field is missing.
    #[error("Missing customer field: {0}")]
    MissingCustomerField(&'static str),

    /// The declared order total does not match the items.
    #[error("Order total {declared} does not match item sum {computed}")]
    TotalMismatch { declared: i64, computed: i64 },

    /// Attempted an illegal order status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: &'static str,
        to: &'static str,
    },
}
