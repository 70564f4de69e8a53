//! Checkout module.
//!
//! Contains the shipping snapshot, the order draft built from the cart,
//! and the order status state machine.

mod customer;
mod order;

pub use customer::CustomerInfo;
pub use order::{
    Order, OrderConfirmation, OrderDraft, OrderItem, OrderLineSummary, OrderStatus, PaymentMethod,
};
