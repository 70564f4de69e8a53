//! Shopping cart module.
//!
//! Contains types for the cart, its line items, and derived totals.

mod cart;
mod totals;

pub use cart::{Cart, CartItem, MAX_QUANTITY_PER_ITEM};
pub use totals::CartTotals;
