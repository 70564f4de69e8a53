//! Cart and line item types.

use crate::cart::CartTotals;
use crate::catalog::ProductSnapshot;
use crate::error::CommerceError;
use crate::ids::{LineItemId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: u32 = 99;

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Local line identifier, distinct from the product id.
    pub id: LineItemId,
    /// Product snapshot taken when the item was added.
    pub product: ProductSnapshot,
    /// Quantity, always at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// Create a new line item with a freshly generated local id.
    pub fn new(product: ProductSnapshot, quantity: u32) -> Self {
        Self {
            id: LineItemId::generate(),
            product,
            quantity,
        }
    }

    /// Price of this line (unit price × quantity).
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.product
            .price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }
}

/// A shopping cart.
///
/// Holds what the shopper intends to buy. Lines are keyed by a locally
/// generated id; adding the same product twice merges into the existing
/// line, so there is at most one line per product id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a cart from lines fetched from the backend.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// Add a product to the cart.
    ///
    /// If a line for the same product already exists its quantity is
    /// increased; otherwise a new line is appended. Returns the id of the
    /// affected line.
    pub fn add_item(
        &mut self,
        product: ProductSnapshot,
        quantity: u32,
    ) -> Result<LineItemId, CommerceError> {
        if quantity == 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }
            existing.quantity = new_quantity;
            return Ok(existing.id.clone());
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        let item = CartItem::new(product, quantity);
        let id = item.id.clone();
        self.items.push(item);
        Ok(id)
    }

    /// Set the quantity of a line.
    ///
    /// Zero is rejected rather than treated as a removal; deleting a line
    /// is an explicit operation. Returns `false` when the line id is
    /// unknown.
    pub fn update_quantity(
        &mut self,
        line_id: &LineItemId,
        quantity: u32,
    ) -> Result<bool, CommerceError> {
        if quantity == 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        match self.items.iter_mut().find(|i| &i.id == line_id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a line from the cart. No-op when the id is unknown.
    pub fn remove_item(&mut self, line_id: &LineItemId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != line_id);
        self.items.len() < len_before
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total item count (sum of quantities).
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Total amount (sum of price × quantity over all lines).
    pub fn total_amount(&self) -> Result<Money, CommerceError> {
        let mut total = Money::zero();
        for item in &self.items {
            total = total
                .try_add(item.line_total()?)
                .ok_or(CommerceError::Overflow)?;
        }
        Ok(total)
    }

    /// Derived totals in one pass.
    pub fn totals(&self) -> Result<CartTotals, CommerceError> {
        Ok(CartTotals {
            total_items: self.total_items(),
            total_amount: self.total_amount()?,
        })
    }

    /// Number of distinct lines.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a line by its local id.
    pub fn get_item(&self, line_id: &LineItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.id == line_id)
    }

    /// Get the line holding a given product, if any.
    pub fn find_by_product(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.product.id == product_id)
    }

    /// Iterate over the lines in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }
}
