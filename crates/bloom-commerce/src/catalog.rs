//! Product snapshot types.
//!
//! A cart line carries a snapshot of the product as it looked when the
//! shopper added it, not a live reference into the catalog. The catalog
//! itself lives behind the REST backend; these types only mirror what the
//! storefront needs to price and display a line item.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Occasion category for an arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Birthday,
    Wedding,
    Funeral,
    Gift,
    Congratulation,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Birthday => "birthday",
            Category::Wedding => "wedding",
            Category::Funeral => "funeral",
            Category::Gift => "gift",
            Category::Congratulation => "congratulation",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "birthday" => Some(Category::Birthday),
            "wedding" => Some(Category::Wedding),
            "funeral" => Some(Category::Funeral),
            "gift" => Some(Category::Gift),
            "congratulation" => Some(Category::Congratulation),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Birthday => "Birthday",
            Category::Wedding => "Wedding",
            Category::Funeral => "Funeral",
            Category::Gift => "Gift",
            Category::Congratulation => "Congratulation",
        }
    }
}

/// Dominant flower in an arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowerType {
    Rose,
    Carnation,
    Orchid,
    Lily,
    Mixed,
}

impl FlowerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowerType::Rose => "rose",
            FlowerType::Carnation => "carnation",
            FlowerType::Orchid => "orchid",
            FlowerType::Lily => "lily",
            FlowerType::Mixed => "mixed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rose" => Some(FlowerType::Rose),
            "carnation" => Some(FlowerType::Carnation),
            "orchid" => Some(FlowerType::Orchid),
            "lily" => Some(FlowerType::Lily),
            "mixed" => Some(FlowerType::Mixed),
            _ => None,
        }
    }
}

/// Snapshot of a purchasable product at the time it was added to the cart.
///
/// Wire field names are camelCase to match the backend's product payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    /// Catalog product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price at time of adding.
    pub price: Money,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    /// Occasion category.
    pub category: Category,
    /// Dominant flower type.
    pub flower_type: FlowerType,
    /// Price before discount, if the product is on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    /// Advertised discount percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u8>,
    /// Average review rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// Number of reviews.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    /// New-arrival badge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
    /// Best-seller badge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_best_seller: Option<bool>,
}

impl ProductSnapshot {
    /// Create a minimal snapshot.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        category: Category,
        flower_type: FlowerType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: String::new(),
            category,
            flower_type,
            original_price: None,
            discount: None,
            rating: None,
            review_count: None,
            is_new: None,
            is_best_seller: None,
        }
    }

    /// Check whether the snapshot was taken while the product was on sale.
    pub fn is_discounted(&self) -> bool {
        self.original_price
            .map(|orig| orig > self.price)
            .unwrap_or(false)
    }

    /// Effective discount percentage, preferring the advertised value.
    pub fn effective_discount_percent(&self) -> Option<u8> {
        if let Some(d) = self.discount {
            return Some(d);
        }
        let orig = self.original_price?;
        if orig.amount <= 0 || orig <= self.price {
            return None;
        }
        let saved = orig.amount - self.price.amount;
        Some(((saved * 100) / orig.amount) as u8)
    }
}
