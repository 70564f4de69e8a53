//! Shipping contact details.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// Shipping details captured at checkout.
///
/// A snapshot independent of any user profile record: editing the profile
/// later does not touch submitted orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CustomerInfo {
    /// Recipient name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Province or city.
    #[serde(default)]
    pub province: String,
    /// District.
    #[serde(default)]
    pub district: String,
    /// Ward.
    #[serde(default)]
    pub ward: String,
}

impl CustomerInfo {
    /// Create contact details with the required fields.
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    /// Validate the fields an order cannot be submitted without.
    ///
    /// Only presence is checked here; phone format is the backend's
    /// concern.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.name.trim().is_empty() {
            return Err(CommerceError::MissingCustomerField("name"));
        }
        if self.phone.trim().is_empty() {
            return Err(CommerceError::MissingCustomerField("phone"));
        }
        Ok(())
    }

    /// Check whether every address field is filled in.
    pub fn is_complete(&self) -> bool {
        [
            &self.name,
            &self.phone,
            &self.address,
            &self.province,
            &self.district,
            &self.ward,
        ]
        .iter()
        .all(|f| !f.trim().is_empty())
    }

    /// Format the address as a single line, skipping empty parts.
    pub fn one_line_address(&self) -> String {
        [&self.address, &self.ward, &self.district, &self.province]
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
