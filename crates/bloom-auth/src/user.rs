//! Cached user profile and roles.

use bloom_commerce::ids::UserId;
use serde::{Deserialize, Serialize};

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular shopper.
    #[default]
    Customer,
    /// Store administrator.
    Admin,
}

impl Role {
    /// Get role as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "customer" | "user" => Some(Role::Customer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Admins may move any order through any legal transition; a
    /// customer may only cancel their own.
    pub fn can_manage_orders(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The signed-in user, as cached under the `user_data` key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredUser {
    /// Backend user id.
    pub id: UserId,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Role; absent means customer.
    #[serde(default)]
    pub role: Role,
}
