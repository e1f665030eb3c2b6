//! Account roles

use serde::{Deserialize, Serialize};

/// Role carried in the access token's `role` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Shops, keeps a cart and wishlist, places orders
    #[default]
    Buyer,
    /// Lists and manages own products
    Seller,
    /// Manages users, inventory and review moderation
    Admin,
}

impl Role {
    /// Roles a user may pick at registration
    pub fn is_self_assignable(&self) -> bool {
        matches!(self, Role::Buyer | Role::Seller)
    }

    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
            Role::Admin => "admin",
        }
    }

    /// Parse a claim value, treating unknown or missing roles as `Buyer`
    pub fn from_claim(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buyer" => Ok(Role::Buyer),
            "seller" => Ok(Role::Seller),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}
