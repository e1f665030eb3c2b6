//! Catalogue, cart, order, inventory and payment entities.
//!
//! These are client-side copies of server state; the client never mutates
//! them locally, it re-reads them after every change.

use serde::{Deserialize, Serialize};

/// Product listed by a seller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Username of the seller that owns the listing
    #[serde(default)]
    pub owner_id: Option<String>,
}

/// Body of a product creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
}

/// Partial product update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Line of a user's cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub quantity: u32,
}

/// Line of a placed order, priced at checkout time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub price_per_item: f64,
}

impl OrderItem {
    /// Price of the line
    pub fn subtotal(&self) -> f64 {
        self.price_per_item * f64::from(self.quantity)
    }
}

/// A placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub total_price: f64,
    pub status: String,
    #[serde(default)]
    pub payment_status: Option<String>,
    /// Server timestamp, kept verbatim (services differ in format)
    #[serde(default)]
    pub created_at: Option<serde_json::Value>,
}

/// Answer of the checkout endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    #[serde(default)]
    pub message: String,
    pub order_id: String,
}

/// Stock level of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub product_id: String,
    pub quantity: i64,
}

/// Answer of the admin stock update endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryUpdated {
    #[serde(default)]
    pub message: String,
    pub product_id: String,
    pub new_quantity: i64,
}

/// Body of a payment request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub user_id: String,
    pub amount: f64,
}

/// Answer of the payment service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    /// Decline reason, present when `status` is `FAILED`
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl PaymentReceipt {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}
