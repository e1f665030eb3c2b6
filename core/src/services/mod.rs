//! Clients built on the request gateway
//!
//! - `auth` - Login, registration, refresh and logout
//! - `shop` - Resource service operations and the product detail cache
//! - `dashboard` - Role dashboards loading their sections concurrently
//! - `controller` - Force-logout teardown and inactivity timeout

pub mod auth;
pub mod controller;
pub mod dashboard;
pub mod shop;

// Re-export commonly used types
pub use auth::AuthClient;
pub use controller::{SessionController, TeardownReason};
pub use dashboard::{AdminSnapshot, BuyerSnapshot, Dashboard, DashboardSnapshot, SellerSnapshot};
pub use shop::{DetailFetchReport, ProductDetailCache, ShopClient};
