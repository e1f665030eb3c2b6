//! Base URLs of the shop microservices

use serde::{Deserialize, Serialize};

/// Base URL of every backing service
///
/// Each service runs as its own process; the client only ever joins a path
/// onto one of these roots.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceEndpoints {
    /// User/auth service (login, register, refresh, logout, admin users)
    #[serde(default = "default_user")]
    pub user: String,

    /// Product catalogue service
    #[serde(default = "default_product")]
    pub product: String,

    /// Inventory service
    #[serde(default = "default_inventory")]
    pub inventory: String,

    /// Cart service
    #[serde(default = "default_cart")]
    pub cart: String,

    /// Order service
    #[serde(default = "default_order")]
    pub order: String,

    /// Wishlist service
    #[serde(default = "default_wishlist")]
    pub wishlist: String,

    /// Payment service
    #[serde(default = "default_payment")]
    pub payment: String,

    /// Review service
    #[serde(default = "default_review")]
    pub review: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self::local("127.0.0.1")
    }
}

impl ServiceEndpoints {
    /// Endpoints for all services running on one host with the standard ports
    pub fn local(host: &str) -> Self {
        let at = |port: u16| format!("http://{}:{}", host, port);
        Self {
            user: at(5001),
            product: at(5002),
            inventory: at(5003),
            cart: at(5004),
            order: at(5005),
            wishlist: at(5006),
            payment: at(5007),
            review: at(5008),
        }
    }

    /// Point every service at the same base URL (API gateway deployments)
    pub fn single(base_url: impl Into<String>) -> Self {
        let base = trim(base_url.into());
        Self {
            user: base.clone(),
            product: base.clone(),
            inventory: base.clone(),
            cart: base.clone(),
            order: base.clone(),
            wishlist: base.clone(),
            payment: base.clone(),
            review: base,
        }
    }

    /// URL of the refresh endpoint on the user service
    pub fn refresh_url(&self) -> String {
        join(&self.user, "/refresh")
    }

    /// URL of the logout endpoint on the user service
    pub fn logout_url(&self) -> String {
        join(&self.user, "/logout")
    }
}

/// Join a base URL and a path without doubling or dropping the slash
pub fn join(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

fn trim(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn default_user() -> String {
    ServiceEndpoints::default().user
}

fn default_product() -> String {
    ServiceEndpoints::default().product
}

fn default_inventory() -> String {
    ServiceEndpoints::default().inventory
}

fn default_cart() -> String {
    ServiceEndpoints::default().cart
}

fn default_order() -> String {
    ServiceEndpoints::default().order
}

fn default_wishlist() -> String {
    ServiceEndpoints::default().wishlist
}

fn default_payment() -> String {
    ServiceEndpoints::default().payment
}

fn default_review() -> String {
    ServiceEndpoints::default().review
}
