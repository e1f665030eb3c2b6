//! Role dashboards
//!
//! Each role sees one dashboard whose sections load concurrently. A section
//! that fails does not take the others down: every section carries its own
//! `DomainResult`.

use tracing::{info, warn};

use ms_shared::Role;

use crate::domain::entities::account::UserAccount;
use crate::domain::entities::catalog::{CartItem, InventoryRecord, Order, Product};
use crate::domain::entities::review::Review;
use crate::errors::{DomainError, DomainResult, SessionError};
use crate::gateway::HttpTransport;
use crate::services::shop::{DetailFetchReport, ShopClient};

#[cfg(test)]
mod tests;

/// Dashboard variant, selected by the account role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dashboard {
    Buyer,
    Seller,
    Admin,
}

impl Dashboard {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Buyer => Dashboard::Buyer,
            Role::Seller => Dashboard::Seller,
            Role::Admin => Dashboard::Admin,
        }
    }

    /// Load the dashboard of the current session's role
    pub async fn load_for_session<T>(shop: &ShopClient<T>) -> DomainResult<DashboardSnapshot>
    where
        T: HttpTransport,
    {
        let session = shop
            .session()
            .snapshot()
            .await
            .ok_or(SessionError::NotAuthenticated)?;
        let dashboard = Self::for_role(session.role);
        Ok(dashboard.load(shop, &session.username).await)
    }

    /// Load every section for `username`
    pub async fn load<T>(&self, shop: &ShopClient<T>, username: &str) -> DashboardSnapshot
    where
        T: HttpTransport,
    {
        let snapshot = match self {
            Dashboard::Buyer => DashboardSnapshot::Buyer(load_buyer(shop, username).await),
            Dashboard::Seller => DashboardSnapshot::Seller(load_seller(shop, username).await),
            Dashboard::Admin => DashboardSnapshot::Admin(load_admin(shop).await),
        };

        let failed = snapshot.failed_sections();
        if failed.is_empty() {
            info!(dashboard = ?self, username = %username, "Dashboard loaded");
        } else {
            warn!(
                dashboard = ?self,
                username = %username,
                failed = ?failed,
                "Dashboard loaded with failed sections"
            );
        }
        snapshot
    }
}

/// Products, cart, wishlist and orders of a buyer
#[derive(Debug)]
pub struct BuyerSnapshot {
    pub products: DomainResult<Vec<Product>>,
    pub cart: DomainResult<Vec<CartItem>>,
    pub wishlist: DomainResult<Vec<String>>,
    pub orders: DomainResult<Vec<Order>>,
    /// Details fetched for cart and wishlist entries not in the catalogue listing
    pub details: DetailFetchReport,
}

/// Own products and the reviews they received
#[derive(Debug)]
pub struct SellerSnapshot {
    pub products: DomainResult<Vec<Product>>,
    /// `None` when the products could not be loaded
    pub reviews: Option<DomainResult<Vec<Review>>>,
}

/// Accounts, stock and the moderation queue
#[derive(Debug)]
pub struct AdminSnapshot {
    pub users: DomainResult<Vec<UserAccount>>,
    pub inventory: DomainResult<Vec<InventoryRecord>>,
    pub pending_reviews: DomainResult<Vec<Review>>,
}

/// Loaded dashboard
#[derive(Debug)]
pub enum DashboardSnapshot {
    Buyer(BuyerSnapshot),
    Seller(SellerSnapshot),
    Admin(AdminSnapshot),
}

impl DashboardSnapshot {
    /// Names of the sections that failed to load
    pub fn failed_sections(&self) -> Vec<&'static str> {
        self.errors().into_iter().map(|(name, _)| name).collect()
    }

    /// Whether any section failed because the session expired
    pub fn session_expired(&self) -> bool {
        self.errors().iter().any(|(_, e)| e.is_session_expired())
    }

    pub fn is_complete(&self) -> bool {
        self.errors().is_empty()
    }

    fn errors(&self) -> Vec<(&'static str, &DomainError)> {
        let mut errors = Vec::new();
        match self {
            DashboardSnapshot::Buyer(s) => {
                push_err(&mut errors, "products", &s.products);
                push_err(&mut errors, "cart", &s.cart);
                push_err(&mut errors, "wishlist", &s.wishlist);
                push_err(&mut errors, "orders", &s.orders);
            }
            DashboardSnapshot::Seller(s) => {
                push_err(&mut errors, "products", &s.products);
                if let Some(reviews) = &s.reviews {
                    push_err(&mut errors, "reviews", reviews);
                }
            }
            DashboardSnapshot::Admin(s) => {
                push_err(&mut errors, "users", &s.users);
                push_err(&mut errors, "inventory", &s.inventory);
                push_err(&mut errors, "pending_reviews", &s.pending_reviews);
            }
        }
        errors
    }
}

fn push_err<'a, V>(
    errors: &mut Vec<(&'static str, &'a DomainError)>,
    name: &'static str,
    section: &'a DomainResult<V>,
) {
    if let Err(e) = section {
        errors.push((name, e));
    }
}

async fn load_buyer<T>(shop: &ShopClient<T>, username: &str) -> BuyerSnapshot
where
    T: HttpTransport,
{
    let (products, cart, wishlist, orders) = tokio::join!(
        shop.list_products(),
        shop.cart(username),
        shop.wishlist(username),
        shop.orders(username),
    );

    let mut wanted: Vec<String> = Vec::new();
    if let Ok(items) = &cart {
        wanted.extend(items.iter().map(|item| item.product_id.clone()));
    }
    if let Ok(ids) = &wishlist {
        wanted.extend(ids.iter().cloned());
    }
    let details = shop.ensure_product_details(&wanted).await;

    BuyerSnapshot {
        products,
        cart,
        wishlist,
        orders,
        details,
    }
}

async fn load_seller<T>(shop: &ShopClient<T>, username: &str) -> SellerSnapshot
where
    T: HttpTransport,
{
    let products = shop.products_owned_by(username).await;
    let reviews = match &products {
        Ok(own) => {
            let ids: Vec<String> = own.iter().map(|p| p.id.clone()).collect();
            Some(shop.seller_reviews(&ids).await)
        }
        Err(_) => None,
    };
    SellerSnapshot { products, reviews }
}

async fn load_admin<T>(shop: &ShopClient<T>) -> AdminSnapshot
where
    T: HttpTransport,
{
    let (users, inventory, pending_reviews) = tokio::join!(
        shop.users(),
        shop.admin_inventory(),
        shop.pending_reviews(),
    );
    AdminSnapshot {
        users,
        inventory,
        pending_reviews,
    }
}
