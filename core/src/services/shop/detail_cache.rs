//! Product details needed to render carts, wishlists and orders

use std::collections::HashMap;

use futures_util::future::join_all;
use tokio::sync::RwLock;
use tracing::warn;

use super::client::ShopClient;
use crate::domain::entities::catalog::Product;
use crate::errors::DomainError;
use crate::gateway::HttpTransport;

/// Products already fetched, keyed by id
#[derive(Debug, Default)]
pub struct ProductDetailCache {
    products: RwLock<HashMap<String, Product>>,
}

impl ProductDetailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, product_id: &str) -> Option<Product> {
        self.products.read().await.get(product_id).cloned()
    }

    pub async fn contains(&self, product_id: &str) -> bool {
        self.products.read().await.contains_key(product_id)
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }

    pub(super) async fn insert(&self, product: Product) {
        self.products.write().await.insert(product.id.clone(), product);
    }

    pub(super) async fn insert_all(&self, products: &[Product]) {
        let mut cache = self.products.write().await;
        for product in products {
            cache.insert(product.id.clone(), product.clone());
        }
    }

    pub(super) async fn forget(&self, product_id: &str) {
        self.products.write().await.remove(product_id);
    }
}

/// Result of `ensure_product_details`
#[derive(Debug, Default)]
pub struct DetailFetchReport {
    /// Ids fetched by this call
    pub fetched: Vec<String>,
    /// Ids whose fetch failed, with the reason
    pub failed: Vec<(String, DomainError)>,
}

impl DetailFetchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl<T> ShopClient<T>
where
    T: HttpTransport,
{
    /// Fetch the details of every id not cached yet, concurrently
    ///
    /// Each fetch settles on its own: a failing id is reported without
    /// discarding the details that did arrive.
    pub async fn ensure_product_details(&self, product_ids: &[String]) -> DetailFetchReport {
        let mut missing: Vec<&String> = Vec::new();
        for id in product_ids {
            if !missing.contains(&id) && !self.details.contains(id).await {
                missing.push(id);
            }
        }

        let mut report = DetailFetchReport::default();
        if missing.is_empty() {
            return report;
        }

        let results = join_all(missing.iter().map(|id| self.get_product(id))).await;
        for (id, result) in missing.into_iter().zip(results) {
            match result {
                Ok(product) => {
                    self.details.insert(product).await;
                    report.fetched.push(id.clone());
                }
                Err(e) => {
                    warn!(product_id = %id, error = %e, "Could not load product details");
                    report.failed.push((id.clone(), e));
                }
            }
        }
        report
    }
}
