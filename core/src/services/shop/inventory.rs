//! Stock levels

use serde_json::json;

use ms_shared::config::endpoints::join;

use super::client::ShopClient;
use crate::domain::entities::catalog::{InventoryRecord, InventoryUpdated};
use crate::errors::{DomainError, DomainResult};
use crate::gateway::HttpTransport;

impl<T> ShopClient<T>
where
    T: HttpTransport,
{
    /// Public stock listing
    pub async fn inventory(&self) -> DomainResult<Vec<InventoryRecord>> {
        Ok(self
            .gateway
            .get(join(&self.endpoints().inventory, "/inventory"))
            .await?)
    }

    /// Stock of one product; unknown products report zero
    pub async fn stock(&self, product_id: &str) -> DomainResult<InventoryRecord> {
        let url = Self::resource_url(&self.endpoints().inventory, "/inventory", product_id, "");
        Ok(self.gateway.get(url).await?)
    }

    /// Stock listing through the admin endpoint
    pub async fn admin_inventory(&self) -> DomainResult<Vec<InventoryRecord>> {
        Ok(self
            .gateway
            .get(join(&self.endpoints().inventory, "/admin/inventory"))
            .await?)
    }

    /// Set the stock of a product (admin only)
    pub async fn update_stock(
        &self,
        product_id: &str,
        quantity: i64,
    ) -> DomainResult<InventoryUpdated> {
        if quantity < 0 {
            return Err(DomainError::Validation {
                message: "Quantity must not be negative".to_string(),
            });
        }
        let url = join(&self.endpoints().inventory, "/admin/inventory/update");
        let body = json!({"product_id": product_id, "quantity": quantity});
        Ok(self.gateway.post(url, &body).await?)
    }
}
