//! Cart operations

use serde_json::json;

use ms_shared::MessageResponse;

use super::client::ShopClient;
use crate::domain::entities::catalog::CartItem;
use crate::errors::{DomainError, DomainResult};
use crate::gateway::{ApiRequest, HttpTransport};

impl<T> ShopClient<T>
where
    T: HttpTransport,
{
    pub async fn cart(&self, username: &str) -> DomainResult<Vec<CartItem>> {
        let url = Self::resource_url(&self.endpoints().cart, "/cart", username, "");
        Ok(self.gateway.get(url).await?)
    }

    /// Add `quantity` units of a product
    pub async fn add_to_cart(
        &self,
        username: &str,
        product_id: &str,
        quantity: u32,
    ) -> DomainResult<String> {
        if quantity == 0 {
            return Err(DomainError::Validation {
                message: "Quantity must be positive".to_string(),
            });
        }
        let url = Self::resource_url(&self.endpoints().cart, "/cart", username, "/add");
        let body = json!({"product_id": product_id, "quantity": quantity});
        let response: MessageResponse = self.gateway.post(url, &body).await?;
        Ok(response.message)
    }

    /// Take one unit of a product out of the cart
    pub async fn remove_from_cart(&self, username: &str, product_id: &str) -> DomainResult<String> {
        let url = Self::resource_url(&self.endpoints().cart, "/cart", username, "/remove");
        let body = json!({"product_id": product_id, "quantity": 1});
        let response: MessageResponse = self.gateway.post(url, &body).await?;
        Ok(response.message)
    }

    pub async fn clear_cart(&self, username: &str) -> DomainResult<String> {
        let url = Self::resource_url(&self.endpoints().cart, "/cart", username, "/clear");
        let response: MessageResponse = self.gateway.fetch(ApiRequest::post(url)).await?;
        Ok(response.message)
    }
}
