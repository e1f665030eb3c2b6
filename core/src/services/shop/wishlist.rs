//! Wishlist operations

use serde_json::json;

use ms_shared::MessageResponse;

use super::client::ShopClient;
use crate::errors::DomainResult;
use crate::gateway::HttpTransport;

impl<T> ShopClient<T>
where
    T: HttpTransport,
{
    /// Ids of the wishlisted products
    pub async fn wishlist(&self, username: &str) -> DomainResult<Vec<String>> {
        let url = Self::resource_url(&self.endpoints().wishlist, "/wishlist", username, "");
        Ok(self.gateway.get(url).await?)
    }

    pub async fn add_to_wishlist(&self, username: &str, product_id: &str) -> DomainResult<String> {
        self.wishlist_change(username, product_id, "/add").await
    }

    pub async fn remove_from_wishlist(
        &self,
        username: &str,
        product_id: &str,
    ) -> DomainResult<String> {
        self.wishlist_change(username, product_id, "/remove").await
    }

    /// Flip membership of a product; returns whether it is now wishlisted
    pub async fn toggle_wishlist(
        &self,
        username: &str,
        product_id: &str,
        is_wishlisted: bool,
    ) -> DomainResult<bool> {
        if is_wishlisted {
            self.remove_from_wishlist(username, product_id).await?;
        } else {
            self.add_to_wishlist(username, product_id).await?;
        }
        Ok(!is_wishlisted)
    }

    async fn wishlist_change(
        &self,
        username: &str,
        product_id: &str,
        action: &str,
    ) -> DomainResult<String> {
        let url = Self::resource_url(&self.endpoints().wishlist, "/wishlist", username, action);
        let response: MessageResponse =
            self.gateway.post(url, &json!({"product_id": product_id})).await?;
        Ok(response.message)
    }
}
