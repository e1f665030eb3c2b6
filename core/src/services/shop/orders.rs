//! Order history and checkout

use super::client::ShopClient;
use crate::domain::entities::catalog::{Order, OrderPlaced};
use crate::errors::DomainResult;
use crate::gateway::{ApiRequest, HttpTransport};

impl<T> ShopClient<T>
where
    T: HttpTransport,
{
    pub async fn orders(&self, username: &str) -> DomainResult<Vec<Order>> {
        let url = Self::resource_url(&self.endpoints().order, "/orders", username, "");
        Ok(self.gateway.get(url).await?)
    }

    /// Turn the cart into an order; the order service charges the payment
    /// service and empties the cart
    pub async fn place_order(&self, username: &str) -> DomainResult<OrderPlaced> {
        let url = Self::resource_url(&self.endpoints().order, "/orders/create", username, "");
        Ok(self.gateway.fetch(ApiRequest::post(url)).await?)
    }
}
