//! Product catalogue operations

use ms_shared::config::endpoints::join;
use ms_shared::MessageResponse;

use super::client::ShopClient;
use crate::domain::entities::catalog::{NewProduct, Product, ProductUpdate};
use crate::errors::{DomainError, DomainResult};
use crate::gateway::{ApiRequest, HttpTransport};

impl<T> ShopClient<T>
where
    T: HttpTransport,
{
    /// All products; seeds the detail cache
    pub async fn list_products(&self) -> DomainResult<Vec<Product>> {
        let products: Vec<Product> = self
            .gateway
            .get(join(&self.endpoints().product, "/products"))
            .await?;
        self.details.insert_all(&products).await;
        Ok(products)
    }

    pub async fn get_product(&self, product_id: &str) -> DomainResult<Product> {
        let url = Self::resource_url(&self.endpoints().product, "/products", product_id, "");
        Ok(self.gateway.get(url).await?)
    }

    /// Full-text search; an empty query lists everything
    pub async fn search_products(&self, query: &str) -> DomainResult<Vec<Product>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_products().await;
        }
        let request = ApiRequest::get(join(&self.endpoints().product, "/products/search"))
            .query_param("q", query);
        Ok(self.gateway.fetch(request).await?)
    }

    /// Products listed by `owner`
    pub async fn products_owned_by(&self, owner: &str) -> DomainResult<Vec<Product>> {
        let products = self.list_products().await?;
        Ok(products
            .into_iter()
            .filter(|p| p.owner_id.as_deref() == Some(owner))
            .collect())
    }

    /// List a new product (seller only)
    pub async fn create_product(&self, product: &NewProduct) -> DomainResult<Product> {
        if product.name.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Product name is required".to_string(),
            });
        }
        if !(product.price.is_finite() && product.price >= 0.0) {
            return Err(DomainError::Validation {
                message: "Price must be a non-negative number".to_string(),
            });
        }
        let created: Product = self
            .gateway
            .post(join(&self.endpoints().product, "/products"), product)
            .await?;
        self.details.insert(created.clone()).await;
        Ok(created)
    }

    /// Edit an own product (seller only)
    pub async fn update_product(
        &self,
        product_id: &str,
        update: &ProductUpdate,
    ) -> DomainResult<String> {
        let url = Self::resource_url(&self.endpoints().product, "/products", product_id, "");
        let response: MessageResponse = self.gateway.put(url, update).await?;
        self.details.forget(product_id).await;
        Ok(response.message)
    }

    /// Delete an own product (seller only)
    pub async fn delete_product(&self, product_id: &str) -> DomainResult<String> {
        let url = Self::resource_url(&self.endpoints().product, "/products", product_id, "");
        let response: MessageResponse = self.gateway.delete(url).await?;
        self.details.forget(product_id).await;
        Ok(response.message)
    }

    /// Delete any product (admin only)
    pub async fn admin_delete_product(&self, product_id: &str) -> DomainResult<String> {
        let url =
            Self::resource_url(&self.endpoints().product, "/admin/products", product_id, "");
        let response: MessageResponse = self.gateway.delete(url).await?;
        self.details.forget(product_id).await;
        Ok(response.message)
    }
}
