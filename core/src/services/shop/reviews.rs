//! Product reviews and their moderation

use serde_json::json;

use ms_shared::config::endpoints::join;
use ms_shared::MessageResponse;

use super::client::ShopClient;
use crate::domain::entities::review::{
    NewReview, RatingSummary, Review, ReviewEligibility, ReviewStatus,
};
use crate::errors::{DomainError, DomainResult};
use crate::gateway::HttpTransport;

impl<T> ShopClient<T>
where
    T: HttpTransport,
{
    /// Approved reviews of a product
    pub async fn reviews(&self, product_id: &str) -> DomainResult<Vec<Review>> {
        let url = Self::resource_url(&self.endpoints().review, "/reviews", product_id, "");
        Ok(self.gateway.get(url).await?)
    }

    pub async fn rating_summary(&self, product_id: &str) -> DomainResult<RatingSummary> {
        let url =
            Self::resource_url(&self.endpoints().review, "/reviews/average", product_id, "");
        Ok(self.gateway.get(url).await?)
    }

    /// Whether the current buyer purchased the product and has not reviewed it yet
    pub async fn review_eligibility(&self, product_id: &str) -> DomainResult<ReviewEligibility> {
        let url = join(&self.endpoints().review, "/reviews/check_eligibility");
        Ok(self
            .gateway
            .post(url, &json!({"product_id": product_id}))
            .await?)
    }

    /// Submit a review; it stays pending until an admin approves it
    pub async fn submit_review(&self, review: &NewReview) -> DomainResult<String> {
        if !(1..=5).contains(&review.rating) {
            return Err(DomainError::Validation {
                message: "Rating must be between 1 and 5".to_string(),
            });
        }
        if review.comment.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Comment is required".to_string(),
            });
        }
        let url = join(&self.endpoints().review, "/reviews/submit");
        let response: MessageResponse = self.gateway.post(url, review).await?;
        Ok(response.message)
    }

    /// Reviews waiting for moderation (admin only)
    pub async fn pending_reviews(&self) -> DomainResult<Vec<Review>> {
        Ok(self
            .gateway
            .get(join(&self.endpoints().review, "/admin/reviews/pending"))
            .await?)
    }

    /// Approve or reject a review (admin only)
    pub async fn set_review_status(
        &self,
        review_id: &str,
        status: ReviewStatus,
    ) -> DomainResult<String> {
        if status == ReviewStatus::Pending {
            return Err(DomainError::Validation {
                message: "Status must be approved or rejected".to_string(),
            });
        }
        let url =
            Self::resource_url(&self.endpoints().review, "/admin/reviews", review_id, "/status");
        let response: MessageResponse =
            self.gateway.put(url, &json!({"status": status})).await?;
        Ok(response.message)
    }

    /// All reviews of the given products (seller only), newest first
    pub async fn seller_reviews(&self, product_ids: &[String]) -> DomainResult<Vec<Review>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = join(&self.endpoints().review, "/seller/reviews");
        Ok(self
            .gateway
            .post(url, &json!({"product_ids": product_ids}))
            .await?)
    }
}
