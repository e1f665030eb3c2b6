//! Direct payment processing

use ms_shared::config::endpoints::join;

use super::client::ShopClient;
use crate::domain::entities::catalog::{PaymentReceipt, PaymentRequest};
use crate::errors::{DomainError, DomainResult};
use crate::gateway::HttpTransport;

impl<T> ShopClient<T>
where
    T: HttpTransport,
{
    /// Charge `amount` to `username`
    ///
    /// A declined payment is answered with 402 and surfaces as a status
    /// error carrying the decline reason.
    pub async fn pay(&self, username: &str, amount: f64) -> DomainResult<PaymentReceipt> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(DomainError::Validation {
                message: "Amount must be positive".to_string(),
            });
        }
        let request = PaymentRequest {
            user_id: username.to_string(),
            amount,
        };
        let url = join(&self.endpoints().payment, "/payment/process");
        Ok(self.gateway.post(url, &request).await?)
    }
}
