//! Account administration

use serde_json::json;

use ms_shared::config::endpoints::join;
use ms_shared::{MessageResponse, Role};

use super::client::ShopClient;
use crate::domain::entities::account::UserAccount;
use crate::errors::DomainResult;
use crate::gateway::HttpTransport;

impl<T> ShopClient<T>
where
    T: HttpTransport,
{
    /// All accounts (admin only)
    pub async fn users(&self) -> DomainResult<Vec<UserAccount>> {
        Ok(self
            .gateway
            .get(join(&self.endpoints().user, "/admin/users"))
            .await?)
    }

    /// Change an account's role (admin only)
    pub async fn change_role(&self, username: &str, role: Role) -> DomainResult<String> {
        let url = Self::resource_url(&self.endpoints().user, "/admin/users", username, "/role");
        let response: MessageResponse = self.gateway.put(url, &json!({"role": role})).await?;
        Ok(response.message)
    }
}
