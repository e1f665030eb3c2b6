//! Persistence of the access token between client runs

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::session::StoredCredentials;
use crate::errors::SessionError;

/// Storage for the credentials of the current session
///
/// The store only ever holds one set of credentials; `save` overwrites
/// whatever was there (last write wins).
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the stored credentials, if any
    async fn load(&self) -> Result<Option<StoredCredentials>, SessionError>;

    /// Replace the stored credentials
    async fn save(&self, credentials: &StoredCredentials) -> Result<(), SessionError>;

    /// Remove the stored credentials
    async fn clear(&self) -> Result<(), SessionError>;
}

/// Token store that keeps credentials for the lifetime of the process
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    credentials: RwLock<Option<StoredCredentials>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with credentials, as if left by a previous run
    pub fn with_credentials(credentials: StoredCredentials) -> Self {
        Self {
            credentials: RwLock::new(Some(credentials)),
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self) -> Result<Option<StoredCredentials>, SessionError> {
        Ok(self.credentials.read().await.clone())
    }

    async fn save(&self, credentials: &StoredCredentials) -> Result<(), SessionError> {
        *self.credentials.write().await = Some(credentials.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.credentials.write().await = None;
        Ok(())
    }
}
