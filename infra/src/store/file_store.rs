//! JSON file implementation of `TokenStore`

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use ms_core::domain::entities::session::StoredCredentials;
use ms_core::errors::SessionError;
use ms_core::session::TokenStore;

use crate::error::{InfraError, InfraResult};

/// Keeps the username and access token in a JSON file between runs
///
/// Writes go to a sibling temporary file first and are renamed into place,
/// so a crash never leaves a truncated file behind.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> InfraResult<Option<StoredCredentials>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&contents)?))
    }

    async fn write(&self, credentials: &StoredCredentials) -> InfraResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let staging = self.path.with_extension("tmp");
        tokio::fs::write(&staging, serde_json::to_vec_pretty(credentials)?).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    async fn remove(&self) -> InfraResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(InfraError::Io(e)),
        }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<StoredCredentials>, SessionError> {
        match self.read().await {
            Ok(credentials) => Ok(credentials),
            Err(InfraError::Serialization(e)) => {
                warn!(path = %self.path.display(), error = %e, "Credential file unreadable, ignoring");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, credentials: &StoredCredentials) -> Result<(), SessionError> {
        self.write(credentials).await?;
        debug!(path = %self.path.display(), "Credentials saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        self.remove().await?;
        debug!(path = %self.path.display(), "Credentials removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> FileTokenStore {
        let dir = std::env::temp_dir().join(format!("ms-store-{}", uuid::Uuid::new_v4()));
        FileTokenStore::new(dir.join("credentials.json"))
    }

    #[tokio::test]
    async fn test_missing_file_loads_nothing() {
        let store = temp_store();
        assert!(store.load().await.unwrap().is_none());
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let store = temp_store();
        let credentials = StoredCredentials {
            username: "alice".into(),
            access_token: "token".into(),
        };

        store.save(&credentials).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(credentials));
        assert!(!store.path().with_extension("tmp").exists());

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_ignored() {
        let store = temp_store();
        tokio::fs::create_dir_all(store.path().parent().unwrap()).await.unwrap();
        tokio::fs::write(store.path(), "{not json").await.unwrap();

        assert!(store.load().await.unwrap().is_none());
    }
}
