//! Wiring of the client stack for one command invocation

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use ms_core::domain::entities::session::SessionState;
use ms_core::session::SessionContext;
use ms_core::{AuthClient, RequestGateway, SessionController, ShopClient};
use ms_infra::{FileTokenStore, ReqwestTransport};
use ms_shared::ClientConfig;

const CREDENTIALS_FILE: &str = "credentials.json";

pub struct App {
    pub config: ClientConfig,
    pub auth: AuthClient<ReqwestTransport>,
    pub shop: ShopClient<ReqwestTransport>,
    transport: Arc<ReqwestTransport>,
    controller: Arc<SessionController<ReqwestTransport>>,
    cookie_path: PathBuf,
}

impl App {
    /// Build the stack and resume the stored session, if any
    pub async fn start(config: ClientConfig) -> Result<Self> {
        let credentials_path = credentials_path(&config);
        let cookie_path = credentials_path.with_extension("cookies");

        let transport = Arc::new(ReqwestTransport::new(&config.http)?);
        if let Ok(header) = tokio::fs::read_to_string(&cookie_path).await {
            transport.restore_cookies(&config.endpoints.refresh_url(), header.trim())?;
        }

        let store = Arc::new(FileTokenStore::new(&credentials_path));
        let session = Arc::new(SessionContext::new(store));
        let gateway = Arc::new(
            RequestGateway::new(transport.clone(), session, config.endpoints.clone())
                .with_refresh_policy(config.session.refresh_policy),
        );

        let auth = AuthClient::new(gateway.clone(), config.auth.clone());
        let shop = ShopClient::new(gateway.clone());
        let controller = Arc::new(SessionController::new(gateway, config.session.clone()));

        if let Some(session) = auth.restore().await? {
            info!(username = %session.username, "Resumed stored session");
        }
        controller.start();

        Ok(Self {
            config,
            auth,
            shop,
            transport,
            controller,
            cookie_path,
        })
    }

    /// Username of the logged-in account
    pub async fn username(&self) -> Result<String> {
        self.auth
            .session()
            .snapshot()
            .await
            .map(|session| session.username)
            .context("Not logged in. Run `micro-shop login <username>` first.")
    }

    /// Stop background tasks and keep the refresh cookie for the next run
    pub async fn finish(&self) -> Result<()> {
        self.controller.shutdown();

        // The watcher may not have seen a late force-logout
        if self.controller.handle_force_logout().await? {
            info!("Session expired, stored credentials removed");
        }

        if self.auth.session().state().await == SessionState::Authenticated {
            let url = self.config.endpoints.refresh_url();
            if let Some(header) = self.transport.cookie_header(&url)? {
                if let Some(parent) = self.cookie_path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(&self.cookie_path, header).await?;
                debug!(path = %self.cookie_path.display(), "Cookies saved");
            }
        } else if self.cookie_path.exists() {
            tokio::fs::remove_file(&self.cookie_path).await?;
        }
        Ok(())
    }
}

fn credentials_path(config: &ClientConfig) -> PathBuf {
    if let Some(path) = &config.session.credentials_path {
        return PathBuf::from(path);
    }
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    home.join(".micro-shop").join(CREDENTIALS_FILE)
}
