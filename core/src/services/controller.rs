//! Session controller
//!
//! Owns the parts of the session lifecycle nobody asks for explicitly: the
//! teardown after a force-logout and the logout after a period of inactivity.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use ms_shared::SessionConfig;

use crate::domain::value_objects::ApiOutcome;
use crate::errors::DomainResult;
use crate::gateway::{HttpTransport, RequestGateway};

/// Why the controller ended a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownReason {
    ForceLogout,
    Inactivity,
}

/// Background supervisor of one session
pub struct SessionController<T>
where
    T: HttpTransport,
{
    gateway: Arc<RequestGateway<T>>,
    config: SessionConfig,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<T> SessionController<T>
where
    T: HttpTransport + 'static,
{
    /// Create a new session controller
    ///
    /// # Arguments
    ///
    /// * `gateway` - Gateway whose session is supervised
    /// * `config` - Inactivity timeout and check interval
    pub fn new(gateway: Arc<RequestGateway<T>>, config: SessionConfig) -> Self {
        Self {
            gateway,
            config,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Spawn the force-logout watcher and, when enabled, the inactivity monitor
    pub fn start(self: &Arc<Self>) {
        let watcher = self.spawn_force_logout_watcher();
        let monitor = self.spawn_inactivity_monitor();

        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.push(watcher);
            tasks.extend(monitor);
        }
    }

    /// Record user activity
    pub async fn touch(&self) {
        self.gateway.session().touch().await;
    }

    /// Tear down after a force-logout; returns whether a session was held
    ///
    /// Only a session still in `Expired` is dropped; a login that completed
    /// after the signal was raised survives. The server is notified only when
    /// credentials were actually dropped, so a repeated signal does not
    /// produce repeated logout calls.
    pub async fn handle_force_logout(&self) -> DomainResult<bool> {
        let had_session = self.gateway.session().discard_expired().await?;
        self.notify_logout(TeardownReason::ForceLogout, had_session).await;
        Ok(had_session)
    }

    /// Log out if the session has been idle too long
    pub async fn run_inactivity_check(&self) -> DomainResult<bool> {
        self.check_inactivity_at(Utc::now()).await
    }

    /// Inactivity check against an explicit clock reading
    pub async fn check_inactivity_at(&self, now: DateTime<Utc>) -> DomainResult<bool> {
        if !self.config.inactivity_enabled() {
            return Ok(false);
        }
        let Some(session) = self.gateway.session().snapshot().await else {
            return Ok(false);
        };

        let timeout = Duration::seconds(self.config.inactivity_timeout_secs as i64);
        if !session.is_idle(now, timeout) {
            return Ok(false);
        }

        info!(
            username = %session.username,
            idle_secs = session.idle_for(now).num_seconds(),
            "Session idle, logging out"
        );
        let had_session = self.gateway.session().clear().await?;
        self.notify_logout(TeardownReason::Inactivity, had_session).await;
        Ok(had_session)
    }

    /// Stop the background tasks
    pub fn shutdown(&self) {
        if let Ok(mut tasks) = self.tasks.lock() {
            for task in tasks.drain(..) {
                task.abort();
            }
        }
        debug!("Session controller stopped");
    }

    /// Number of running background tasks
    pub fn running_tasks(&self) -> usize {
        self.tasks
            .lock()
            .map(|tasks| tasks.iter().filter(|t| !t.is_finished()).count())
            .unwrap_or(0)
    }

    async fn notify_logout(&self, reason: TeardownReason, had_session: bool) {
        if !had_session {
            debug!(reason = ?reason, "No session to tear down");
            return;
        }

        info!(reason = ?reason, "Session torn down");
        let url = self.gateway.endpoints().logout_url();
        if let ApiOutcome::Suppressed { message, .. } = self.gateway.post_best_effort(url).await {
            debug!(reason = ?reason, error = %message, "Logout notification failed");
        }
    }

    fn spawn_force_logout_watcher(self: &Arc<Self>) -> JoinHandle<()> {
        // Subscribed before spawning so no emission after `start` is missed
        let mut subscription = self.gateway.session().signal().subscribe();
        let controller = Arc::clone(self);

        tokio::spawn(async move {
            while subscription.recv().await.is_some() {
                if let Err(e) = controller.handle_force_logout().await {
                    warn!(error = %e, "Force-logout teardown failed");
                }
            }
        })
    }

    fn spawn_inactivity_monitor(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.inactivity_enabled() {
            info!("Inactivity timeout disabled");
            return None;
        }

        let period = std::time::Duration::from_secs(self.config.inactivity_check_interval_secs.max(1));
        let controller = Arc::clone(self);

        Some(tokio::spawn(async move {
            info!(
                timeout_secs = controller.config.inactivity_timeout_secs,
                "Inactivity monitor started"
            );
            let mut timer = tokio::time::interval(period);
            loop {
                timer.tick().await;
                if let Err(e) = controller.run_inactivity_check().await {
                    warn!(error = %e, "Inactivity check failed");
                }
            }
        }))
    }
}
