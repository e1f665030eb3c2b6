//! Session context shared by the gateway and the service clients

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use ms_shared::mask_token;

use super::signal::ForceLogoutSignal;
use super::token_store::{InMemoryTokenStore, TokenStore};
use crate::domain::entities::session::{Session, SessionState, StoredCredentials};
use crate::domain::entities::token::AccessClaims;
use crate::errors::SessionError;

/// What `mark_expired` found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryMark {
    /// The session was authenticated and is now expired
    Transitioned,
    /// Another caller already marked the session expired
    AlreadyExpired,
    /// There was no authenticated session to expire
    NoSession,
}

#[derive(Debug, Default)]
struct SessionSlot {
    state: SessionState,
    session: Option<Session>,
}

impl SessionSlot {
    fn transition(&mut self, next: SessionState) -> Result<(), SessionError> {
        let from = self.state;
        if !from.can_transition_to(next) {
            return Err(SessionError::InvalidTransition { from, to: next });
        }
        if from != next {
            info!(from = %from, to = %next, "Session state changed");
        }
        self.state = next;
        Ok(())
    }
}

/// The one place that holds the current credentials
///
/// Mutation goes through a narrow API: `establish` on login, `replace_access_token`
/// on refresh, `clear` on logout. Every write happens under a single lock so a
/// reader never observes a half-replaced session.
pub struct SessionContext {
    slot: RwLock<SessionSlot>,
    store: Arc<dyn TokenStore>,
    signal: ForceLogoutSignal,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("signal", &self.signal)
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    /// Create a context backed by `store` with a fresh force-logout signal
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self::with_signal(store, ForceLogoutSignal::new())
    }

    /// Create a context that emits on an existing signal
    pub fn with_signal(store: Arc<dyn TokenStore>, signal: ForceLogoutSignal) -> Self {
        Self {
            slot: RwLock::new(SessionSlot::default()),
            store,
            signal,
        }
    }

    /// Context without persistence
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryTokenStore::new()))
    }

    /// The force-logout signal of this session
    pub fn signal(&self) -> &ForceLogoutSignal {
        &self.signal
    }

    pub async fn state(&self) -> SessionState {
        self.slot.read().await.state
    }

    /// Copy of the current session
    pub async fn snapshot(&self) -> Option<Session> {
        self.slot.read().await.session.clone()
    }

    /// Token to put in the `Authorization` header, if any
    pub async fn access_token(&self) -> Option<String> {
        self.slot
            .read()
            .await
            .session
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    /// Start a session from a freshly issued access token
    ///
    /// The role comes from the token's claims; the username from the login
    /// answer.
    pub async fn establish(
        &self,
        username: &str,
        access_token: &str,
    ) -> Result<Session, SessionError> {
        let claims = AccessClaims::decode_unverified(access_token)?;
        let session = Session::new(username, claims.role(), access_token);

        {
            let mut slot = self.slot.write().await;
            slot.transition(SessionState::Authenticated)?;
            slot.session = Some(session.clone());
        }

        info!(username = %session.username, role = %session.role, "Session established");
        self.persist(&session.credentials()).await;
        Ok(session)
    }

    /// Swap in a refreshed access token, keeping the rest of the session
    ///
    /// Ignored when no session is held (it was cleared while the refresh
    /// was in flight).
    pub async fn replace_access_token(&self, access_token: &str) {
        let credentials = {
            let mut slot = self.slot.write().await;
            match slot.session.as_mut() {
                Some(session) => {
                    session.access_token = access_token.to_string();
                    session.credentials()
                }
                None => {
                    warn!("Refreshed token arrived without a session, dropping it");
                    return;
                }
            }
        };

        debug!(token = %mask_token(access_token), "Access token replaced");
        self.persist(&credentials).await;
    }

    /// The server asked for an OTP step
    ///
    /// Credentials of an expired session are dropped here, so abandoning the
    /// step does not bring them back.
    pub async fn begin_pending_step(&self) -> Result<(), SessionError> {
        let mut slot = self.slot.write().await;
        let from = slot.state;
        slot.transition(SessionState::PendingMfa)?;
        if from == SessionState::Expired {
            slot.session = None;
        }
        Ok(())
    }

    /// Leave the OTP step without a new token
    ///
    /// Returns to `Authenticated` when a session was held before the step,
    /// otherwise to `Anonymous`.
    pub async fn end_pending_step(&self) -> Result<SessionState, SessionError> {
        let mut slot = self.slot.write().await;
        if slot.state != SessionState::PendingMfa {
            return Ok(slot.state);
        }
        let next = if slot.session.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        };
        slot.transition(next)?;
        Ok(next)
    }

    /// Record that a refresh failed
    pub async fn mark_expired(&self) -> ExpiryMark {
        let mut slot = self.slot.write().await;
        match slot.state {
            SessionState::Authenticated => {
                slot.state = SessionState::Expired;
                info!(from = "authenticated", to = "expired", "Session state changed");
                ExpiryMark::Transitioned
            }
            SessionState::Expired => ExpiryMark::AlreadyExpired,
            SessionState::Anonymous | SessionState::PendingMfa => ExpiryMark::NoSession,
        }
    }

    /// Drop all local credentials; returns whether a session was held
    pub async fn clear(&self) -> Result<bool, SessionError> {
        let had_session = {
            let mut slot = self.slot.write().await;
            slot.transition(SessionState::Anonymous)?;
            slot.session.take().is_some()
        };

        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to clear stored credentials");
        }
        Ok(had_session)
    }

    /// Tear down the session only if it is still expired
    ///
    /// A login that completed after the expiry is left alone. Returns whether
    /// credentials were dropped.
    pub async fn discard_expired(&self) -> Result<bool, SessionError> {
        let had_session = {
            let mut slot = self.slot.write().await;
            if slot.state != SessionState::Expired {
                return Ok(false);
            }
            slot.transition(SessionState::Anonymous)?;
            slot.session.take().is_some()
        };

        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to clear stored credentials");
        }
        Ok(had_session)
    }

    /// Record user activity for the inactivity timeout
    pub async fn touch(&self) {
        if let Some(session) = self.slot.write().await.session.as_mut() {
            session.last_activity = Utc::now();
        }
    }

    /// Resume a session left in the token store by a previous run
    ///
    /// A stored token past its `exp` is still resumed: the first request
    /// answers 401 and the gateway refreshes it from the refresh cookie. A
    /// malformed token is discarded.
    pub async fn restore(&self) -> Result<Option<Session>, SessionError> {
        let Some(credentials) = self.store.load().await? else {
            return Ok(None);
        };

        let claims = match AccessClaims::decode_unverified(&credentials.access_token) {
            Ok(claims) => {
                if claims.is_expired_at(Utc::now()) {
                    info!(username = %credentials.username, "Stored token expired, will refresh on first request");
                }
                claims
            }
            Err(e) => {
                warn!(error = %e, "Stored token unreadable, discarding");
                self.store.clear().await?;
                return Ok(None);
            }
        };

        let session = Session::new(
            credentials.username.as_str(),
            claims.role(),
            credentials.access_token.as_str(),
        );
        {
            let mut slot = self.slot.write().await;
            slot.transition(SessionState::Authenticated)?;
            slot.session = Some(session.clone());
        }

        info!(username = %session.username, role = %session.role, "Session restored");
        Ok(Some(session))
    }

    async fn persist(&self, credentials: &StoredCredentials) {
        if let Err(e) = self.store.save(credentials).await {
            warn!(error = %e, "Failed to persist credentials");
        }
    }
}
