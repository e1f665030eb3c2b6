//! Session entity and the session state machine

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use ms_shared::Role;

/// Lifecycle state of the client session
///
/// ```text
/// Anonymous ──login──▶ Authenticated ──refresh failed──▶ Expired
///     │                 │    ▲      │                       │
///     └──206──▶ PendingMfa ──┘      └──logout/idle──▶ Anonymous ◀── teardown
/// ```
///
/// An expired session may also be replaced directly by a new login, so a
/// login that races the teardown is not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No credentials held
    #[default]
    Anonymous,
    /// Holding a usable access token
    Authenticated,
    /// Login or registration answered 206 and waits for an OTP
    PendingMfa,
    /// A refresh failed; waiting for teardown
    Expired,
}

impl SessionState {
    /// Whether `self → next` is a legal transition
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Anonymous, Anonymous)
                | (Anonymous, Authenticated)
                | (Anonymous, PendingMfa)
                | (PendingMfa, PendingMfa)
                | (PendingMfa, Authenticated)
                | (PendingMfa, Anonymous)
                | (Authenticated, Authenticated)
                | (Authenticated, PendingMfa)
                | (Authenticated, Expired)
                | (Authenticated, Anonymous)
                | (Expired, Anonymous)
                | (Expired, Authenticated)
                | (Expired, PendingMfa)
        )
    }

    /// Wire/log name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Anonymous => "anonymous",
            SessionState::Authenticated => "authenticated",
            SessionState::PendingMfa => "pending_mfa",
            SessionState::Expired => "expired",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated user session as seen by the client
///
/// The refresh token is not part of this entity: it lives in the
/// transport's cookie jar and is only ever sent to the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Account name
    pub username: String,

    /// Role decoded from the access token
    pub role: Role,

    /// Current bearer credential
    pub access_token: String,

    /// When the session was established (login or restore)
    pub established_at: DateTime<Utc>,

    /// Last user activity, used for the inactivity timeout
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Creates a session established now
    pub fn new(username: impl Into<String>, role: Role, access_token: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            username: username.into(),
            role,
            access_token: access_token.into(),
            established_at: now,
            last_activity: now,
        }
    }

    /// Time since the last recorded activity
    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_activity
    }

    /// Whether the session has been idle for at least `timeout`
    pub fn is_idle(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        self.idle_for(now) >= timeout
    }

    /// Credentials to persist for this session
    pub fn credentials(&self) -> StoredCredentials {
        StoredCredentials {
            username: self.username.clone(),
            access_token: self.access_token.clone(),
        }
    }
}

/// What a `TokenStore` persists between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub username: String,
    pub access_token: String,
}
