//! Force-logout signal
//!
//! Raised by the gateway when a refresh fails; observed by whoever owns the
//! session lifecycle (the session controller in this crate).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 16;

/// Payload-less notification that the session ended involuntarily
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForceLogout;

/// Broadcast handle for the force-logout notification
///
/// Clones share the same channel and emission counter.
#[derive(Debug, Clone)]
pub struct ForceLogoutSignal {
    sender: broadcast::Sender<ForceLogout>,
    emitted: Arc<AtomicU64>,
}

impl Default for ForceLogoutSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceLogoutSignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            emitted: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Notify every subscriber; emitting with no subscriber is not an error
    pub fn emit(&self) {
        let total = self.emitted.fetch_add(1, Ordering::SeqCst) + 1;
        let receivers = self.sender.send(ForceLogout).unwrap_or(0);
        debug!(total, receivers, "Force-logout signal emitted");
    }

    /// Subscribe to future emissions
    pub fn subscribe(&self) -> ForceLogoutSubscription {
        ForceLogoutSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of emissions since creation
    pub fn emitted_count(&self) -> u64 {
        self.emitted.load(Ordering::SeqCst)
    }
}

/// Receiving end of a `ForceLogoutSignal`
#[derive(Debug)]
pub struct ForceLogoutSubscription {
    receiver: broadcast::Receiver<ForceLogout>,
}

impl ForceLogoutSubscription {
    /// Wait for the next emission
    ///
    /// Returns `None` once every signal handle is dropped. Emissions missed
    /// because the subscriber lagged collapse into one.
    pub async fn recv(&mut self) -> Option<ForceLogout> {
        match self.receiver.recv().await {
            Ok(signal) => Some(signal),
            Err(broadcast::error::RecvError::Lagged(_)) => Some(ForceLogout),
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }

    /// Drain one pending emission without waiting
    pub fn try_recv(&mut self) -> Option<ForceLogout> {
        match self.receiver.try_recv() {
            Ok(signal) => Some(signal),
            Err(broadcast::error::TryRecvError::Lagged(_)) => Some(ForceLogout),
            Err(_) => None,
        }
    }
}
