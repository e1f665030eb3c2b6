//! Session context, credential persistence and the force-logout signal

mod context;
mod signal;
mod token_store;

pub use context::{ExpiryMark, SessionContext};
pub use signal::{ForceLogout, ForceLogoutSignal, ForceLogoutSubscription};
pub use token_store::{InMemoryTokenStore, TokenStore};
