//! Authentication client
//!
//! Wraps the user service's credential endpoints:
//! - Password login with optional CAPTCHA and OTP step
//! - Direct and staged (OTP-verified) registration
//! - Token refresh, logout and session restore

mod service;

#[cfg(test)]
mod tests;

pub use service::AuthClient;
