//! Type definitions shared by every crate
//!
//! - `response` - Envelope and error body shapes of service responses
//! - `role` - Account roles carried in access token claims

pub mod response;
pub mod role;

pub use response::{Envelope, ErrorBody, MessageResponse};
pub use role::Role;
