//! # Micro-Shop Core
//!
//! Client-side core of the Micro-Shop storefront. This crate holds the
//! session state machine, the authenticated request gateway that attaches
//! access tokens and refreshes them on 401, and the service clients built on
//! top of it. It has no HTTP library dependency: requests go through the
//! `HttpTransport` trait, implemented in the infrastructure crate.

pub mod domain;
pub mod errors;
pub mod gateway;
pub mod services;
pub mod session;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use gateway::{ApiRequest, HttpMethod, HttpRequest, HttpTransport, RawResponse, RequestGateway};
pub use services::*;
pub use session::*;
