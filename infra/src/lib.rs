//! # Micro-Shop Infrastructure
//!
//! Concrete implementations of the seams declared by `ms_core`, plus the
//! process-level setup the binary needs.
//!
//! ## Modules
//!
//! - **http**: `reqwest` transport with a cookie jar holding the refresh token
//! - **store**: JSON file token store for credentials kept between runs
//! - **config**: Layered configuration (defaults, file, environment)
//! - **telemetry**: `tracing-subscriber` initialisation

pub mod config;
pub mod error;
pub mod http;
pub mod store;
pub mod telemetry;

pub use config::ConfigLoader;
pub use error::{InfraError, InfraResult};
pub use http::ReqwestTransport;
pub use store::FileTokenStore;
pub use telemetry::init_tracing;
