//! Shared configuration and wire types for the Micro-Shop client
//!
//! This crate provides functionality used across the client crates:
//! - Configuration types
//! - Response envelope and error body shapes
//! - The account role enum
//! - Log-safe masking helpers

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AuthFlowConfig, ClientConfig, Environment, HttpConfig, LogFormat, LoggingConfig,
    RefreshPolicy, ServiceEndpoints, SessionConfig,
};
pub use types::{Envelope, ErrorBody, MessageResponse, Role};
pub use utils::{mask_token, mask_url_query};
