//! Common utility functions

pub mod masking;

pub use masking::{mask_token, mask_url_query};
