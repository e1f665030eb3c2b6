//! Tests for the request gateway

pub(crate) mod mocks;
