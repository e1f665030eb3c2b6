//! Tests for the authentication client
