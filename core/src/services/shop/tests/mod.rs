//! Tests for the resource service clients
