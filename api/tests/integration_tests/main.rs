//! Integration tests for the Siren API.
//!
//! These tests drive the full router - push envelope in, notifications
//! out - with the outbound Slack and incident deliveries captured by a
//! mock HTTP server.

mod common;
mod health_tests;
mod push_tests;
