//! Siren Shared Library
//!
//! This crate contains the pieces of the Siren log notifier that do not
//! touch the network edge: the inbound log event model, the outbound
//! notification models, the formatter that maps one to the other, and
//! the cached reverse-DNS resolver.
//!
//! # Modules
//!
//! - [`models`] - Log entries, push envelopes, and notification wire types
//! - [`format`] - Log entry → notification mapping
//! - [`resolver`] - Cached best-effort reverse DNS
//!
//! # Example
//!
//! ```
//! use shared::models::{LogEntry, LogSeverity};
//!
//! let entry: LogEntry = serde_json::from_str(
//!     r#"{"severity": "WARNING", "textPayload": "grpc closed"}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(entry.severity, Some(LogSeverity::Warning));
//! assert_eq!(entry.payload.summary(), Some("grpc closed"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod format;
pub mod models;
pub mod resolver;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
