//! API route definitions.
//!
//! This module organizes all HTTP routes for the Siren notifier.

mod events;
mod health;

pub use events::events_routes;
pub use health::health_routes;
