//! Siren API Server
//!
//! This crate provides the HTTP server for the Siren log notifier. It
//! receives Cloud Logging entries as Pub/Sub push deliveries, formats
//! them into chat notifications, and dispatches them to Slack and - for
//! ALERT entries - to the configured incident service.
//!
//! # Architecture
//!
//! The server is built on Axum and Tokio, providing:
//! - The Pub/Sub push endpoint (`POST /api/v1/events`)
//! - A health endpoint for load balancers (`GET /health`)
//!
//! # Example
//!
//! ```no_run
//! use api::run_server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     run_server().await
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod clients;
mod config;
pub mod dispatch;
mod routes;
mod state;

pub use config::{Config, ConfigError, IncidentBackend};
pub use state::AppState;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Runs the Siren API server.
///
/// This function initializes the server with configuration from
/// environment variables and starts listening for incoming connections.
/// It handles graceful shutdown on SIGTERM/SIGINT signals.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - An outbound HTTP client cannot be constructed
/// - The server fails to bind to the configured address
/// - A fatal error occurs during operation
pub async fn run_server() -> Result<()> {
    let config = Config::from_env()?;
    run_server_with_config(config).await
}

/// Runs the Siren API server with the provided configuration.
///
/// This is useful for testing or when you want to provide configuration
/// programmatically.
///
/// # Errors
///
/// Returns an error if:
/// - An outbound HTTP client cannot be constructed
/// - The server fails to bind to the configured address
/// - A fatal error occurs during operation
pub async fn run_server_with_config(config: Config) -> Result<()> {
    let addr = config.socket_addr();
    let state = AppState::from_config(&config)?;

    tracing::info!(
        host = %config.host,
        port = %config.port,
        channel = %config.slack_channel,
        "Siren notifier starting"
    );

    let app = create_router(state);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Listening for connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Creates the main application router with all routes and middleware.
///
/// This function is public to allow testing the router without starting a
/// full server.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::events_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Waits for a shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
