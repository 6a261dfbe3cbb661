//! Siren CLI
//!
//! Command-line interface for poking a running Siren notifier.
//!
//! # Usage
//!
//! ```bash
//! siren --help
//! siren health
//! siren send --severity ALERT --message "synthetic test alert"
//! ```

#![deny(unsafe_code)]

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use clap::{Parser, Subcommand};
use serde_json::json;

/// Siren CLI - log notifier command-line interface
#[derive(Parser)]
#[command(name = "siren")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API server URL
    #[arg(
        short,
        long,
        env = "SIREN_API_URL",
        default_value = "http://localhost:8080"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API server health
    Health,
    /// Inject a synthetic log entry through the push endpoint
    Send {
        /// Severity of the synthetic entry
        #[arg(short, long, default_value = "ERROR")]
        severity: String,

        /// Message text of the synthetic entry
        #[arg(short, long, default_value = "Synthetic test entry from the siren CLI")]
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Health) => health(&cli.api_url).await,
        Some(Commands::Send { severity, message }) => {
            send(&cli.api_url, &severity, &message).await
        }
        None => {
            println!("Siren CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
            Ok(())
        }
    }
}

async fn health(api_url: &str) -> Result<()> {
    let url = format!("{api_url}/health");
    let response = reqwest::get(&url)
        .await
        .with_context(|| format!("failed to reach {url}"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("health check failed: {status}");
    }

    let body: serde_json::Value = response
        .json()
        .await
        .context("health endpoint returned non-JSON")?;
    println!(
        "{} is {} (v{})",
        body["service"].as_str().unwrap_or("?"),
        body["status"].as_str().unwrap_or("?"),
        body["version"].as_str().unwrap_or("?"),
    );
    Ok(())
}

/// Build a synthetic entry shaped like a real Cloud Logging line and push
/// it through the notifier, end to end.
async fn send(api_url: &str, severity: &str, message: &str) -> Result<()> {
    let now = chrono::Utc::now();
    let entry = json!({
        "insertId": format!("siren-cli-{}", now.timestamp_millis()),
        "severity": severity,
        "jsonPayload": {"message": message},
        "resource": {
            "type": "k8s_container",
            "labels": {
                "cluster_name": "cli",
                "project_id": "cli",
                "container_name": "siren-cli"
            }
        },
        "labels": {"k8s-pod/app": "siren-cli"},
        "receiveTimestamp": now.to_rfc3339()
    });
    let envelope = json!({
        "message": {
            "data": BASE64.encode(entry.to_string()),
            "messageId": format!("siren-cli-{}", now.timestamp_millis())
        }
    });

    let url = format!("{api_url}/api/v1/events");
    let response = reqwest::Client::new()
        .post(&url)
        .json(&envelope)
        .send()
        .await
        .with_context(|| format!("failed to reach {url}"))?;

    if !response.status().is_success() {
        bail!("event rejected: {}", response.status());
    }
    println!("Sent {severity} entry to {url}");
    Ok(())
}
