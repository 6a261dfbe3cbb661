//! Service configuration.
//!
//! All configuration is environment-sourced and validated eagerly at
//! startup: a missing variable fails `from_env` with a typed error before
//! the server binds, and nothing reads the environment after that.

use std::net::SocketAddr;
use thiserror::Error;

const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";
const DEFAULT_VICTOROPS_API_URL: &str = "https://alert.victorops.com";

/// Errors produced by configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// A variable is present but cannot be used.
    #[error("invalid value for {name}: {reason}")]
    InvalidVar {
        /// The offending variable.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// No incident backend is configured.
    #[error(
        "no incident backend configured: set VICTOROPS_ACCOUNT_ID/VICTOROPS_SECRET_KEY/VICTOROPS_ROUTING_KEY or GO_ALERT_TOKEN"
    )]
    MissingIncidentBackend,

    /// Both incident backends are configured at once.
    #[error("both VictorOps and GoAlert are configured; set exactly one incident backend")]
    AmbiguousIncidentBackend,
}

/// The incident-alerting backend; exactly one is active per deployment.
#[derive(Debug, Clone)]
pub enum IncidentBackend {
    /// VictorOps REST integration.
    VictorOps {
        /// Base URL, overridable via `VICTOROPS_API_URL`.
        api_url: String,
        /// Integration account id.
        account_id: String,
        /// Integration secret key.
        secret_key: String,
        /// Routing key selecting the paging policy.
        routing_key: String,
    },
    /// GoAlert generic-API integration.
    GoAlert {
        /// Base URL of the GoAlert instance.
        api_url: String,
        /// Integration token.
        token: String,
    },
}

/// Service configuration.
///
/// Environment variables:
/// - `SIREN_HOST`: bind address (default `0.0.0.0`)
/// - `SIREN_PORT`: listen port (default `8080`)
/// - `SLACK_API_KEY`: Slack bot token (required)
/// - `SLACK_CHANNEL`: destination channel (required)
/// - `KUBE_PROJECT_IDS`: comma-separated related project ids (required)
/// - `SLACK_API_URL`: Slack base URL override (optional)
/// - `VICTOROPS_ACCOUNT_ID` / `VICTOROPS_SECRET_KEY` /
///   `VICTOROPS_ROUTING_KEY` (+ optional `VICTOROPS_API_URL`), or
///   `GO_ALERT_TOKEN` + `GOALERT_API_URL`: the incident backend
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Slack API base URL.
    pub slack_api_url: String,
    /// Slack bot token.
    pub slack_api_key: String,
    /// Destination Slack channel.
    pub slack_channel: String,
    /// Related project ids for the cross-project context links.
    pub kube_project_ids: Vec<String>,
    /// Selected incident backend.
    pub incident: IncidentBackend,
}

impl Config {
    /// Creates a configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is missing, a
    /// value cannot be parsed, or the incident backend selection is
    /// absent or ambiguous.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Creates a configuration from an arbitrary variable lookup.
    pub(crate) fn from_vars<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = get("SIREN_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match get("SIREN_PORT") {
            None => 8080,
            Some(raw) => raw.parse::<u16>().map_err(|err| ConfigError::InvalidVar {
                name: "SIREN_PORT",
                reason: err.to_string(),
            })?,
        };

        let slack_api_key = require(&get, "SLACK_API_KEY")?;
        let slack_channel = require(&get, "SLACK_CHANNEL")?;
        let kube_project_ids = parse_project_ids(&require(&get, "KUBE_PROJECT_IDS")?)?;
        let slack_api_url =
            get("SLACK_API_URL").unwrap_or_else(|| DEFAULT_SLACK_API_URL.to_string());
        let incident = incident_backend(&get)?;

        Ok(Self {
            host,
            port,
            slack_api_url,
            slack_api_key,
            slack_channel,
            kube_project_ids,
            incident,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Panics
    ///
    /// Panics if the host and port combination cannot be parsed as a
    /// valid socket address.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address from config")
    }
}

fn require<F>(get: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

fn parse_project_ids(raw: &str) -> Result<Vec<String>, ConfigError> {
    let ids: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect();

    if ids.is_empty() {
        return Err(ConfigError::InvalidVar {
            name: "KUBE_PROJECT_IDS",
            reason: "expected a comma-separated list of project ids".to_string(),
        });
    }
    Ok(ids)
}

fn incident_backend<F>(get: &F) -> Result<IncidentBackend, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let is_set = |name: &str| get(name).is_some_and(|value| !value.trim().is_empty());

    let victorops_set = ["VICTOROPS_ACCOUNT_ID", "VICTOROPS_SECRET_KEY", "VICTOROPS_ROUTING_KEY"]
        .iter()
        .any(|name| is_set(name));
    let goalert_set = is_set("GO_ALERT_TOKEN");

    match (victorops_set, goalert_set) {
        (true, true) => Err(ConfigError::AmbiguousIncidentBackend),
        (false, false) => Err(ConfigError::MissingIncidentBackend),
        (true, false) => Ok(IncidentBackend::VictorOps {
            api_url: get("VICTOROPS_API_URL")
                .unwrap_or_else(|| DEFAULT_VICTOROPS_API_URL.to_string()),
            account_id: require(get, "VICTOROPS_ACCOUNT_ID")?,
            secret_key: require(get, "VICTOROPS_SECRET_KEY")?,
            routing_key: require(get, "VICTOROPS_ROUTING_KEY")?,
        }),
        (false, true) => Ok(IncidentBackend::GoAlert {
            api_url: require(get, "GOALERT_API_URL")?,
            token: require(get, "GO_ALERT_TOKEN")?,
        }),
    }
}
