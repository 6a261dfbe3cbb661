//! Outbound HTTP clients for the notification targets.
//!
//! Each client owns a [`reqwest::Client`] with a bounded request timeout
//! and reports failures as [`DeliveryError`]; nothing here retries. The
//! [`ChatNotifier`] and [`IncidentNotifier`] traits are the seams the
//! dispatcher is tested through.

mod goalert;
mod slack;
mod victorops;

pub use goalert::GoAlertClient;
pub use slack::SlackClient;
pub use victorops::VictorOpsClient;

use crate::config::IncidentBackend;
use async_trait::async_trait;
use shared::models::{IncidentAlert, SlackMessage};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Per-request timeout for every outbound call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivery failure from a downstream notification target.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The HTTP request itself failed (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The target answered with a non-success status.
    #[error("{service} returned {status}: {body}")]
    Status {
        /// Which downstream answered.
        service: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, for the failure log.
        body: String,
    },
}

/// Chat delivery seam.
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    /// Post one chat message.
    async fn post_message(&self, message: &SlackMessage) -> Result<(), DeliveryError>;
}

/// Incident delivery seam.
#[async_trait]
pub trait IncidentNotifier: Send + Sync {
    /// Open (or re-trigger) one incident.
    async fn trigger(&self, alert: &IncidentAlert) -> Result<(), DeliveryError>;
}

/// Build the incident notifier selected by configuration.
///
/// # Errors
///
/// Returns an error if the underlying HTTP client cannot be constructed.
pub fn incident_notifier(
    backend: &IncidentBackend,
) -> Result<Arc<dyn IncidentNotifier>, reqwest::Error> {
    match backend {
        IncidentBackend::VictorOps {
            api_url,
            account_id,
            secret_key,
            routing_key,
        } => Ok(Arc::new(VictorOpsClient::new(
            api_url,
            account_id,
            secret_key,
            routing_key,
        )?)),
        IncidentBackend::GoAlert { api_url, token } => {
            Ok(Arc::new(GoAlertClient::new(api_url, token.clone())?))
        }
    }
}

pub(crate) fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()
}

/// Strip a trailing slash so clients can join paths uniformly.
pub(crate) fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Map a response to `Ok` on success, draining the body into the error
/// otherwise so the dispatcher can log it.
pub(crate) async fn check_response(
    service: &'static str,
    response: reqwest::Response,
) -> Result<(), DeliveryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(DeliveryError::Status {
        service,
        status: status.as_u16(),
        body,
    })
}
