//! GoAlert generic-API client.

use super::{check_response, http_client, normalize_base_url, DeliveryError, IncidentNotifier};
use async_trait::async_trait;
use shared::models::{GoAlertEvent, IncidentAlert};

/// Client for a GoAlert instance's generic incoming endpoint.
///
/// GoAlert authenticates with a token query parameter instead of a
/// header or path segment.
pub struct GoAlertClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl GoAlertClient {
    /// Create a client against the GoAlert instance at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(
        base_url: impl AsRef<str>,
        token: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: http_client()?,
            endpoint: format!(
                "{}/api/v2/generic/incoming",
                normalize_base_url(base_url.as_ref())
            ),
            token: token.into(),
        })
    }
}

#[async_trait]
impl IncidentNotifier for GoAlertClient {
    async fn trigger(&self, alert: &IncidentAlert) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("token", self.token.as_str())])
            .json(&GoAlertEvent::from(alert))
            .send()
            .await?;
        check_response("goalert", response).await
    }
}
