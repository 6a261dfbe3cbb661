//! VictorOps REST integration client.

use super::{check_response, http_client, normalize_base_url, DeliveryError, IncidentNotifier};
use async_trait::async_trait;
use shared::models::{IncidentAlert, VictorOpsEvent};

/// Client for the VictorOps REST integration endpoint.
///
/// The account id, secret key and routing key are path parameters of the
/// endpoint rather than headers.
pub struct VictorOpsClient {
    client: reqwest::Client,
    endpoint: String,
}

impl VictorOpsClient {
    /// Create a client against `base_url`
    /// (`https://alert.victorops.com` in production).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(
        base_url: impl AsRef<str>,
        account_id: impl AsRef<str>,
        secret_key: impl AsRef<str>,
        routing_key: impl AsRef<str>,
    ) -> Result<Self, reqwest::Error> {
        let endpoint = format!(
            "{}/integrations/generic/{}/alert/{}/{}",
            normalize_base_url(base_url.as_ref()),
            account_id.as_ref(),
            secret_key.as_ref(),
            routing_key.as_ref(),
        );
        Ok(Self {
            client: http_client()?,
            endpoint,
        })
    }
}

#[async_trait]
impl IncidentNotifier for VictorOpsClient {
    async fn trigger(&self, alert: &IncidentAlert) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&VictorOpsEvent::from(alert))
            .send()
            .await?;
        check_response("victorops", response).await
    }
}
