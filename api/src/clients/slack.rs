//! Slack Web API client.

use super::{check_response, http_client, normalize_base_url, ChatNotifier, DeliveryError};
use async_trait::async_trait;
use shared::models::SlackMessage;

/// Client for the Slack `chat.postMessage` endpoint.
///
/// Authenticates with a bearer token on every request.
pub struct SlackClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SlackClient {
    /// Create a client against `base_url` (`https://slack.com/api` in
    /// production).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(
        base_url: impl AsRef<str>,
        api_key: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: http_client()?,
            base_url: normalize_base_url(base_url.as_ref()),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl ChatNotifier for SlackClient {
    async fn post_message(&self, message: &SlackMessage) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.base_url))
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await?;
        check_response("slack", response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn message() -> SlackMessage {
        SlackMessage {
            channel: "#alerts".to_string(),
            text: Some("prod-us -> web\n boom".to_string()),
            icon_emoji: Some(":feelsgood:".to_string()),
            enable_markdown: Some(true),
            blocks: vec![],
            attachments: vec![],
        }
    }

    #[tokio::test]
    async fn test_post_message_sends_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat.postMessage")
            .match_header("authorization", "Bearer xoxb-test")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJsonString(
                r##"{"channel": "#alerts", "icon_emoji": ":feelsgood:"}"##.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let client = SlackClient::new(server.url(), "xoxb-test").unwrap();
        client.post_message(&message()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat.postMessage")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let client = SlackClient::new(server.url(), "xoxb-test").unwrap();
        let err = client.post_message(&message()).await.unwrap_err();

        match err {
            DeliveryError::Status { service, status, body } => {
                assert_eq!(service, "slack");
                assert_eq!(status, 500);
                assert_eq!(body, "upstream exploded");
            }
            DeliveryError::Transport(_) => panic!("expected a status error"),
        }
    }
}
