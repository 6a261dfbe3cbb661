//! Common test utilities and helpers for integration tests.
//!
//! Provides router construction against mock downstream servers and
//! request helpers.

use api::{create_router, AppState, Config, IncidentBackend};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};

/// Build a configuration whose outbound targets all point at `base_url`
/// (normally a mockito server).
pub fn test_config(base_url: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        slack_api_url: base_url.to_string(),
        slack_api_key: "xoxb-test".to_string(),
        slack_channel: "#alerts".to_string(),
        kube_project_ids: vec!["acme-prod".to_string()],
        incident: IncidentBackend::VictorOps {
            api_url: base_url.to_string(),
            account_id: "acct".to_string(),
            secret_key: "secret".to_string(),
            routing_key: "oncall".to_string(),
        },
    }
}

/// Creates a test router delivering to `base_url`.
pub fn test_app(base_url: &str) -> Router {
    let state = AppState::from_config(&test_config(base_url)).expect("failed to build app state");
    create_router(state)
}

/// Wrap a log entry in a Pub/Sub push envelope with base64 data.
pub fn push_envelope(entry: &Value) -> Value {
    json!({
        "message": {
            "data": BASE64.encode(entry.to_string()),
            "messageId": "42",
            "publishTime": "2021-05-04T19:47:44Z"
        },
        "subscription": "projects/acme-prod/subscriptions/error-logs"
    })
}

/// Helper to make a POST request with JSON body.
pub async fn post_json(app: Router, uri: &str, body: Value) -> StatusCode {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
    )
    .await
    .unwrap();

    response.status()
}

/// Helper to make a GET request.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}
