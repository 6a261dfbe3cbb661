//! Integration tests for the Pub/Sub push endpoint.
//!
//! Each test spins up a mockito server standing in for both Slack and
//! VictorOps, then drives a push envelope through the full router.

use axum::http::StatusCode;
use mockito::Matcher;
use serde_json::json;

use super::common::{post_json, push_envelope, test_app};

fn warning_entry() -> serde_json::Value {
    json!({
        "severity": "WARNING",
        "textPayload": "grpc closed",
        "insertId": "abc123",
        "resource": {"labels": {"project_id": "acme-prod"}}
    })
}

#[tokio::test]
async fn test_warning_sends_chat_with_expected_presentation() {
    let mut server = mockito::Server::new_async().await;

    let slack = server
        .mock("POST", "/chat.postMessage")
        .match_header("authorization", "Bearer xoxb-test")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("#DAA520".to_string()),
            Matcher::Regex("grpc closed".to_string()),
            Matcher::Regex("insertId%3D%22abc123%22".to_string()),
            Matcher::Regex("project=acme-prod".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"ok":true}"#)
        .expect(1)
        .create_async()
        .await;
    let incident = server
        .mock("POST", "/integrations/generic/acct/alert/secret/oncall")
        .expect(0)
        .create_async()
        .await;

    let app = test_app(&server.url());
    let status = post_json(app, "/api/v1/events", push_envelope(&warning_entry())).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    slack.assert_async().await;
    incident.assert_async().await;
}

#[tokio::test]
async fn test_alert_sends_chat_and_incident() {
    let mut server = mockito::Server::new_async().await;

    let slack = server
        .mock("POST", "/chat.postMessage")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let incident = server
        .mock("POST", "/integrations/generic/acct/alert/secret/oncall")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJsonString(
                r#"{"message_type": "CRITICAL", "entity_id": "abc123"}"#.to_string(),
            ),
            // No receiveTimestamp in the entry: the start time defaults
            // to the moment of formatting.
            Matcher::Regex(r#""state_start_time":\d{10}"#.to_string()),
        ]))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let mut entry = warning_entry();
    entry["severity"] = json!("ALERT");

    let app = test_app(&server.url());
    let status = post_json(app, "/api/v1/events", push_envelope(&entry)).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    slack.assert_async().await;
    incident.assert_async().await;
}

#[tokio::test]
async fn test_unknown_severity_notifies_chat_only() {
    let mut server = mockito::Server::new_async().await;

    let slack = server
        .mock("POST", "/chat.postMessage")
        // Outside the closed severity set the entry is presented like an
        // ALERT...
        .match_body(Matcher::Regex("#cc3300".to_string()))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    // ...but never pages anyone.
    let incident = server
        .mock("POST", "/integrations/generic/acct/alert/secret/oncall")
        .expect(0)
        .create_async()
        .await;

    let mut entry = warning_entry();
    entry["severity"] = json!("CRITICAL");

    let app = test_app(&server.url());
    let status = post_json(app, "/api/v1/events", push_envelope(&entry)).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    slack.assert_async().await;
    incident.assert_async().await;
}

#[tokio::test]
async fn test_chat_failure_still_triggers_incident() {
    let mut server = mockito::Server::new_async().await;

    let slack = server
        .mock("POST", "/chat.postMessage")
        .with_status(500)
        .with_body("upstream exploded")
        .expect(1)
        .create_async()
        .await;
    let incident = server
        .mock("POST", "/integrations/generic/acct/alert/secret/oncall")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let mut entry = warning_entry();
    entry["severity"] = json!("ALERT");

    let app = test_app(&server.url());
    let status = post_json(app, "/api/v1/events", push_envelope(&entry)).await;

    // Delivery failures are logged, never surfaced to the subscriber.
    assert_eq!(status, StatusCode::NO_CONTENT);
    slack.assert_async().await;
    incident.assert_async().await;
}

#[tokio::test]
async fn test_incident_failure_is_still_acknowledged() {
    let mut server = mockito::Server::new_async().await;

    let _slack = server
        .mock("POST", "/chat.postMessage")
        .with_status(200)
        .create_async()
        .await;
    let _incident = server
        .mock("POST", "/integrations/generic/acct/alert/secret/oncall")
        .with_status(403)
        .with_body("bad routing key")
        .create_async()
        .await;

    let mut entry = warning_entry();
    entry["severity"] = json!("ALERT");

    let app = test_app(&server.url());
    let status = post_json(app, "/api/v1/events", push_envelope(&entry)).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_undecodable_envelope_dispatches_nothing() {
    let mut server = mockito::Server::new_async().await;

    let slack = server
        .mock("POST", "/chat.postMessage")
        .expect(0)
        .create_async()
        .await;

    let app = test_app(&server.url());
    let status = post_json(
        app,
        "/api/v1/events",
        json!({"message": {"data": "%%% not base64 %%%"}}),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    slack.assert_async().await;
}

#[tokio::test]
async fn test_envelope_without_message_dispatches_nothing() {
    let mut server = mockito::Server::new_async().await;

    let slack = server
        .mock("POST", "/chat.postMessage")
        .expect(0)
        .create_async()
        .await;

    let app = test_app(&server.url());
    let status = post_json(
        app,
        "/api/v1/events",
        json!({"subscription": "projects/acme-prod/subscriptions/error-logs"}),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    slack.assert_async().await;
}
