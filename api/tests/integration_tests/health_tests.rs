//! Integration tests for the health endpoint.

use axum::http::StatusCode;

use super::common::{get, test_app};

#[tokio::test]
async fn test_health_check() {
    // No outbound call is made for a health probe; the unreachable
    // downstream address is never dialed.
    let app = test_app("http://127.0.0.1:9");

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "siren-api");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = test_app("http://127.0.0.1:9");

    let (status, _) = get(app, "/api/v1/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
