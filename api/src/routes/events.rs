//! Pub/Sub push endpoint.
//!
//! Boundary adapter only: decode the push envelope, parse the log entry,
//! then hand off to the formatter and dispatcher. Every outcome is
//! acknowledged with 204 — a non-success answer would make Pub/Sub
//! redeliver the entry, turning one poison log line into a notification
//! storm.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use shared::models::{LogEntry, LogSeverity, PushEnvelope};

/// Creates the event ingestion routes.
pub fn events_routes() -> Router<AppState> {
    Router::new().route("/api/v1/events", post(receive_event))
}

/// Handler for one Pub/Sub push delivery.
async fn receive_event(
    State(state): State<AppState>,
    payload: Result<Json<PushEnvelope>, JsonRejection>,
) -> StatusCode {
    let Json(envelope) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            tracing::info!(
                error = %rejection.body_text(),
                "received push without a decodable envelope"
            );
            return StatusCode::NO_CONTENT;
        }
    };

    let Some(message) = envelope.message else {
        tracing::info!("received push without a message");
        return StatusCode::NO_CONTENT;
    };

    let data = match message.decode_data() {
        Ok(Some(data)) => data,
        Ok(None) => {
            tracing::info!(message_id = ?message.message_id, "received push without data");
            return StatusCode::NO_CONTENT;
        }
        Err(err) => {
            tracing::info!(
                error = %err,
                message_id = ?message.message_id,
                "received push with undecodable data"
            );
            return StatusCode::NO_CONTENT;
        }
    };

    let entry: LogEntry = match serde_json::from_slice(&data) {
        Ok(entry) => entry,
        Err(err) => {
            tracing::error!(
                error = %err,
                payload = %String::from_utf8_lossy(&data),
                "failed to parse log entry, dropping it"
            );
            return StatusCode::NO_CONTENT;
        }
    };

    process_entry(&state, &entry).await;
    StatusCode::NO_CONTENT
}

/// Format and dispatch one parsed entry.
async fn process_entry(state: &AppState, entry: &LogEntry) {
    let message = state.formatter().chat_message(entry).await;
    // The incident alert is only ever built for an explicit ALERT; the
    // dispatcher checks the same gate independently.
    let alert = (entry.severity == Some(LogSeverity::Alert))
        .then(|| state.formatter().incident_alert(entry));
    state.dispatcher().dispatch(entry, message, alert).await;
}
