//! Incident-alerting models.
//!
//! [`IncidentAlert`] is the backend-neutral product of the formatter; the
//! VictorOps and GoAlert event types are the two mutually exclusive wire
//! mappings of it. Only one backend is active in a given deployment.

use serde::Serialize;

/// A backend-neutral incident alert, produced only for ALERT entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentAlert {
    /// Deduplication identity for the incident.
    pub entity_id: String,
    /// Short human-readable description.
    pub display_name: String,
    /// Long-form detail (exception text when present).
    pub detail: String,
    /// Incident start, Unix epoch seconds.
    pub start_time: i64,
    /// Cluster/project/container breadcrumb.
    pub annotation: String,
}

/// VictorOps REST integration message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    /// Opens or re-triggers an incident.
    Critical,
    /// Warning-level event, no paging.
    Warning,
    /// Acknowledges an open incident.
    Acknowledgement,
    /// Informational event.
    Info,
    /// Resolves an open incident.
    Recovery,
}

/// Wire body for the VictorOps REST integration endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct VictorOpsEvent {
    /// Always `CRITICAL` for forwarded alerts.
    pub message_type: MessageType,
    /// Incident deduplication entity.
    pub entity_id: String,
    /// Display name shown in the timeline.
    pub entity_display_name: String,
    /// Long-form state message.
    pub state_message: String,
    /// Unix time in seconds.
    pub state_start_time: i64,
    /// Timeline annotation note.
    #[serde(rename = "vo_annotate.s.Note")]
    pub annotation: String,
}

impl From<&IncidentAlert> for VictorOpsEvent {
    fn from(alert: &IncidentAlert) -> Self {
        Self {
            message_type: MessageType::Critical,
            entity_id: alert.entity_id.clone(),
            entity_display_name: alert.display_name.clone(),
            state_message: alert.detail.clone(),
            state_start_time: alert.start_time,
            annotation: alert.annotation.clone(),
        }
    }
}

/// GoAlert generic-API action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GoAlertAction {
    /// Close a previously opened alert.
    Close,
    /// Open an alert.
    Down,
}

/// Wire body for the GoAlert generic incoming endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GoAlertEvent {
    /// Alert action; the forwarder only ever opens alerts.
    pub action: GoAlertAction,
    /// Long-form details.
    pub details: String,
    /// Short summary shown in the alert list.
    pub summary: String,
    /// Deduplication key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedupe: Option<String>,
}

impl From<&IncidentAlert> for GoAlertEvent {
    fn from(alert: &IncidentAlert) -> Self {
        // GoAlert has no annotation field; surface the breadcrumb in the
        // details when there is no exception text.
        let details = if alert.detail.is_empty() {
            alert.annotation.clone()
        } else {
            alert.detail.clone()
        };
        Self {
            action: GoAlertAction::Down,
            details,
            summary: alert.display_name.clone(),
            dedupe: Some(alert.entity_id.clone()),
        }
    }
}
