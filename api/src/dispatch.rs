//! Notification dispatch.
//!
//! Chat delivery happens for every entry; incident delivery only for an
//! explicit ALERT severity. The two deliveries are failure-isolated: a
//! failure in either is logged with the response detail and dropped, and
//! never prevents the other from being attempted.

use crate::clients::{ChatNotifier, IncidentNotifier};
use shared::models::{IncidentAlert, LogEntry, LogSeverity, SlackMessage};
use std::sync::Arc;

/// Delivers formatted notifications to the configured targets.
pub struct Dispatcher {
    chat: Arc<dyn ChatNotifier>,
    incident: Arc<dyn IncidentNotifier>,
}

impl Dispatcher {
    /// Create a dispatcher over the two delivery seams.
    pub fn new(chat: Arc<dyn ChatNotifier>, incident: Arc<dyn IncidentNotifier>) -> Self {
        Self { chat, incident }
    }

    /// Deliver the notifications for one entry.
    ///
    /// The chat message is attempted first, always. The incident alert is
    /// attempted only when the entry's severity is an explicit ALERT; an
    /// absent severity shares ALERT's presentation but never this gate.
    /// Delivery failures are logged and swallowed.
    pub async fn dispatch(
        &self,
        entry: &LogEntry,
        message: SlackMessage,
        alert: Option<IncidentAlert>,
    ) {
        if let Err(err) = self.chat.post_message(&message).await {
            tracing::error!(error = %err, "failed to deliver chat notification");
        }

        if entry.severity != Some(LogSeverity::Alert) {
            return;
        }
        if let Some(alert) = alert {
            if let Err(err) = self.incident.trigger(&alert).await {
                tracing::error!(
                    error = %err,
                    entity_id = %alert.entity_id,
                    "failed to deliver incident alert"
                );
            }
        }
    }
}
