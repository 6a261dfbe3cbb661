//! Inbound log event model.
//!
//! Defines the parsed shape of one Cloud Logging entry as delivered by a
//! Pub/Sub push subscription: the severity enumeration, the payload sum
//! type, and the push envelope itself.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Log severity as assigned by Cloud Logging.
///
/// This is a closed set. Entries carrying a severity outside it (or no
/// severity at all) parse to `None`; they borrow the ALERT presentation
/// in chat but never trigger incident dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogSeverity {
    /// Debug or trace information.
    Debug,
    /// Routine information.
    Info,
    /// Normal but significant events.
    Notice,
    /// Events that might cause problems.
    Warning,
    /// Events likely to cause problems.
    Error,
    /// A person must take action immediately.
    Alert,
}

impl LogSeverity {
    /// Parse a severity from its wire name (case-insensitive).
    ///
    /// Returns `None` for anything outside the closed set, including
    /// Cloud Logging severities this service does not classify
    /// (`CRITICAL`, `EMERGENCY`, `DEFAULT`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "NOTICE" => Some(Self::Notice),
            "WARNING" => Some(Self::Warning),
            "ERROR" => Some(Self::Error),
            "ALERT" => Some(Self::Alert),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Notice => write!(f, "NOTICE"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
            Self::Alert => write!(f, "ALERT"),
        }
    }
}

/// Lenient severity deserializer: unknown names become `None` instead of
/// failing the whole entry, so a log with severity `CRITICAL` still
/// produces a chat notification.
fn severity_lenient<'de, D>(deserializer: D) -> Result<Option<LogSeverity>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(LogSeverity::parse))
}

/// The payload of a log entry.
///
/// Cloud Logging populates at most one of `jsonPayload` / `textPayload`;
/// both absent is valid and renders as a placeholder downstream.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    /// Structured key/value payload (`jsonPayload`).
    Json(Map<String, Value>),
    /// Plain text payload (`textPayload`).
    Text(String),
    /// Neither payload field was present.
    #[default]
    Empty,
}

impl Payload {
    fn str_field(&self, key: &str) -> Option<&str> {
        match self {
            Self::Json(map) => map.get(key).and_then(Value::as_str),
            _ => None,
        }
    }

    /// The structured payload's `message` field, if any.
    pub fn message(&self) -> Option<&str> {
        self.str_field("message")
    }

    /// The structured payload's `exception` field, if any.
    pub fn exception(&self) -> Option<&str> {
        self.str_field("exception")
    }

    /// The structured payload's `remoteIp` field, if any.
    pub fn remote_ip(&self) -> Option<&str> {
        self.str_field("remoteIp")
    }

    /// The text payload, if this is a text entry.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The human-readable body of this payload: the structured `message`
    /// field first, then the text payload.
    pub fn summary(&self) -> Option<&str> {
        self.message().or_else(|| self.text())
    }
}

/// The monitored resource a log entry was emitted against.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MonitoredResource {
    /// Resource type, e.g. `k8s_container`.
    #[serde(rename = "type", default)]
    pub resource_type: Option<String>,
    /// Resource labels (`cluster_name`, `project_id`, `container_name`, ...).
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

/// One parsed Cloud Logging entry.
///
/// All fields are optional on the wire; accessors substitute nothing. The
/// payload is a proper sum type rather than a pair of nullable fields.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "WireLogEntry")]
pub struct LogEntry {
    /// Fully qualified log name (carried, not interpreted).
    pub log_name: Option<String>,
    /// The resource the entry was emitted against.
    pub resource: MonitoredResource,
    /// Event timestamp as an RFC 3339 string.
    pub timestamp: Option<String>,
    /// When Cloud Logging received the entry, RFC 3339.
    pub received_timestamp: Option<String>,
    /// Parsed severity; `None` when absent or outside the closed set.
    pub severity: Option<LogSeverity>,
    /// Unique identifier for this log line.
    pub insert_id: Option<String>,
    /// Deployment metadata labels (`k8s-pod/app`, `k8s-pod/version`, ...).
    pub labels: HashMap<String, String>,
    /// Trace resource name; the last `/` segment is the trace id.
    pub trace: Option<String>,
    /// The log payload.
    pub payload: Payload,
}

impl LogEntry {
    /// Look up a resource label by key.
    pub fn resource_label(&self, key: &str) -> Option<&str> {
        self.resource.labels.get(key).map(String::as_str)
    }

    /// Look up a deployment label by key.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// The trace id: the last `/`-delimited segment of `trace`.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace.as_deref().and_then(|t| t.rsplit('/').next())
    }
}

/// Wire-level shape of a log entry.
///
/// The received timestamp is named `receiveTimestamp` on the wire;
/// `receivedTimestamp` is accepted as an alias for older producers.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLogEntry {
    #[serde(default)]
    log_name: Option<String>,
    #[serde(default)]
    resource: MonitoredResource,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default, rename = "receiveTimestamp", alias = "receivedTimestamp")]
    receive_timestamp: Option<String>,
    #[serde(default, deserialize_with = "severity_lenient")]
    severity: Option<LogSeverity>,
    #[serde(default)]
    insert_id: Option<String>,
    #[serde(default)]
    labels: HashMap<String, String>,
    #[serde(default)]
    trace: Option<String>,
    #[serde(default)]
    json_payload: Option<Map<String, Value>>,
    #[serde(default)]
    text_payload: Option<String>,
}

impl From<WireLogEntry> for LogEntry {
    fn from(wire: WireLogEntry) -> Self {
        let payload = match (wire.json_payload, wire.text_payload) {
            (Some(map), _) => Payload::Json(map),
            (None, Some(text)) => Payload::Text(text),
            (None, None) => Payload::Empty,
        };
        Self {
            log_name: wire.log_name,
            resource: wire.resource,
            timestamp: wire.timestamp,
            received_timestamp: wire.receive_timestamp,
            severity: wire.severity,
            insert_id: wire.insert_id,
            labels: wire.labels,
            trace: wire.trace,
            payload,
        }
    }
}

/// A Pub/Sub push delivery.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushEnvelope {
    /// The wrapped message; absent messages are treated as a no-op.
    #[serde(default)]
    pub message: Option<PushMessage>,
    /// Subscription resource name.
    #[serde(default)]
    pub subscription: Option<String>,
}

/// The message part of a push delivery; `data` is base64-encoded UTF-8
/// JSON of a log entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    /// Base64-encoded message body.
    #[serde(default)]
    pub data: Option<String>,
    /// Message attributes set by the publisher.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    /// Pub/Sub message id.
    #[serde(default)]
    pub message_id: Option<String>,
    /// Publish timestamp, RFC 3339.
    #[serde(default)]
    pub publish_time: Option<String>,
}

impl PushMessage {
    /// Decode the base64 `data` field.
    ///
    /// Returns `Ok(None)` when `data` is missing or empty (a no-op
    /// delivery, not an error).
    ///
    /// # Errors
    ///
    /// Returns an error if `data` is present but not valid base64.
    pub fn decode_data(&self) -> Result<Option<Vec<u8>>, base64::DecodeError> {
        match self.data.as_deref() {
            None | Some("") => Ok(None),
            Some(data) => BASE64.decode(data).map(Some),
        }
    }
}
