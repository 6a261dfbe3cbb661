//! Notification formatting.
//!
//! Pure mapping from a parsed log entry to the outbound Slack message
//! and, for ALERT entries, the backend-neutral incident alert. The only
//! I/O on this path is the single reverse-DNS lookup used to decorate
//! the remote-host field.

use crate::models::{
    Attachment, AttachmentField, Block, IncidentAlert, LogEntry, LogSeverity, SlackMessage,
};
use crate::resolver::DnsCache;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::sync::Arc;

/// Maximum characters of the payload summary quoted in the chat text.
const SHORT_MESSAGE_LIMIT: usize = 160;

/// Body shown when an entry carries no message at all.
const NO_MESSAGE_PLACEHOLDER: &str = "No message available for this entry";

/// Window on either side of now covered by the cross-project links.
const CONTEXT_WINDOW_SECONDS: i64 = 5;

/// Severity → Slack emoji. An absent severity shares the ALERT row.
fn icon_emoji(severity: Option<LogSeverity>) -> &'static str {
    match severity {
        Some(LogSeverity::Debug) => ":pawprints:",
        Some(LogSeverity::Notice) => ":beetle:",
        Some(LogSeverity::Info) => ":suspect:",
        Some(LogSeverity::Warning) => ":goberserk:",
        Some(LogSeverity::Error) => ":feelsgood:",
        Some(LogSeverity::Alert) | None => ":finnadie:",
    }
}

/// Severity → attachment color. An absent severity shares the ALERT row.
fn color(severity: Option<LogSeverity>) -> &'static str {
    match severity {
        Some(LogSeverity::Debug | LogSeverity::Notice | LogSeverity::Info) => "#339900",
        Some(LogSeverity::Warning) => "#DAA520",
        Some(LogSeverity::Error) => "#8e2300",
        Some(LogSeverity::Alert) | None => "#cc3300",
    }
}

/// Builds outbound notifications from parsed log entries.
///
/// Holds the static pieces of every notification: the destination
/// channel, the related project ids for the cross-project context links,
/// and the resolver used for the remote-host field.
pub struct Formatter {
    channel: String,
    project_ids: Vec<String>,
    resolver: Arc<DnsCache>,
}

impl Formatter {
    /// Create a formatter.
    #[must_use]
    pub fn new(
        channel: impl Into<String>,
        project_ids: Vec<String>,
        resolver: Arc<DnsCache>,
    ) -> Self {
        Self {
            channel: channel.into(),
            project_ids,
            resolver,
        }
    }

    /// Build the chat notification for an entry.
    ///
    /// Awaits at most one resolver call, for the payload's `remoteIp`.
    pub async fn chat_message(&self, entry: &LogEntry) -> SlackMessage {
        let severity_color = color(entry.severity);
        let cluster = entry.resource_label("cluster_name").unwrap_or("N/A");
        let container = entry.resource_label("container_name").unwrap_or("N/A");

        let short_message: String = entry
            .payload
            .summary()
            .unwrap_or("")
            .chars()
            .take(SHORT_MESSAGE_LIMIT)
            .collect();
        let text = format!("{cluster} -> {container}\n {short_message}");

        let body = entry.payload.summary().unwrap_or(NO_MESSAGE_PLACEHOLDER);

        let mut attachments = vec![Attachment {
            fallback: String::new(),
            color: Some(severity_color.to_string()),
            pretext: None,
            text: None,
            fields: self.fields(entry).await,
            markdown_in: vec![],
        }];
        if let Some(exception) = entry.payload.exception() {
            if !exception.trim().is_empty() {
                attachments.push(Attachment {
                    fallback: String::new(),
                    color: Some(severity_color.to_string()),
                    pretext: None,
                    text: Some(format!("*Exception*\n\n```{exception}```")),
                    fields: vec![],
                    markdown_in: vec!["text".to_string()],
                });
            }
        }

        SlackMessage {
            channel: self.channel.clone(),
            text: Some(text),
            icon_emoji: Some(icon_emoji(entry.severity).to_string()),
            enable_markdown: Some(true),
            blocks: vec![
                console_links_block(entry),
                self.context_links_block(Utc::now()),
                Block::markdown(format!("```{body}```")),
            ],
            attachments,
        }
    }

    /// Build the incident alert for an ALERT entry.
    ///
    /// Callers gate on severity; this function itself is severity-blind
    /// so it stays a pure projection of the entry.
    #[must_use]
    pub fn incident_alert(&self, entry: &LogEntry) -> IncidentAlert {
        let display_name = entry
            .payload
            .summary()
            .unwrap_or("No message data found")
            .to_string();
        let detail = entry.payload.exception().unwrap_or("").to_string();
        let start_time = entry
            .received_timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map_or_else(|| Utc::now().timestamp(), |ts| ts.timestamp());

        let cluster = entry.resource_label("cluster_name").unwrap_or("N/A");
        let project = entry.resource_label("project_id").unwrap_or("N/A");
        let container = entry.resource_label("container_name").unwrap_or("N/A");

        IncidentAlert {
            entity_id: entry
                .insert_id
                .clone()
                .unwrap_or_else(|| "No id found".to_string()),
            display_name,
            detail,
            start_time,
            annotation: format!("{cluster} -> {project} -> {container}"),
        }
    }

    /// Ordered attachment fields; each is included only when its source
    /// value is present.
    async fn fields(&self, entry: &LogEntry) -> Vec<AttachmentField> {
        let mut fields = Vec::new();

        if let Some(app) = entry.label("k8s-pod/app") {
            fields.push(AttachmentField::short("App", app));
        }
        if let Some(version) = entry.label("k8s-pod/version") {
            fields.push(AttachmentField::short("Version", version));
        }
        if let Some(commit) = entry.label("k8s-pod/commitId") {
            fields.push(AttachmentField::short("Commit", commit));
        }
        if let Some(cluster) = entry.resource_label("cluster_name") {
            fields.push(AttachmentField::short("Cluster", cluster));
        }
        if let Some(container) = entry.resource_label("container_name") {
            fields.push(AttachmentField::short("Container", container));
        }
        if let Some(project) = entry.resource_label("project_id") {
            fields.push(AttachmentField::short("Project", project));
        }
        if let Some(ip) = entry.payload.remote_ip() {
            let value = match self.resolver.resolve(Some(ip)).await {
                Some(host) => format!("{ip} ({host})"),
                None => ip.to_string(),
            };
            fields.push(AttachmentField::short("Remote Host", value));
        }

        fields
    }

    /// Section block with one console link per related project, covering
    /// now ± the context window.
    fn context_links_block(&self, now: DateTime<Utc>) -> Block {
        let from = (now - Duration::seconds(CONTEXT_WINDOW_SECONDS))
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        let to = (now + Duration::seconds(CONTEXT_WINDOW_SECONDS))
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        let cursor = now.to_rfc3339_opts(SecondsFormat::Millis, true);

        let links = self
            .project_ids
            .iter()
            .map(|project| {
                format!(
                    "<https://console.cloud.google.com/logs/query;query=;timeRange={from}%2F{to};cursorTimestamp={cursor}?project={project}| +/- {CONTEXT_WINDOW_SECONDS} sec for {project}>"
                )
            })
            .collect::<Vec<_>>();

        Block::markdown(links.join(" / "))
    }
}

/// Section block linking to the entry in the cloud console, plus the
/// trace view when the entry carries a trace.
fn console_links_block(entry: &LogEntry) -> Block {
    let log_link = console_log_link(entry);
    let text = match console_trace_link(entry) {
        Some(trace_link) => format!(
            "<{log_link}|Show log in cloud console> / <{trace_link}|Show trace in cloud console>"
        ),
        None => format!("<{log_link}|Show log in cloud console>"),
    };
    Block::markdown(text)
}

fn console_log_link(entry: &LogEntry) -> String {
    let insert_id = urlencoding::encode(entry.insert_id.as_deref().unwrap_or(""));
    let project = entry.resource_label("project_id").unwrap_or("");
    format!(
        "https://console.cloud.google.com/logs/query;query=insertId%3D%22{insert_id}%22;timeRange=P7D?project={project}"
    )
}

fn console_trace_link(entry: &LogEntry) -> Option<String> {
    let trace_id = entry.trace_id()?;
    let project = entry.resource_label("project_id").unwrap_or("");
    Some(format!(
        "https://console.cloud.google.com/traces/list?project={project}&tid={}",
        urlencoding::encode(trace_id)
    ))
}
