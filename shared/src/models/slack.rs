//! Slack Web API message model.
//!
//! Wire types for `chat.postMessage`; field names follow Slack's
//! lower_case_with_underscores convention.

use serde::Serialize;

/// A message posted to `chat.postMessage`.
#[derive(Debug, Clone, Serialize)]
pub struct SlackMessage {
    /// Destination channel.
    pub channel: String,
    /// Top-level summary text (also the push-notification preview).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Emoji shown as the sender avatar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
    /// Enable markdown rendering in `text`.
    #[serde(rename = "mrkdwn", skip_serializing_if = "Option::is_none")]
    pub enable_markdown: Option<bool>,
    /// Layout blocks rendered as the message body.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
    /// Legacy attachments (colored sidebar, field grid).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// A legacy message attachment.
#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    /// Plain-text fallback for clients that cannot render attachments.
    pub fallback: String,
    /// Sidebar color, `#rrggbb`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Text shown above the attachment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretext: Option<String>,
    /// Attachment body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Title/value pairs rendered as a grid.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AttachmentField>,
    /// Attachment parts that should be rendered as markdown.
    #[serde(rename = "mrkdwn_in", skip_serializing_if = "Vec::is_empty")]
    pub markdown_in: Vec<String>,
}

/// One title/value pair in an attachment field grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentField {
    /// Field title.
    pub title: String,
    /// Field value.
    pub value: String,
    /// Render side by side with other short fields.
    #[serde(rename = "short")]
    pub short_value: bool,
}

impl AttachmentField {
    /// A short (side-by-side) field.
    pub fn short(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short_value: true,
        }
    }
}

/// A layout block; only section blocks are used here.
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    /// Block type.
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// Block text.
    pub text: BlockText,
}

impl Block {
    /// A section block with markdown text.
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            block_type: BlockType::Section,
            text: BlockText {
                text_type: BlockTextType::Markdown,
                text: text.into(),
            },
        }
    }
}

/// Block type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    /// A section block.
    Section,
}

/// Text object inside a block.
#[derive(Debug, Clone, Serialize)]
pub struct BlockText {
    /// Text type.
    #[serde(rename = "type")]
    pub text_type: BlockTextType,
    /// The text itself.
    pub text: String,
}

/// Text type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockTextType {
    /// Plain text.
    #[serde(rename = "plain_text")]
    PlainText,
    /// Slack-flavored markdown.
    #[serde(rename = "mrkdwn")]
    Markdown,
}
