//! Session record and history entry types.
//!
//! One `SessionRecord` corresponds to one line of a session JSONL file.
//! Defaults for every field: absent. A record with nothing but `{}` is valid
//! and simply contributes to no counter.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record types that count as messages.
pub const MESSAGE_TYPES: [&str; 2] = ["user", "assistant"];

/// One line of a session log file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionRecord {
    /// Event timestamp (RFC 3339). Records without one still count toward
    /// message and tool totals, but not time-bucketed stats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Record type: "user", "assistant", or anything else.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,

    /// Git branch active when the event was logged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,

    /// Conversation session identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// The message payload, when the record carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageBody>,

    /// Unknown fields, preserved.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl SessionRecord {
    /// Whether this record counts as a message (type `user` or `assistant`).
    #[must_use]
    pub fn is_message(&self) -> bool {
        self.record_type
            .as_deref()
            .is_some_and(|t| MESSAGE_TYPES.contains(&t))
    }

    /// Whether this is an assistant record.
    #[must_use]
    pub fn is_assistant(&self) -> bool {
        self.record_type.as_deref() == Some("assistant")
    }

    /// The model identifier carried by this record, if any.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.message.as_ref()?.model.as_deref()
    }

    /// Names of `tool_use` content blocks, in order.
    #[must_use]
    pub fn tool_use_names(&self) -> Vec<&str> {
        match self.message.as_ref().and_then(|m| m.content.as_ref()) {
            Some(MessageContent::Blocks(blocks)) => blocks
                .iter()
                .filter(|b| b.is_tool_use())
                .filter_map(|b| b.name.as_deref())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Message payload of a session record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageBody {
    /// Message role ("user" / "assistant").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Model identifier (e.g. "claude-opus-4-5-20251101").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Content: a plain string or an ordered block sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,

    /// Token statistics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,

    /// Unknown fields, preserved.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Message content: user records usually carry a string, assistant records
/// an ordered sequence of content blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content.
    Text(String),
    /// Ordered content blocks.
    Blocks(Vec<ContentBlock>),
}

/// One content block. Kept as an optional-field struct rather than a tagged
/// enum so unrecognized block kinds never fail the containing line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentBlock {
    /// Block kind: "text", "tool_use", "tool_result", "thinking", ...
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Tool name, for `tool_use` blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Text content, for `text` blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Unknown fields, preserved.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl ContentBlock {
    /// Whether this block is a tool invocation.
    #[must_use]
    pub fn is_tool_use(&self) -> bool {
        self.kind.as_deref() == Some("tool_use")
    }
}

/// Token usage statistics attached to a message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct TokenUsage {
    /// Fresh (non-cached) input tokens.
    pub input_tokens: u64,
    /// Generated output tokens.
    pub output_tokens: u64,
    /// Tokens used to build cache.
    pub cache_creation_input_tokens: u64,
    /// Tokens retrieved from cache.
    pub cache_read_input_tokens: u64,
    /// Unknown fields, preserved.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl TokenUsage {
    /// Total tokens across all categories.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.input_tokens
            + self.output_tokens
            + self.cache_creation_input_tokens
            + self.cache_read_input_tokens
    }
}

/// One line of the flat prompt-history log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryEntry {
    /// Prompt timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// The prompt text as displayed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    /// Project the prompt was issued in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Session the prompt belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Unknown fields, preserved.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl HistoryEntry {
    /// The entry's date as "YYYY-MM-DD", if it has a timestamp.
    #[must_use]
    pub fn date_key(&self) -> Option<String> {
        self.timestamp.map(|ts| ts.format("%Y-%m-%d").to_string())
    }
}
