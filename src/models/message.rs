use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::tool::ToolCall;
use crate::timestamp;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        };
        write!(f, "{}", name)
    }
}

/// One transcript entry. Immutable once appended to a transcript.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        role: Role,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            timestamp,
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    /// Build a message from a backend record, normalizing its timestamp.
    pub fn from_record(id: impl Into<String>, record: &HistoryRecord) -> Self {
        Self {
            id: id.into(),
            role: record.role,
            content: record.content.clone(),
            timestamp: timestamp::normalize(record.timestamp),
            tool_calls: record.tool_calls.clone(),
            tool_call_id: record.tool_call_id.clone(),
            name: record.name.clone(),
        }
    }

    pub fn to_record(&self) -> HistoryRecord {
        HistoryRecord {
            role: self.role,
            content: self.content.clone(),
            timestamp: Some(self.timestamp.timestamp_millis() as f64),
            tool_calls: self.tool_calls.clone(),
            tool_call_id: self.tool_call_id.clone(),
            name: self.name.clone(),
        }
    }

    /// True for assistant messages that requested at least one tool call.
    pub fn has_tool_calls(&self) -> bool {
        self.role == Role::Assistant
            && self
                .tool_calls
                .as_ref()
                .map(|calls| !calls.is_empty())
                .unwrap_or(false)
    }
}

/// Message shape used on the wire and by the history collaborator.
///
/// `timestamp` is kept raw because its unit varies between producers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HistoryRecord {
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl HistoryRecord {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: None,
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }
}

/// Backends send optional fields as explicit `null` (tool-call-only replies
/// carry `"content": null`). Pair with `#[serde(default)]` for absent fields.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
