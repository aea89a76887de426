use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{null_as_default, HistoryRecord, Role, TokenUsage, ToolCall};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharacterLoadedPayload {
    pub uuid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatHistoryLoadedPayload {
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chat_history: Vec<HistoryRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentMessage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default = "default_sent_role")]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

fn default_sent_role() -> Role {
    Role::User
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageSentPayload {
    pub uuid: String,
    pub message: SentMessage,
}

/// Final assistant reply carried by `message-received`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceivedMessage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageReceivedPayload {
    pub uuid: String,
    pub message: ReceivedMessage,
    /// Tool-call span produced while answering, in the order it happened.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub intermediate_messages: Vec<HistoryRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextBuiltPayload {
    pub uuid: String,
    #[serde(default)]
    pub context_result: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharacterUpdatedPayload {
    pub uuid: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolExecutedPayload {
    pub tool_name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub execution_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUnloadedPayload {
    pub uuid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenStatsPayload {
    pub token_usage: TokenUsage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProgressPayload {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}
