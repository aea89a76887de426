//! Display grouping of a transcript.
//!
//! An assistant message that requested tools and the contiguous run of
//! `tool` messages after it collapse into one `ToolExecution` group:
//!
//! ```text
//! user: "search X"                      -> Normal
//! assistant: "" tool_calls=[call_1]     -> ToolExecution { [call_1],
//! tool: "{...}" tool_call_id=call_1     ->                 [tool msg] }
//! assistant: "according to..."          -> Normal
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Message, Role, ToolCall};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DisplayGroup {
    Normal {
        message: Message,
    },
    ToolExecution {
        tool_calls: Vec<ToolCall>,
        tool_results: Vec<Message>,
        #[serde(with = "chrono::serde::ts_milliseconds")]
        timestamp: DateTime<Utc>,
    },
}

/// Group a transcript for display in one left-to-right pass.
///
/// `tool` messages with no tool-call request directly before them are
/// dropped. The result depends only on `messages`.
pub fn group_messages(messages: &[Message]) -> Vec<DisplayGroup> {
    let mut groups = Vec::new();
    let mut i = 0;

    while i < messages.len() {
        let message = &messages[i];

        if message.has_tool_calls() {
            let tool_results: Vec<Message> = messages[i + 1..]
                .iter()
                .take_while(|m| m.role == Role::Tool)
                .cloned()
                .collect();
            let consumed = tool_results.len();

            groups.push(DisplayGroup::ToolExecution {
                tool_calls: message.tool_calls.clone().unwrap_or_default(),
                tool_results,
                timestamp: message.timestamp,
            });
            i += 1 + consumed;
        } else if message.role != Role::Tool {
            groups.push(DisplayGroup::Normal {
                message: message.clone(),
            });
            i += 1;
        } else {
            tracing::trace!(id = %message.id, "dropping orphan tool message");
            i += 1;
        }
    }

    groups
}
