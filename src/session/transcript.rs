use std::collections::HashSet;

use crate::grouping::{group_messages, DisplayGroup};
use crate::models::{Message, Role};

/// Ordered, append-only list of messages for the active session.
///
/// Ids stay unique and timestamps never decrease in append order.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    ids: HashSet<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message. A colliding id gets a `#n` suffix and a timestamp
    /// earlier than the last entry is raised to it.
    pub fn append(&mut self, mut message: Message) -> &Message {
        if self.ids.contains(&message.id) {
            let base = message.id.clone();
            let mut n = 1;
            while self.ids.contains(&format!("{}#{}", base, n)) {
                n += 1;
            }
            message.id = format!("{}#{}", base, n);
            tracing::debug!(id = %base, renamed = %message.id, "duplicate message id");
        }

        if let Some(last) = self.messages.last() {
            if message.timestamp < last.timestamp {
                message.timestamp = last.timestamp;
            }
        }

        self.ids.insert(message.id.clone());
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn replace(&mut self, messages: Vec<Message>) {
        self.clear();
        for message in messages {
            self.append(message);
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.ids.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn contains_user_content(&self, content: &str) -> bool {
        self.messages
            .iter()
            .any(|m| m.role == Role::User && m.content == content)
    }

    /// Display grouping of the current messages, recomputed on every call.
    pub fn groups(&self) -> Vec<DisplayGroup> {
        group_messages(&self.messages)
    }
}
