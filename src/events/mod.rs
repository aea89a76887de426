//! Backend push events.
//!
//! Each event travels as `{"event": "<kind>", "payload": {...}}`. Unknown
//! payload fields are ignored so newer backends stay compatible.

mod payload;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use payload::{
    CharacterLoadedPayload, CharacterUpdatedPayload, ChatHistoryLoadedPayload,
    ContextBuiltPayload, ErrorPayload, MessageReceivedPayload, MessageSentPayload,
    ProgressPayload, ReceivedMessage, SentMessage, SessionUnloadedPayload, TokenStatsPayload,
    ToolExecutedPayload,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum BackendEvent {
    CharacterLoaded(CharacterLoadedPayload),
    ChatHistoryLoaded(ChatHistoryLoadedPayload),
    MessageSent(MessageSentPayload),
    MessageReceived(MessageReceivedPayload),
    ContextBuilt(ContextBuiltPayload),
    CharacterUpdated(CharacterUpdatedPayload),
    ToolExecuted(ToolExecutedPayload),
    SessionUnloaded(SessionUnloadedPayload),
    Error(ErrorPayload),
    TokenStats(TokenStatsPayload),
    Progress(ProgressPayload),
}

impl BackendEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            BackendEvent::CharacterLoaded(_) => EventKind::CharacterLoaded,
            BackendEvent::ChatHistoryLoaded(_) => EventKind::ChatHistoryLoaded,
            BackendEvent::MessageSent(_) => EventKind::MessageSent,
            BackendEvent::MessageReceived(_) => EventKind::MessageReceived,
            BackendEvent::ContextBuilt(_) => EventKind::ContextBuilt,
            BackendEvent::CharacterUpdated(_) => EventKind::CharacterUpdated,
            BackendEvent::ToolExecuted(_) => EventKind::ToolExecuted,
            BackendEvent::SessionUnloaded(_) => EventKind::SessionUnloaded,
            BackendEvent::Error(_) => EventKind::Error,
            BackendEvent::TokenStats(_) => EventKind::TokenStats,
            BackendEvent::Progress(_) => EventKind::Progress,
        }
    }

    /// Parse one JSON-lines envelope.
    pub fn from_json(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

/// One subscription topic per event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    CharacterLoaded,
    ChatHistoryLoaded,
    MessageSent,
    MessageReceived,
    ContextBuilt,
    CharacterUpdated,
    ToolExecuted,
    SessionUnloaded,
    Error,
    TokenStats,
    Progress,
}

impl EventKind {
    /// Registration order used by `EventListeners::setup`.
    pub const ALL: [EventKind; 11] = [
        EventKind::CharacterLoaded,
        EventKind::ChatHistoryLoaded,
        EventKind::MessageSent,
        EventKind::MessageReceived,
        EventKind::ContextBuilt,
        EventKind::CharacterUpdated,
        EventKind::ToolExecuted,
        EventKind::SessionUnloaded,
        EventKind::Error,
        EventKind::TokenStats,
        EventKind::Progress,
    ];

    pub fn topic(&self) -> &'static str {
        match self {
            EventKind::CharacterLoaded => "character-loaded",
            EventKind::ChatHistoryLoaded => "chat-history-loaded",
            EventKind::MessageSent => "message-sent",
            EventKind::MessageReceived => "message-received",
            EventKind::ContextBuilt => "context-built",
            EventKind::CharacterUpdated => "character-updated",
            EventKind::ToolExecuted => "tool-executed",
            EventKind::SessionUnloaded => "session-unloaded",
            EventKind::Error => "error",
            EventKind::TokenStats => "token-stats",
            EventKind::Progress => "progress",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.topic())
    }
}
