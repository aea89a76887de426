use serde_json::Value;

use super::chat_store::ChatStore;
use super::state::SessionState;
use super::transcript::Transcript;
use crate::grouping::DisplayGroup;

/// Everything the event handlers mutate for one client: the active
/// session, its transcript and auxiliary view state.
#[derive(Debug, Default)]
pub struct SessionContext {
    pub state: SessionState,
    pub transcript: Transcript,
    pub chat_store: ChatStore,
    /// Last `context-built` result for the active session
    pub context_cache: Option<Value>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_session_id(&self) -> Option<&str> {
        self.state.session_id.as_deref()
    }

    /// Explicit switch by the user. The transcript starts empty until the
    /// backend replays history for the new session.
    pub fn switch_session(&mut self, session_id: &str) {
        tracing::info!(session = session_id, "switching session");
        self.transcript.clear();
        self.context_cache = None;
        self.state.begin_loading(session_id);
    }

    /// Drop the active session's transcript, state and view caches. The
    /// per-character chat cache survives.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.state.clear();
        self.context_cache = None;
    }

    pub fn groups(&self) -> Vec<DisplayGroup> {
        self.transcript.groups()
    }
}
