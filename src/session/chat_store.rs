use std::collections::HashMap;

use crate::models::HistoryRecord;

/// Raw chat history per character, kept across transcript resets so a
/// character can be shown again without another backend round-trip.
#[derive(Debug, Default)]
pub struct ChatStore {
    histories: HashMap<String, Vec<HistoryRecord>>,
    active_character: Option<String>,
    backend_session_active: bool,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active_character(&mut self, uuid: &str) {
        self.active_character = Some(uuid.to_string());
        self.backend_session_active = true;
    }

    pub fn active_character(&self) -> Option<&str> {
        self.active_character.as_deref()
    }

    pub fn is_backend_session_active(&self) -> bool {
        self.backend_session_active
    }

    pub fn history(&self, uuid: &str) -> &[HistoryRecord] {
        self.histories.get(uuid).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_history(&mut self, uuid: &str, messages: Vec<HistoryRecord>) {
        tracing::debug!(character = uuid, count = messages.len(), "cached chat history");
        self.histories.insert(uuid.to_string(), messages);
    }

    pub fn add_message(&mut self, uuid: &str, message: HistoryRecord) {
        self.histories
            .entry(uuid.to_string())
            .or_default()
            .push(message);
    }

    pub fn clear_history(&mut self, uuid: &str) {
        self.histories.insert(uuid.to_string(), Vec::new());
    }

    pub fn current_history(&self) -> &[HistoryRecord] {
        match &self.active_character {
            Some(uuid) => self.history(uuid),
            None => &[],
        }
    }

    /// No-op without an active character.
    pub fn set_current_history(&mut self, messages: Vec<HistoryRecord>) {
        if let Some(uuid) = self.active_character.clone() {
            self.set_history(&uuid, messages);
        }
    }

    pub fn clear_all(&mut self) {
        self.histories.clear();
        self.active_character = None;
        self.backend_session_active = false;
    }
}
