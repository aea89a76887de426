use crate::models::TokenUsage;

/// Which session is active and whether the backend confirmed it loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub session_id: Option<String>,
    pub is_loaded: bool,
    pub is_loading: bool,
    pub token_usage: TokenUsage,
}

impl SessionState {
    /// Start loading `session_id`. Token counters restart with the session.
    pub fn begin_loading(&mut self, session_id: &str) {
        *self = SessionState {
            session_id: Some(session_id.to_string()),
            is_loaded: false,
            is_loading: true,
            token_usage: TokenUsage::default(),
        };
    }

    pub fn mark_loaded(&mut self, session_id: &str) {
        if self.session_id.as_deref() != Some(session_id) {
            self.token_usage = TokenUsage::default();
        }
        self.session_id = Some(session_id.to_string());
        self.is_loaded = true;
        self.is_loading = false;
    }

    pub fn is_active(&self, session_id: &str) -> bool {
        self.session_id.as_deref() == Some(session_id)
    }

    pub fn update_token_usage(&mut self, usage: TokenUsage) {
        self.token_usage = usage;
    }

    pub fn clear(&mut self) {
        *self = SessionState::default();
    }
}
