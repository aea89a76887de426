use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatSyncError {
    #[error("Subscription error ({kind}): {message}")]
    Subscription { kind: String, message: String },

    #[error("Unsubscribe error (listener {id}): {message}")]
    Unsubscribe { id: u64, message: String },

    #[error("History error for {character_id}: {message}")]
    History {
        character_id: String,
        message: String,
    },

    #[error("No active session")]
    NoActiveSession,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(String),
}

impl ChatSyncError {
    pub fn history(character_id: &str, message: impl Into<String>) -> Self {
        ChatSyncError::History {
            character_id: character_id.to_string(),
            message: message.into(),
        }
    }
}

impl From<String> for ChatSyncError {
    fn from(msg: String) -> Self {
        ChatSyncError::Other(msg)
    }
}

impl From<&str> for ChatSyncError {
    fn from(msg: &str) -> Self {
        ChatSyncError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChatSyncError>;
