use async_trait::async_trait;

use crate::error::Result;
use crate::models::HistoryRecord;

/// Chat-history collaborator, keyed by character id.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Load the stored history, empty when nothing was saved yet
    async fn load_history(&self, character_id: &str) -> Result<Vec<HistoryRecord>>;

    /// Append one message
    async fn append_message(&self, character_id: &str, message: &HistoryRecord) -> Result<()>;

    /// Replace the whole history
    async fn replace_history(&self, character_id: &str, history: &[HistoryRecord]) -> Result<()>;

    /// Drop the history for one character
    async fn clear_history(&self, character_id: &str) -> Result<()>;
}
