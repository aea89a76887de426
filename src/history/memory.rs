use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::storage::HistoryStore;
use crate::error::Result;
use crate::models::HistoryRecord;

#[derive(Default)]
pub struct InMemoryHistoryStore {
    histories: RwLock<HashMap<String, Vec<HistoryRecord>>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn load_history(&self, character_id: &str) -> Result<Vec<HistoryRecord>> {
        let histories = self.histories.read().await;
        Ok(histories.get(character_id).cloned().unwrap_or_default())
    }

    async fn append_message(&self, character_id: &str, message: &HistoryRecord) -> Result<()> {
        let mut histories = self.histories.write().await;
        histories
            .entry(character_id.to_string())
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn replace_history(&self, character_id: &str, history: &[HistoryRecord]) -> Result<()> {
        let mut histories = self.histories.write().await;
        histories.insert(character_id.to_string(), history.to_vec());
        Ok(())
    }

    async fn clear_history(&self, character_id: &str) -> Result<()> {
        let mut histories = self.histories.write().await;
        histories.remove(character_id);
        Ok(())
    }
}
