use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use super::storage::HistoryStore;
use crate::error::{ChatSyncError, Result};
use crate::models::HistoryRecord;

const FILE_PREFIX: &str = "history-";

#[derive(Serialize, Deserialize)]
struct StoredHistory {
    character_id: String,
    last_updated: DateTime<Local>,
    messages: Vec<HistoryRecord>,
}

/// One pretty-printed JSON file per character under `dir`.
pub struct FilesystemHistoryStore {
    dir: PathBuf,
}

impl FilesystemHistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn history_file(&self, character_id: &str) -> PathBuf {
        let safe_id: String = character_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}{}.json", FILE_PREFIX, safe_id))
    }

    async fn read(&self, character_id: &str) -> Result<Vec<HistoryRecord>> {
        let path = self.history_file(character_id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ChatSyncError::history(character_id, e.to_string())),
        };

        let stored: StoredHistory = serde_json::from_str(&content).map_err(|e| {
            ChatSyncError::history(
                character_id,
                format!("corrupt history file {}: {}", path.display(), e),
            )
        })?;
        Ok(stored.messages)
    }

    async fn write(&self, character_id: &str, messages: Vec<HistoryRecord>) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ChatSyncError::history(character_id, e.to_string()))?;

        let stored = StoredHistory {
            character_id: character_id.to_string(),
            last_updated: Local::now(),
            messages,
        };
        let content = serde_json::to_string_pretty(&stored)?;
        fs::write(self.history_file(character_id), content)
            .await
            .map_err(|e| ChatSyncError::history(character_id, e.to_string()))?;
        Ok(())
    }

    /// Remove every stored history file. Returns how many were removed.
    pub async fn clear_all(&self) -> Result<usize> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_history = path.extension().and_then(|s| s.to_str()) == Some("json")
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with(FILE_PREFIX))
                    .unwrap_or(false);
            if is_history {
                fs::remove_file(&path).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[async_trait]
impl HistoryStore for FilesystemHistoryStore {
    async fn load_history(&self, character_id: &str) -> Result<Vec<HistoryRecord>> {
        self.read(character_id).await
    }

    async fn append_message(&self, character_id: &str, message: &HistoryRecord) -> Result<()> {
        let mut messages = self.read(character_id).await?;
        messages.push(message.clone());
        self.write(character_id, messages).await
    }

    async fn replace_history(&self, character_id: &str, history: &[HistoryRecord]) -> Result<()> {
        self.write(character_id, history.to_vec()).await
    }

    async fn clear_history(&self, character_id: &str) -> Result<()> {
        match fs::remove_file(self.history_file(character_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ChatSyncError::history(character_id, e.to_string())),
        }
    }
}
