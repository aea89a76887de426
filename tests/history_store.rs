use chatsync::history::{FilesystemHistoryStore, HistoryStore, InMemoryHistoryStore};
use chatsync::models::{HistoryRecord, Role, ToolCall};
use std::fs;
use tempfile::TempDir;

fn record(role: Role, content: &str) -> HistoryRecord {
    let mut record = HistoryRecord::new(role, content);
    record.timestamp = Some(1_700_000_000_000.0);
    record
}

#[tokio::test]
async fn test_append_and_load_history() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemHistoryStore::new(temp_dir.path().join("history"));

    store
        .append_message("char-1", &record(Role::User, "hi"))
        .await
        .unwrap();
    store
        .append_message("char-1", &record(Role::Assistant, "hello"))
        .await
        .unwrap();

    let history = store.load_history("char-1").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].content, "hello");
}

#[tokio::test]
async fn test_load_missing_history_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemHistoryStore::new(temp_dir.path());

    assert!(store.load_history("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_replace_keeps_tool_calls() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemHistoryStore::new(temp_dir.path());

    let mut request = record(Role::Assistant, "");
    request.tool_calls = Some(vec![ToolCall::function("call_1", "search", "{}")]);
    let mut result = record(Role::Tool, "{}");
    result.tool_call_id = Some("call_1".to_string());

    store
        .append_message("char-1", &record(Role::User, "old"))
        .await
        .unwrap();
    store
        .replace_history("char-1", &[request.clone(), result.clone()])
        .await
        .unwrap();

    let history = store.load_history("char-1").await.unwrap();
    assert_eq!(history, vec![request, result]);
}

#[tokio::test]
async fn test_clear_history_only_touches_one_character() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemHistoryStore::new(temp_dir.path());

    store.append_message("a", &record(Role::User, "1")).await.unwrap();
    store.append_message("b", &record(Role::User, "2")).await.unwrap();

    store.clear_history("a").await.unwrap();
    // Clearing twice is fine
    store.clear_history("a").await.unwrap();

    assert!(store.load_history("a").await.unwrap().is_empty());
    assert_eq!(store.load_history("b").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_clear_all_leaves_other_files() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemHistoryStore::new(temp_dir.path());
    fs::write(temp_dir.path().join("notes.json"), "{}").unwrap();

    store.append_message("a", &record(Role::User, "1")).await.unwrap();
    store.append_message("b", &record(Role::User, "2")).await.unwrap();

    assert_eq!(store.clear_all().await.unwrap(), 2);
    assert!(temp_dir.path().join("notes.json").exists());
}

#[tokio::test]
async fn test_character_ids_cannot_escape_dir() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemHistoryStore::new(temp_dir.path().join("history"));

    store
        .append_message("../../etc/passwd", &record(Role::User, "x"))
        .await
        .unwrap();

    let entries: Vec<_> = fs::read_dir(store.dir()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(store.load_history("../../etc/passwd").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_corrupt_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemHistoryStore::new(temp_dir.path());
    fs::write(temp_dir.path().join("history-bad.json"), "not json").unwrap();

    let err = store.load_history("bad").await.unwrap_err();
    assert!(err.to_string().contains("corrupt history file"));
}

#[tokio::test]
async fn test_in_memory_store() {
    let store = InMemoryHistoryStore::new();
    store.append_message("a", &record(Role::User, "1")).await.unwrap();
    store
        .replace_history("a", &[record(Role::User, "2"), record(Role::Assistant, "3")])
        .await
        .unwrap();
    assert_eq!(store.load_history("a").await.unwrap().len(), 2);

    store.clear_history("a").await.unwrap();
    assert!(store.load_history("a").await.unwrap().is_empty());
}
