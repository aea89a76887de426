use async_trait::async_trait;
use chatsync::channel::{EventChannel, EventHandler, ListenerId, LocalEventChannel};
use chatsync::error::{ChatSyncError, Result};
use chatsync::events::{BackendEvent, EventKind};
use chatsync::history::{HistoryStore, InMemoryHistoryStore};
use chatsync::listeners::EventListeners;
use chatsync::models::HistoryRecord;
use chatsync::session::{self, SessionContext};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn event(value: serde_json::Value) -> BackendEvent {
    serde_json::from_value(value).unwrap()
}

/// History backend whose writes always fail.
struct FailingHistoryStore;

#[async_trait]
impl HistoryStore for FailingHistoryStore {
    async fn load_history(&self, _character_id: &str) -> Result<Vec<HistoryRecord>> {
        Ok(Vec::new())
    }

    async fn append_message(&self, character_id: &str, _message: &HistoryRecord) -> Result<()> {
        Err(ChatSyncError::history(character_id, "disk full"))
    }

    async fn replace_history(&self, character_id: &str, _history: &[HistoryRecord]) -> Result<()> {
        Err(ChatSyncError::history(character_id, "disk full"))
    }

    async fn clear_history(&self, character_id: &str) -> Result<()> {
        Err(ChatSyncError::history(character_id, "disk full"))
    }
}

/// Wraps the local channel and fails selected operations.
struct FlakyChannel {
    inner: LocalEventChannel,
    fail_listen_after: Option<usize>,
    listens: AtomicUsize,
    unlisten_attempts: AtomicUsize,
}

impl FlakyChannel {
    fn new(fail_listen_after: Option<usize>) -> Self {
        Self {
            inner: LocalEventChannel::new(),
            fail_listen_after,
            listens: AtomicUsize::new(0),
            unlisten_attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EventChannel for FlakyChannel {
    async fn listen(&self, kind: EventKind, handler: EventHandler) -> Result<ListenerId> {
        let n = self.listens.fetch_add(1, Ordering::SeqCst);
        if self.fail_listen_after.map(|limit| n >= limit).unwrap_or(false) {
            return Err(ChatSyncError::Subscription {
                kind: kind.to_string(),
                message: "channel closed".to_string(),
            });
        }
        self.inner.listen(kind, handler).await
    }

    fn unlisten(&self, id: ListenerId) -> Result<()> {
        let attempt = self.unlisten_attempts.fetch_add(1, Ordering::SeqCst);
        // Every other release fails after actually releasing
        let result = self.inner.unlisten(id);
        if attempt % 2 == 0 {
            return Err(ChatSyncError::Unsubscribe {
                id: id.0,
                message: "transport error".to_string(),
            });
        }
        result
    }
}

#[tokio::test]
async fn test_setup_registers_every_kind() {
    let channel = Arc::new(LocalEventChannel::new());
    let context = session::shared(SessionContext::new());
    let mut listeners = EventListeners::new(channel.clone(), context);

    listeners.setup().await.unwrap();

    assert_eq!(listeners.active_listeners(), EventKind::ALL.len());
    for kind in EventKind::ALL {
        assert_eq!(channel.listener_count_for(kind), 1);
    }
}

#[tokio::test]
async fn test_events_flow_into_shared_context() {
    let channel = Arc::new(LocalEventChannel::new());
    let context = session::shared(SessionContext::new());
    let mut listeners = EventListeners::new(channel.clone(), Arc::clone(&context));
    listeners.setup().await.unwrap();

    channel.emit(&event(json!({"event": "character-loaded", "payload": {"uuid": "a"}})));
    channel.emit(&event(json!({"event": "message-received", "payload": {
        "uuid": "a", "message": {"content": "hello", "timestamp": 1_700_000_000}
    }})));

    let ctx = session::lock_context(listeners.context());
    assert!(ctx.state.is_loaded);
    assert_eq!(ctx.transcript.len(), 1);
    assert_eq!(ctx.transcript.messages()[0].content, "hello");
}

#[tokio::test]
async fn test_setup_twice_double_subscribes() {
    let channel = Arc::new(LocalEventChannel::new());
    let context = session::shared(SessionContext::new());
    let mut listeners = EventListeners::new(channel.clone(), Arc::clone(&context));

    listeners.setup().await.unwrap();
    listeners.setup().await.unwrap();
    assert_eq!(channel.listener_count(), 2 * EventKind::ALL.len());

    channel.emit(&event(json!({"event": "error", "payload": {
        "error_code": "E1", "error_message": "timeout", "timestamp": 1000
    }})));
    assert_eq!(session::lock_context(&context).transcript.len(), 2);

    listeners.cleanup();
    assert_eq!(channel.listener_count(), 0);
}

#[tokio::test]
async fn test_cleanup_twice_and_before_setup_is_safe() {
    let channel = Arc::new(LocalEventChannel::new());
    let context = session::shared(SessionContext::new());
    let mut listeners = EventListeners::new(channel.clone(), context);

    listeners.cleanup();
    assert_eq!(listeners.active_listeners(), 0);

    listeners.setup().await.unwrap();
    listeners.cleanup();
    listeners.cleanup();

    assert_eq!(listeners.active_listeners(), 0);
    assert_eq!(channel.listener_count(), 0);
}

#[tokio::test]
async fn test_cleanup_continues_past_unlisten_failures() {
    let channel = Arc::new(FlakyChannel::new(None));
    let context = session::shared(SessionContext::new());
    let mut listeners = EventListeners::new(channel.clone(), context);

    listeners.setup().await.unwrap();
    listeners.cleanup();

    assert_eq!(
        channel.unlisten_attempts.load(Ordering::SeqCst),
        EventKind::ALL.len()
    );
    assert_eq!(listeners.active_listeners(), 0);
    assert_eq!(channel.inner.listener_count(), 0);

    // Nothing left to release
    listeners.cleanup();
    assert_eq!(
        channel.unlisten_attempts.load(Ordering::SeqCst),
        EventKind::ALL.len()
    );
}

#[tokio::test]
async fn test_partial_setup_failure_keeps_handles_for_cleanup() {
    let channel = Arc::new(FlakyChannel::new(Some(3)));
    let context = session::shared(SessionContext::new());
    let mut listeners = EventListeners::new(channel.clone(), context);

    let err = listeners.setup().await.unwrap_err();
    assert!(matches!(err, ChatSyncError::Subscription { .. }));
    assert_eq!(listeners.active_listeners(), 3);

    listeners.cleanup();
    assert_eq!(listeners.active_listeners(), 0);
    assert_eq!(channel.inner.listener_count(), 0);
}

#[tokio::test]
async fn test_drop_releases_listeners() {
    let channel = Arc::new(LocalEventChannel::new());
    {
        let mut listeners =
            EventListeners::new(channel.clone(), session::shared(SessionContext::new()));
        listeners.setup().await.unwrap();
        assert!(channel.listener_count() > 0);
    }
    assert_eq!(channel.listener_count(), 0);
}

#[tokio::test]
async fn test_optimistic_send_then_backend_echo() {
    let channel = Arc::new(LocalEventChannel::new());
    let context = session::shared(SessionContext::new());
    let mut listeners = EventListeners::new(channel.clone(), Arc::clone(&context));
    listeners.setup().await.unwrap();
    let store = InMemoryHistoryStore::new();

    channel.emit(&event(json!({"event": "character-loaded", "payload": {"uuid": "a"}})));
    let sent = session::send_user_message(&context, &store, "X").await.unwrap();
    assert!(sent.id.ends_with("_local_a"));

    channel.emit(&event(json!({"event": "message-sent", "payload": {
        "uuid": "a", "message": {"content": "X", "role": "user", "timestamp": 1_700_000_000_000u64}
    }})));

    assert_eq!(session::lock_context(&context).transcript.len(), 1);
    assert_eq!(store.load_history("a").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_send_without_session_fails() {
    let context = session::shared(SessionContext::new());
    let store = InMemoryHistoryStore::new();

    let err = session::send_user_message(&context, &store, "X")
        .await
        .unwrap_err();
    assert!(matches!(err, ChatSyncError::NoActiveSession));
    assert!(session::lock_context(&context).transcript.is_empty());
}

#[tokio::test]
async fn test_failed_persist_keeps_optimistic_message() {
    let context = session::shared(SessionContext::new());
    session::lock_context(&context).state.mark_loaded("a");

    let err = session::send_user_message(&context, &FailingHistoryStore, "X")
        .await
        .unwrap_err();
    assert!(matches!(err, ChatSyncError::History { .. }));

    let ctx = session::lock_context(&context);
    assert_eq!(ctx.transcript.len(), 1);
    assert_eq!(ctx.transcript.last().unwrap().content, "X");
}

#[tokio::test]
async fn test_panicking_handler_does_not_stop_later_events() {
    let channel = Arc::new(LocalEventChannel::new());
    let context = session::shared(SessionContext::new());

    // Registered first, so it poisons the context lock before our handler runs
    let poisoner = Arc::clone(&context);
    let handler: EventHandler = Arc::new(move |_: &BackendEvent| {
        let _guard = poisoner.lock();
        panic!("handler blew up");
    });
    channel
        .listen(EventKind::CharacterLoaded, handler)
        .await
        .unwrap();

    let mut listeners = EventListeners::new(channel.clone(), Arc::clone(&context));
    listeners.setup().await.unwrap();

    let delivered =
        channel.emit(&event(json!({"event": "character-loaded", "payload": {"uuid": "a"}})));
    assert_eq!(delivered, 1);
    assert!(context.is_poisoned());

    channel.emit(&event(json!({"event": "message-received", "payload": {
        "uuid": "a", "message": {"content": "still here", "timestamp": 1_700_000_000}
    }})));

    let ctx = session::lock_context(&context);
    assert!(ctx.state.is_loaded);
    assert_eq!(ctx.transcript.last().unwrap().content, "still here");
}
