mod chat_store;
mod context;
mod state;
mod transcript;

use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{ChatSyncError, Result};
use crate::history::HistoryStore;
use crate::models::{Message, Role};
use crate::timestamp;

pub use chat_store::ChatStore;
pub use context::SessionContext;
pub use state::SessionState;
pub use transcript::Transcript;

/// Session context shared between the event handlers and user actions.
pub type SharedContext = Arc<Mutex<SessionContext>>;

pub fn shared(context: SessionContext) -> SharedContext {
    Arc::new(Mutex::new(context))
}

/// Lock the context. A panic in an earlier handler must not wedge every
/// later event, so a poisoned lock is recovered.
pub fn lock_context(context: &SharedContext) -> MutexGuard<'_, SessionContext> {
    context.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Optimistically append a user message, then persist it.
///
/// The lock is released before awaiting the store, so a `message-sent` echo
/// may be handled in between; the echo is deduplicated by content. On a
/// persistence error the optimistic message stays in the transcript and the
/// error goes to the caller.
pub async fn send_user_message(
    context: &SharedContext,
    store: &dyn HistoryStore,
    content: &str,
) -> Result<Message> {
    let (session_id, message) = {
        let mut ctx = lock_context(context);
        let session_id = ctx
            .active_session_id()
            .map(str::to_string)
            .ok_or(ChatSyncError::NoActiveSession)?;

        let now = Utc::now();
        let message = Message::new(
            format!("{}_local_{}", timestamp::id_stamp(&now), session_id),
            Role::User,
            content,
            now,
        );
        let message = ctx.transcript.append(message).clone();
        ctx.chat_store.add_message(&session_id, message.to_record());
        (session_id, message)
    };

    store
        .append_message(&session_id, &message.to_record())
        .await?;
    tracing::debug!(session = %session_id, id = %message.id, "user message persisted");
    Ok(message)
}
