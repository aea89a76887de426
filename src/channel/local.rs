use async_trait::async_trait;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use super::{EventChannel, EventHandler, ListenerId};
use crate::error::{ChatSyncError, Result};
use crate::events::{BackendEvent, EventKind};

struct Listener {
    id: ListenerId,
    kind: EventKind,
    handler: EventHandler,
}

/// In-process channel. `emit` runs matching handlers synchronously in
/// registration order, so two handlers never overlap.
pub struct LocalEventChannel {
    listeners: Mutex<Vec<Listener>>,
    next_id: AtomicU64,
}

impl LocalEventChannel {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Deliver an event to every handler registered for its kind. Returns
    /// the number of handlers that ran to completion.
    pub fn emit(&self, event: &BackendEvent) -> usize {
        let kind = event.kind();

        // Snapshot so handlers may register or release listeners themselves
        let handlers: Vec<(ListenerId, EventHandler)> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|listener| listener.kind == kind)
            .map(|listener| (listener.id, listener.handler.clone()))
            .collect();

        if handlers.is_empty() {
            tracing::trace!(event = %kind, "no listeners for event");
        }

        let mut delivered = 0;
        for (id, handler) in handlers {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    tracing::error!(event = %kind, listener = %id, "event handler panicked");
                }
            }
        }
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn listener_count_for(&self, kind: EventKind) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|listener| listener.kind == kind)
            .count()
    }
}

impl Default for LocalEventChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventChannel for LocalEventChannel {
    async fn listen(&self, kind: EventKind, handler: EventHandler) -> Result<ListenerId> {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut listeners = self
            .listeners
            .lock()
            .map_err(|e| ChatSyncError::Subscription {
                kind: kind.to_string(),
                message: e.to_string(),
            })?;
        listeners.push(Listener { id, kind, handler });
        Ok(id)
    }

    fn unlisten(&self, id: ListenerId) -> Result<()> {
        let mut listeners = self
            .listeners
            .lock()
            .map_err(|e| ChatSyncError::Unsubscribe {
                id: id.0,
                message: e.to_string(),
            })?;

        let before = listeners.len();
        listeners.retain(|listener| listener.id != id);
        if listeners.len() == before {
            return Err(ChatSyncError::Unsubscribe {
                id: id.0,
                message: "listener not registered".to_string(),
            });
        }
        Ok(())
    }
}
