use std::sync::Arc;

use crate::channel::{EventChannel, EventHandler, ListenerId};
use crate::error::Result;
use crate::events::{BackendEvent, EventKind};
use crate::reconcile;
use crate::session::{lock_context, SharedContext};

/// Owns one subscription per backend event kind and routes every event
/// into the shared session context.
///
/// `setup` is not idempotent: a second call without `cleanup` in between
/// subscribes every kind twice. `cleanup` is safe to call at any time and
/// any number of times; it also runs on drop.
pub struct EventListeners {
    channel: Arc<dyn EventChannel>,
    context: SharedContext,
    handles: Vec<ListenerId>,
}

impl EventListeners {
    pub fn new(channel: Arc<dyn EventChannel>, context: SharedContext) -> Self {
        Self {
            channel,
            context,
            handles: Vec::new(),
        }
    }

    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    /// Register a handler for every event kind, awaiting each registration
    /// before returning. On failure the handles registered so far are kept
    /// so `cleanup` can release them.
    pub async fn setup(&mut self) -> Result<()> {
        tracing::info!("registering backend event listeners");

        for kind in EventKind::ALL {
            let context = Arc::clone(&self.context);
            let handler: EventHandler = Arc::new(move |event: &BackendEvent| {
                let mut ctx = lock_context(&context);
                reconcile::apply_event(&mut ctx, event);
            });

            let id = self.channel.listen(kind, handler).await.map_err(|e| {
                tracing::error!(event = %kind, error = %e, "failed to register listener");
                e
            })?;
            self.handles.push(id);
        }

        tracing::info!(count = self.handles.len(), "backend event listeners ready");
        Ok(())
    }

    /// Release every registered handler. Individual failures are logged and
    /// skipped.
    pub fn cleanup(&mut self) {
        if self.handles.is_empty() {
            return;
        }

        tracing::info!(count = self.handles.len(), "releasing backend event listeners");
        for id in self.handles.drain(..) {
            if let Err(e) = self.channel.unlisten(id) {
                tracing::warn!(listener = %id, error = %e, "failed to release listener");
            }
        }
    }

    pub fn active_listeners(&self) -> usize {
        self.handles.len()
    }
}

impl Drop for EventListeners {
    fn drop(&mut self) {
        self.cleanup();
    }
}
