//! Publish/subscribe boundary to the backend push channel.

mod local;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::events::{BackendEvent, EventKind};

pub use local::LocalEventChannel;

pub type EventHandler = Arc<dyn Fn(&BackendEvent) + Send + Sync>;

/// Handle returned by `listen`, needed to release the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[async_trait]
pub trait EventChannel: Send + Sync {
    /// Register `handler` for one event kind. Resolves once the
    /// registration is live.
    async fn listen(&self, kind: EventKind, handler: EventHandler) -> Result<ListenerId>;

    /// Release a registration.
    fn unlisten(&self, id: ListenerId) -> Result<()>;
}
