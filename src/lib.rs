pub mod channel;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod grouping;
pub mod history;
pub mod listeners;
pub mod models;
pub mod reconcile;
pub mod replay;
pub mod session;
pub mod timestamp;
pub mod ui;

pub use channel::{EventChannel, LocalEventChannel};
pub use error::{ChatSyncError, Result};
pub use events::{BackendEvent, EventKind};
pub use grouping::{group_messages, DisplayGroup};
pub use listeners::EventListeners;
pub use session::{SessionContext, SharedContext};
