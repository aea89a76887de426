mod message;
mod tool;
mod usage;

pub(crate) use message::null_as_default;
pub use message::{HistoryRecord, Message, Role};
pub use tool::{FunctionCall, ToolCall};
pub use usage::TokenUsage;
