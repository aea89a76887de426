mod filesystem;
mod memory;
mod storage;

pub use filesystem::FilesystemHistoryStore;
pub use memory::InMemoryHistoryStore;
pub use storage::HistoryStore;
