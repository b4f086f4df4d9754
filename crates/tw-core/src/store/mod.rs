//! Durable storage for the tracked task id.
//!
//! A store is a tiny string key/value map that survives restarts. The
//! tracker keeps exactly one key in it; absence of the key means that no
//! task is being tracked.

mod file;
pub use file::FileStore;

mod memory;
pub use memory::MemoryStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt store file: {0}")]
    Corrupt(String),
}

/// Key/value storage that outlives the process.
pub trait TrackingStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
