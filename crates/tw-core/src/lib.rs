pub mod backend;
pub use backend::TaskBackend;

pub mod config;
pub use config::TrackerConfig;

pub mod error;
pub use error::CoreError;

pub mod store;
pub use store::{FileStore, MemoryStore, StoreError, TrackingStore};

pub mod tracker;
pub use tracker::{TaskTracker, TrackerState};
