use std::time::Duration;

/// Delay between two consecutive status polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
/// Key under which the tracked task id is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "current_llm_task_id";

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub poll_interval: Duration,
    pub storage_key: String,
}

impl TrackerConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}
