pub const DEFAULT_STATUS_PATH: &str = "/api/llm-test-cases/task/status";
pub const DEFAULT_STOP_PATH: &str = "/api/llm-test-cases/task/stop";

#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Base URL of the backend, e.g. `http://localhost:8080`.
    pub endpoint: String,
    pub status_path: String,
    pub stop_path: String,
    /// Per-request timeout; `None` leaves it to the transport.
    pub timeout_ms: Option<u64>,
}

impl HttpBackendConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080".to_string(),
            status_path: DEFAULT_STATUS_PATH.to_string(),
            stop_path: DEFAULT_STOP_PATH.to_string(),
            timeout_ms: None,
        }
    }
}
