use serde::{Deserialize, Serialize};

use crate::{TaskId, TaskStatus};

/// Last known status of a tracked task, as answered by the status endpoint.
///
/// Missing fields fall back to their defaults so a partial body still
/// decodes; `Default` is the empty "nothing fetched yet" snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskSnapshot {
    pub status: TaskStatus,
    pub progress: u64,
    pub total: u64,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    /// Failure reason reported by the backend for failed tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Arbitrary payload attached to finished tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl TaskSnapshot {
    pub fn new(status: TaskStatus, progress: u64, total: u64, message: impl Into<String>) -> Self {
        Self {
            status,
            progress,
            total,
            message: message.into(),
            ..Default::default()
        }
    }

    /// Completed share of the work in `[0.0, 1.0]`; `0.0` when `total` is zero.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.progress as f64 / self.total as f64).clamp(0.0, 1.0)
    }

    pub fn is_empty(&self) -> bool {
        *self == TaskSnapshot::default()
    }
}
