use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state reported by the backend for a task.
///
/// The set is open: any value the client does not recognise is kept
/// verbatim in [`TaskStatus::Other`] and treated as terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    /// Nothing fetched yet (empty string on the wire).
    #[default]
    Unknown,
    /// Task is queued and has not started.
    Pending,
    /// Task is executing.
    Running,
    /// Task finished successfully.
    Completed,
    /// Task finished with an error.
    Failed,
    /// Task was stopped on request.
    Stopped,
    /// Any status value outside the known set.
    Other(String),
}

impl TaskStatus {
    /// Returns `true` while the task may still change (pending or running).
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Running)
    }

    /// Returns `true` for every reported status that is not active.
    ///
    /// [`TaskStatus::Unknown`] is neither active nor terminal.
    pub fn is_terminal(&self) -> bool {
        !self.is_active() && !self.is_unknown()
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TaskStatus::Unknown)
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Unknown => "",
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Stopped => "stopped",
            TaskStatus::Other(s) => s,
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        match s {
            "" => TaskStatus::Unknown,
            "pending" => TaskStatus::Pending,
            "running" => TaskStatus::Running,
            "completed" => TaskStatus::Completed,
            "failed" => TaskStatus::Failed,
            "stopped" => TaskStatus::Stopped,
            other => TaskStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match TaskStatus::from(s.as_str()) {
            TaskStatus::Other(_) => TaskStatus::Other(s),
            known => known,
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
