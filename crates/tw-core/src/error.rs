use thiserror::Error;
use tw_model::TaskId;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no tokio runtime available: {0}")]
    NoRuntime(String),

    #[error("task id must not be empty")]
    EmptyTaskId,

    #[error("tracking store error: {0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Returns `true` for every failure that came from talking to the backend.
    ///
    /// Polling treats all of them the same way: halt and keep the tracked task.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            CoreError::RequestFailed(_)
                | CoreError::TaskNotFound(_)
                | CoreError::Rejected { .. }
                | CoreError::InvalidResponse(_)
        )
    }

    /// Returns `true` when the backend no longer knows the task.
    ///
    /// Clearing is the sensible recovery here; retrying is for everything else.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::TaskNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(CoreError::RequestFailed("reset".into()).is_request_failure());
        assert!(CoreError::TaskNotFound(TaskId::from("t")).is_request_failure());
        assert!(CoreError::TaskNotFound(TaskId::from("t")).is_not_found());
        assert!(!CoreError::EmptyTaskId.is_request_failure());
        assert!(
            !CoreError::Rejected {
                status: 500,
                message: "boom".into()
            }
            .is_not_found()
        );
    }

    #[test]
    fn display_includes_status() {
        let err = CoreError::Rejected {
            status: 400,
            message: "task_id is required".into(),
        };
        assert_eq!(
            err.to_string(),
            "backend rejected request (400): task_id is required"
        );
    }
}
