use serde::{Deserialize, Serialize};

use crate::TaskId;

/// Body of the stop request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopTaskRequest {
    pub task_id: TaskId,
}

/// Failure body returned by the backend (`{"error": "..."}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_request_wire_shape() {
        let req = StopTaskRequest {
            task_id: TaskId::from("t1"),
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"task_id":"t1"}"#);
    }
}
