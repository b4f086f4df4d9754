mod task_id;
pub use task_id::TaskId;

mod task_status;
pub use task_status::TaskStatus;

mod task_snapshot;
pub use task_snapshot::TaskSnapshot;

mod requests;
pub use requests::{ErrorBody, StopTaskRequest};

/// Query parameter carrying the task identifier on status requests.
pub const TASK_ID_PARAM: &str = "task_id";
