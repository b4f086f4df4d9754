use async_trait::async_trait;
use tw_model::{TaskId, TaskSnapshot};

use crate::error::CoreError;

/// Remote side that executes tasks and answers status/stop requests.
#[async_trait]
pub trait TaskBackend: Send + Sync + 'static {
    /// Fetch the current status of `id`.
    async fn status(&self, id: &TaskId) -> Result<TaskSnapshot, CoreError>;

    /// Ask the backend to stop `id`.
    async fn stop(&self, id: &TaskId) -> Result<(), CoreError>;
}
