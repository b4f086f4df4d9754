use tw_model::{TaskId, TaskSnapshot};

/// Observable tracking state shared by every consumer of a tracker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerState {
    pub(super) task_id: Option<TaskId>,
    pub(super) polling: bool,
    pub(super) snapshot: TaskSnapshot,
    pub(super) last_error: Option<String>,
    /// Bumped on every start/resume/clear; poll results carry the
    /// generation they were issued under and are dropped on mismatch.
    pub(super) generation: u64,
}

impl TrackerState {
    /// Currently tracked task, if any.
    pub fn task_id(&self) -> Option<&TaskId> {
        self.task_id.as_ref()
    }

    /// `true` while a poll is scheduled or in flight.
    pub fn is_polling(&self) -> bool {
        self.polling
    }

    /// Result of the most recently completed poll.
    pub fn snapshot(&self) -> &TaskSnapshot {
        &self.snapshot
    }

    /// Failure of the latest poll; cleared by the next successful poll,
    /// start, resume or clear.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// `true` once polling ended on a terminal status or a failure.
    pub fn is_settled(&self) -> bool {
        !self.polling && (self.snapshot.status.is_terminal() || self.last_error.is_some())
    }

    pub fn is_tracking(&self) -> bool {
        self.task_id.is_some()
    }

    pub(super) fn reset(&mut self) {
        self.task_id = None;
        self.polling = false;
        self.snapshot = TaskSnapshot::default();
        self.last_error = None;
    }
}
