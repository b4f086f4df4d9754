use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::Shared;

/// Sequential status polling for one tracker generation.
///
/// The next poll is armed only after the previous one completed, so at most
/// one request is in flight. The loop ends on a terminal status, on the
/// first failure, when cancelled, or once its generation is superseded.
pub(super) async fn run(shared: Arc<Shared>, generation: u64, cancel: CancellationToken) {
    loop {
        let task_id = {
            let state = shared.state.borrow();
            if state.generation != generation {
                return;
            }
            state.task_id.clone()
        };
        let Some(task_id) = task_id else {
            shared.apply(generation, |state| state.polling = false);
            return;
        };

        debug!(task_id = %task_id, generation, "polling task status");
        let result = tokio::select! {
            _ = cancel.cancelled() => {
                debug!(task_id = %task_id, "status poll cancelled");
                return;
            }
            result = shared.backend.status(&task_id) => result,
        };

        match result {
            Ok(snapshot) => {
                let active = snapshot.status.is_active();
                let status = snapshot.status.clone();
                let applied = shared.apply(generation, |state| {
                    state.snapshot = snapshot;
                    state.polling = active;
                    state.last_error = None;
                });
                if !applied {
                    debug!(task_id = %task_id, "discarding status of superseded poll");
                    return;
                }
                if !active {
                    info!(task_id = %task_id, status = %status, "task reached terminal status");
                    return;
                }
            }
            Err(e) => {
                warn!(task_id = %task_id, error = %e, "failed to poll task status");
                shared.apply(generation, |state| {
                    state.polling = false;
                    state.last_error = Some(e.to_string());
                });
                return;
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(shared.config.poll_interval) => {}
        }
    }
}
