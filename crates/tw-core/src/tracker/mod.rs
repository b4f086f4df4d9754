//! Task lifecycle client.
//!
//! A [`TaskTracker`] watches a single long-running backend task: it starts
//! or resumes tracking, polls the status endpoint until the task becomes
//! terminal, forwards stop requests and forgets the task on demand. The
//! tracked id is mirrored into a [`TrackingStore`] so tracking survives a
//! restart.

mod poll;
mod state;
pub use state::TrackerState;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::{runtime::Handle, sync::watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tw_model::{TaskId, TaskSnapshot};

use crate::{backend::TaskBackend, config::TrackerConfig, error::CoreError, store::TrackingStore};

/// Handle to the shared tracking state.
///
/// Clones refer to the same instance. Operations that start polling spawn
/// onto the current Tokio runtime and fail with [`CoreError::NoRuntime`]
/// outside of one.
#[derive(Clone)]
pub struct TaskTracker {
    shared: Arc<Shared>,
}

struct Shared {
    backend: Arc<dyn TaskBackend>,
    store: Arc<dyn TrackingStore>,
    config: TrackerConfig,
    state: watch::Sender<TrackerState>,
    /// Token of the current poll loop; guarded so transitions are serialized.
    poller: Mutex<Option<CancellationToken>>,
}

impl Shared {
    /// Applies `f` only if `generation` is still current.
    fn apply(&self, generation: u64, f: impl FnOnce(&mut TrackerState)) -> bool {
        self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            f(state);
            true
        })
    }
}

impl TaskTracker {
    /// Create a tracker, restoring the tracked task id from `store`.
    pub fn new(
        backend: Arc<dyn TaskBackend>,
        store: Arc<dyn TrackingStore>,
        config: TrackerConfig,
    ) -> Result<Self, CoreError> {
        let task_id = load_persisted(store.as_ref(), &config.storage_key)?;
        if let Some(id) = &task_id {
            info!(task_id = %id, "restored tracked task");
        }

        let (state, _) = watch::channel(TrackerState {
            task_id,
            ..Default::default()
        });
        Ok(Self {
            shared: Arc::new(Shared {
                backend,
                store,
                config,
                state,
                poller: Mutex::new(None),
            }),
        })
    }

    /// Current state (copy).
    pub fn state(&self) -> TrackerState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<TrackerState> {
        self.shared.state.subscribe()
    }

    pub fn task_id(&self) -> Option<TaskId> {
        self.shared.state.borrow().task_id.clone()
    }

    pub fn is_polling(&self) -> bool {
        self.shared.state.borrow().polling
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        self.shared.state.borrow().snapshot.clone()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.shared.config
    }

    /// Start tracking `id`, replacing whatever was tracked before.
    ///
    /// The id is persisted first; if that fails nothing else changes.
    /// The first poll fires immediately.
    pub fn start_task(&self, id: impl Into<TaskId>) -> Result<(), CoreError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CoreError::EmptyTaskId);
        }
        let runtime = current_runtime()?;

        let mut poller = self.lock_poller();
        self.shared
            .store
            .set(&self.shared.config.storage_key, id.as_str())?;

        let tracked = id.clone();
        self.transition(&mut poller, Some(runtime), move |state| {
            state.task_id = Some(tracked);
            state.snapshot = TaskSnapshot::default();
            state.last_error = None;
            state.polling = true;
            true
        });
        drop(poller);

        info!(task_id = %id, "started tracking task");
        Ok(())
    }

    /// Restart polling for the tracked task, e.g. after a reload or a failed poll.
    ///
    /// Falls back to the persisted id when nothing is tracked in memory.
    /// No-op when neither exists.
    pub fn resume_task(&self) -> Result<(), CoreError> {
        let runtime = current_runtime()?;

        let mut poller = self.lock_poller();
        let restored = match self.task_id() {
            Some(_) => None,
            None => load_persisted(self.shared.store.as_ref(), &self.shared.config.storage_key)?,
        };

        let resumed = self.transition(&mut poller, Some(runtime), move |state| {
            if state.task_id.is_none() {
                state.task_id = restored;
            }
            if state.task_id.is_none() {
                return false;
            }
            state.last_error = None;
            true
        });
        drop(poller);

        match self.task_id() {
            Some(id) if resumed => info!(task_id = %id, "resumed tracking task"),
            _ => debug!("no task to resume"),
        }
        Ok(())
    }

    /// Ask the backend to stop the tracked task.
    ///
    /// Local state is left alone: the next poll observes the terminal
    /// status. Errors are returned to the caller unchanged.
    pub async fn stop_running_task(&self) -> Result<(), CoreError> {
        let Some(id) = self.task_id() else {
            debug!("no task to stop");
            return Ok(());
        };

        info!(task_id = %id, "requesting task stop");
        self.shared.backend.stop(&id).await.inspect_err(|e| {
            warn!(task_id = %id, error = %e, "failed to stop task");
        })
    }

    /// Forget the tracked task locally. Never contacts the backend.
    ///
    /// Memory is reset even when removing the durable record fails.
    pub fn clear_task(&self) -> Result<(), CoreError> {
        let mut poller = self.lock_poller();
        self.transition(&mut poller, None, |state| {
            state.reset();
            true
        });
        self.shared.store.remove(&self.shared.config.storage_key)?;
        drop(poller);

        info!("cleared task tracking");
        Ok(())
    }

    /// Stop the polling loop without forgetting the tracked task.
    pub fn shutdown(&self) {
        let mut poller = self.lock_poller();
        self.transition(&mut poller, None, |state| {
            state.polling = false;
            true
        });
        debug!("task tracker shut down");
    }

    /// Serializes transitions together with their store writes, so the
    /// durable record and the in-memory id change as one step.
    fn lock_poller(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.shared
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` on the state; when it returns `true` the generation is bumped,
    /// the running loop is cancelled and, given a runtime, a new one spawned.
    fn transition(
        &self,
        poller: &mut Option<CancellationToken>,
        respawn: Option<Handle>,
        f: impl FnOnce(&mut TrackerState) -> bool,
    ) -> bool {
        let mut generation = None;
        self.shared.state.send_if_modified(|state| {
            if !f(state) {
                return false;
            }
            state.generation += 1;
            generation = Some(state.generation);
            true
        });
        let Some(generation) = generation else {
            return false;
        };

        if let Some(previous) = poller.take() {
            previous.cancel();
        }
        if let Some(runtime) = respawn {
            let cancel = CancellationToken::new();
            *poller = Some(cancel.clone());
            runtime.spawn(poll::run(Arc::clone(&self.shared), generation, cancel));
        }
        true
    }
}

fn current_runtime() -> Result<Handle, CoreError> {
    Handle::try_current().map_err(|e| CoreError::NoRuntime(e.to_string()))
}

fn load_persisted(store: &dyn TrackingStore, key: &str) -> Result<Option<TaskId>, CoreError> {
    Ok(store
        .get(key)?
        .filter(|id| !id.is_empty())
        .map(TaskId::from))
}
