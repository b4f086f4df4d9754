use std::{env, path::PathBuf, sync::Arc};

use tracing::{info, warn};

use tw_core::{FileStore, TaskTracker, TrackerConfig, TrackerState};
use tw_http::{HttpBackend, HttpBackendConfig};
use tw_observe::{LoggerConfig, logger_init};

const ENDPOINT_ENV: &str = "TASKWATCH_ENDPOINT";
const STATE_ENV: &str = "TASKWATCH_STATE_DIR";
const STATE_FILE: &str = "state.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Logger
    let cfg = LoggerConfig::from_env()?;
    logger_init(&cfg)?;

    // 2) Backend + durable store
    let endpoint = env::var(ENDPOINT_ENV).unwrap_or_else(|_| "http://localhost:8080".to_string());
    let backend = HttpBackend::new(HttpBackendConfig::new(endpoint.clone()))?;

    let state_dir = env::var(STATE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".taskwatch"));
    let store = FileStore::new(state_dir.join(STATE_FILE));
    info!(endpoint = %endpoint, store = %store.path().display(), "task tracker configured");

    let tracker = TaskTracker::new(Arc::new(backend), Arc::new(store), TrackerConfig::default())?;

    // 3) Start, resume or clear
    let mut rx = tracker.subscribe();
    match env::args().nth(1).as_deref() {
        Some("--clear") => {
            tracker.clear_task()?;
            return Ok(());
        }
        Some(id) => tracker.start_task(id)?,
        None => tracker.resume_task()?,
    }
    if !tracker.state().is_tracking() {
        info!("nothing to watch; usage: watch [TASK_ID | --clear]");
        return Ok(());
    }

    // 4) Watch until polling settles; first Ctrl+C asks the backend to stop the task
    let mut stop_sent = false;
    let mut printed = None;
    loop {
        let state = rx.borrow_and_update().clone();
        if printed.as_ref() != Some(state.snapshot()) && !state.snapshot().is_empty() {
            print_state(&state);
            printed = Some(state.snapshot().clone());
        }
        if state.is_settled() {
            break;
        }

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c(), if !stop_sent => {
                stop_sent = true;
                match tracker.stop_running_task().await {
                    Ok(()) => info!("stop requested, waiting for final status"),
                    Err(e) => warn!(error = %e, "stop request failed"),
                }
            }
        }
    }

    let state = tracker.state();
    match state.last_error() {
        None => info!(status = %state.snapshot().status, "task finished; run `watch --clear` to forget it"),
        Some(error) => warn!(error, "polling stopped; run `watch` again to resume"),
    }
    tracker.shutdown();
    Ok(())
}

fn print_state(state: &TrackerState) {
    let snapshot = state.snapshot();
    let task = state.task_id().map(|id| id.as_str()).unwrap_or("-");
    println!(
        "{task} [{status}] {progress}/{total} ({pct:.0}%) {message}",
        status = snapshot.status,
        progress = snapshot.progress,
        total = snapshot.total,
        pct = snapshot.fraction() * 100.0,
        message = snapshot.message,
    );
    if let Some(error) = &snapshot.error {
        println!("{task} error: {error}");
    }
}
