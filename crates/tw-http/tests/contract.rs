use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tokio::net::TcpListener;

use tw_core::{CoreError, MemoryStore, TaskBackend, TaskTracker, TrackerConfig};
use tw_http::{HttpBackend, HttpBackendConfig};
use tw_model::{StopTaskRequest, TaskId, TaskSnapshot, TaskStatus};

/// In-process stand-in for the task service.
#[derive(Clone, Default)]
struct FakeService {
    tasks: Arc<Mutex<HashMap<String, TaskSnapshot>>>,
}

impl FakeService {
    fn put(&self, id: &str, snapshot: TaskSnapshot) {
        self.tasks.lock().unwrap().insert(id.to_string(), snapshot);
    }
}

async fn status(
    State(svc): State<FakeService>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let Some(id) = query.get("task_id").filter(|id| !id.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "task_id is required"})),
        )
            .into_response();
    };
    match svc.tasks.lock().unwrap().get(id) {
        Some(snapshot) => Json(snapshot.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "Task not found"}))).into_response(),
    }
}

async fn stop(State(svc): State<FakeService>, Json(req): Json<StopTaskRequest>) -> Response {
    if let Some(task) = svc.tasks.lock().unwrap().get_mut(req.task_id.as_str())
        && task.status.is_active()
    {
        task.status = TaskStatus::Stopped;
        task.message = "Cancelled".to_string();
    }
    Json(json!({"message": "Task stopped"})).into_response()
}

async fn broken() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "database unavailable"})),
    )
        .into_response()
}

async fn garbage() -> &'static str {
    "definitely not json"
}

async fn serve(svc: FakeService) -> String {
    let app = Router::new()
        .route("/api/llm-test-cases/task/status", get(status))
        .route("/api/llm-test-cases/task/stop", post(stop))
        .route("/broken", get(broken).post(broken))
        .route("/garbage", get(garbage))
        .with_state(svc);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn running(progress: u64) -> TaskSnapshot {
    TaskSnapshot::new(TaskStatus::Running, progress, 10, "working")
}

#[tokio::test]
async fn status_decodes_snapshot() {
    let svc = FakeService::default();
    svc.put("t1", running(4));
    let backend = HttpBackend::new(HttpBackendConfig::new(serve(svc).await)).unwrap();

    let snapshot = backend.status(&TaskId::from("t1")).await.unwrap();
    assert_eq!(snapshot, running(4));
}

#[tokio::test]
async fn unknown_task_is_not_found() {
    let backend = HttpBackend::new(HttpBackendConfig::new(serve(FakeService::default()).await)).unwrap();

    let err = backend.status(&TaskId::from("missing")).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, CoreError::TaskNotFound(id) if id.as_str() == "missing"));
}

#[tokio::test]
async fn stop_is_observed_by_next_status() {
    let svc = FakeService::default();
    svc.put("t1", running(2));
    let backend = HttpBackend::new(HttpBackendConfig::new(serve(svc).await)).unwrap();
    let id = TaskId::from("t1");

    backend.stop(&id).await.unwrap();
    let snapshot = backend.status(&id).await.unwrap();
    assert_eq!(snapshot.status, TaskStatus::Stopped);
    assert_eq!(snapshot.message, "Cancelled");
}

#[tokio::test]
async fn server_error_carries_message() {
    let config = HttpBackendConfig {
        status_path: "/broken".to_string(),
        stop_path: "/broken".to_string(),
        ..HttpBackendConfig::new(serve(FakeService::default()).await)
    };
    let backend = HttpBackend::new(config).unwrap();
    let id = TaskId::from("t1");

    for err in [
        backend.status(&id).await.unwrap_err(),
        backend.stop(&id).await.unwrap_err(),
    ] {
        match err {
            CoreError::Rejected { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "database unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[tokio::test]
async fn undecodable_body_is_invalid_response() {
    let config = HttpBackendConfig {
        status_path: "/garbage".to_string(),
        ..HttpBackendConfig::new(serve(FakeService::default()).await)
    };
    let backend = HttpBackend::new(config).unwrap();

    let err = backend.status(&TaskId::from("t1")).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidResponse(_)));
}

#[tokio::test]
async fn unreachable_backend_is_request_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(HttpBackendConfig::new(format!("http://{}", addr))).unwrap();
    let err = backend.status(&TaskId::from("t1")).await.unwrap_err();
    assert!(matches!(err, CoreError::RequestFailed(_)));
}

#[tokio::test]
async fn tracker_follows_task_to_completion() {
    let svc = FakeService::default();
    svc.put("t1", TaskSnapshot::new(TaskStatus::Pending, 0, 10, ""));
    let backend = HttpBackend::new(HttpBackendConfig::new(serve(svc.clone()).await)).unwrap();

    let tracker = TaskTracker::new(
        Arc::new(backend),
        Arc::new(MemoryStore::new()),
        TrackerConfig::default().with_poll_interval(Duration::from_millis(20)),
    )
    .unwrap();
    let mut rx = tracker.subscribe();

    tracker.start_task("t1").unwrap();
    tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| s.snapshot().status == TaskStatus::Pending),
    )
    .await
    .unwrap()
    .unwrap();
    assert!(tracker.is_polling());

    tracker.stop_running_task().await.unwrap();
    let state = tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| s.snapshot().status.is_terminal()),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();

    assert_eq!(state.snapshot().status, TaskStatus::Stopped);
    assert!(!state.is_polling());
    assert_eq!(state.task_id(), Some(&TaskId::from("t1")));
}
