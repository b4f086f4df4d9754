use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use tracing::debug;

use tw_core::{CoreError, TaskBackend};
use tw_model::{ErrorBody, StopTaskRequest, TASK_ID_PARAM, TaskId, TaskSnapshot};

use crate::config::HttpBackendConfig;

/// [`TaskBackend`] speaking the task status/stop HTTP contract.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    status_url: Url,
    stop_url: Url,
}

impl HttpBackend {
    pub fn new(config: HttpBackendConfig) -> Result<Self, CoreError> {
        let mut builder = Client::builder();
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder
            .build()
            .map_err(|e| CoreError::InvalidConfig(format!("http client: {}", e)))?;

        Ok(Self {
            client,
            status_url: join(&config.endpoint, &config.status_path)?,
            stop_url: join(&config.endpoint, &config.stop_path)?,
        })
    }
}

#[async_trait]
impl TaskBackend for HttpBackend {
    async fn status(&self, id: &TaskId) -> Result<TaskSnapshot, CoreError> {
        let mut url = self.status_url.clone();
        url.query_pairs_mut().append_pair(TASK_ID_PARAM, id.as_str());

        debug!(task_id = %id, "requesting task status");
        let response = self.client.get(url).send().await.map_err(request_failed)?;
        let body = read_body(id, response).await?;

        serde_json::from_str(&body).map_err(|e| {
            CoreError::InvalidResponse(format!("failed to parse status: {}, body: {}", e, body))
        })
    }

    async fn stop(&self, id: &TaskId) -> Result<(), CoreError> {
        let request = StopTaskRequest {
            task_id: id.clone(),
        };

        debug!(task_id = %id, "requesting task stop");
        let response = self
            .client
            .post(self.stop_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(request_failed)?;

        read_body(id, response).await.map(drop)
    }
}

fn join(endpoint: &str, path: &str) -> Result<Url, CoreError> {
    let raw = format!("{}/{}", endpoint.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&raw).map_err(|e| CoreError::InvalidConfig(format!("invalid url {}: {}", raw, e)))
}

fn request_failed(e: reqwest::Error) -> CoreError {
    CoreError::RequestFailed(e.to_string())
}

/// Returns the body of a successful response, or maps the failure.
async fn read_body(id: &TaskId, response: Response) -> Result<String, CoreError> {
    let status = response.status();
    let body = response.text().await.map_err(request_failed)?;

    if status.is_success() {
        return Ok(body);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(CoreError::TaskNotFound(id.clone()));
    }

    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);
    Err(CoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}
