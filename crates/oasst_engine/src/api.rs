use std::time::Duration;

use oasst_core::{Task, TaskUpdate};
use oasst_logging::{oasst_debug, oasst_info};
use reqwest::StatusCode;
use url::Url;

pub const NEW_RANKING_TASK_PATH: &str = "api/new_task/rank_assistant_replies";
pub const UPDATE_TASK_PATH: &str = "api/update_task";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("invalid api base url {0}")]
    InvalidBaseUrl(String),
    #[error("request timed out")]
    Timeout,
    #[error("request failed: {0}")]
    Network(String),
    #[error("server answered {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("malformed task payload: {0}")]
    MalformedResponse(String),
}

/// Task backend used by the ranking page.
#[async_trait::async_trait]
pub trait TaskApi: Send + Sync {
    /// `None` when no ranking task is available.
    async fn new_ranking_task(&self) -> Result<Option<Task>, ApiError>;

    /// Submits an update and returns the follow-up task, if any.
    async fn update_task(&self, update: &TaskUpdate) -> Result<Option<Task>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTaskApi {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestTaskApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base =
            Url::parse(base_url).map_err(|err| ApiError::InvalidBaseUrl(format!("{base_url}: {err}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self { base, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::InvalidBaseUrl(err.to_string()))
    }

    async fn read_task(response: reqwest::Response) -> Result<Option<Task>, ApiError> {
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }
        let body = response.text().await.map_err(map_reqwest_error)?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str::<Option<Task>>(&body)
            .map_err(|err| ApiError::MalformedResponse(err.to_string()))
    }
}

#[async_trait::async_trait]
impl TaskApi for ReqwestTaskApi {
    async fn new_ranking_task(&self) -> Result<Option<Task>, ApiError> {
        let url = self.endpoint(NEW_RANKING_TASK_PATH)?;
        oasst_debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        Self::read_task(response).await
    }

    async fn update_task(&self, update: &TaskUpdate) -> Result<Option<Task>, ApiError> {
        let url = self.endpoint(UPDATE_TASK_PATH)?;
        oasst_info!(
            "Submitting ranking {:?} for task {}",
            update.content.ranking,
            update.id
        );
        let response = self
            .client
            .post(url)
            .json(update)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        Self::read_task(response).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(err.to_string())
    }
}
