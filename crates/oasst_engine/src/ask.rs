use std::time::Duration;

use oasst_logging::{oasst_debug, oasst_warn};
use serde::{Deserialize, Serialize};

/// Placeholder endpoint used until configuration names a real one.
pub const DEFAULT_ASK_ENDPOINT: &str = "https://MYENDPOINT.COM/ask";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AskError {
    #[error("invalid ask endpoint {0}")]
    InvalidEndpoint(String),
    #[error("ask request timed out")]
    Timeout,
    #[error("ask request failed: {0}")]
    Network(String),
    #[error("ask endpoint answered with status {0}")]
    HttpStatus(u16),
    #[error("malformed ask response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    summ: String,
}

/// Remote summarizer behind the page widget.
#[async_trait::async_trait]
pub trait AskClient: Send + Sync {
    async fn ask(&self, prompt: &str) -> Result<String, AskError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestAskClient {
    endpoint: reqwest::Url,
    client: reqwest::Client,
}

impl ReqwestAskClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, AskError> {
        let endpoint = reqwest::Url::parse(endpoint)
            .map_err(|err| AskError::InvalidEndpoint(format!("{endpoint}: {err}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AskError::Network(err.to_string()))?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait::async_trait]
impl AskClient for ReqwestAskClient {
    async fn ask(&self, prompt: &str) -> Result<String, AskError> {
        oasst_debug!(
            "Posting {} prompt chars to {}",
            prompt.chars().count(),
            self.endpoint
        );
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&AskRequest { prompt })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        // Error responses are failures even when they carry a summary.
        let status = response.status();
        if !status.is_success() {
            oasst_warn!("Ask endpoint {} returned {}", self.endpoint, status);
            return Err(AskError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        serde_json::from_str::<AskResponse>(&body)
            .map(|answer| answer.summ)
            .map_err(|err| AskError::MalformedResponse(err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> AskError {
    if err.is_timeout() {
        AskError::Timeout
    } else {
        AskError::Network(err.to_string())
    }
}
