//! Page download for `ask --url`: one shared client, capped body, page-like content only.
use std::sync::mpsc;
use std::time::Duration;

use futures_util::StreamExt;
use oasst_logging::oasst_debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;

use crate::{EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, FetchProgress, RequestId};

/// Content types the text extractor can make sense of.
const PAGE_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml", "text/plain"];

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Receives the running byte count of a download.
pub trait ProgressSink: Send + Sync {
    fn progress(&self, progress: FetchProgress);
}

impl ProgressSink for mpsc::Sender<EngineEvent> {
    fn progress(&self, progress: FetchProgress) {
        let _ = self.send(EngineEvent::Progress(progress));
    }
}

pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn progress(&self, _progress: FetchProgress) {}
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(
        &self,
        request_id: RequestId,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    max_bytes: u64,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            max_bytes: settings.max_bytes,
        })
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.max_bytes,
                actual: Some(actual),
            },
            format!("page exceeds {} bytes", self.max_bytes),
        )
    }

    async fn read_body(
        &self,
        response: reqwest::Response,
        request_id: RequestId,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<u8>, FetchError> {
        if let Some(announced) = response.content_length().filter(|len| *len > self.max_bytes) {
            return Err(self.too_large(announced));
        }

        let url = response.url().to_string();
        let report = |bytes: usize| {
            sink.progress(FetchProgress {
                request_id,
                url: url.clone(),
                bytes: bytes as u64,
            })
        };
        report(0);

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(piece) = stream.next().await {
            let piece = piece.map_err(map_reqwest_error)?;
            let total = (body.len() + piece.len()) as u64;
            if total > self.max_bytes {
                return Err(self.too_large(total));
            }
            body.extend_from_slice(&piece);
            report(body.len());
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(
        &self,
        request_id: RequestId,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<FetchOutput, FetchError> {
        let url = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        oasst_debug!("Request {}: GET {}", request_id, url);

        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if let Some(content_type) = content_type.as_deref() {
            ensure_page_content(content_type)?;
        }

        let final_url = response.url().to_string();
        let bytes = self.read_body(response, request_id, sink).await?;
        Ok(FetchOutput {
            bytes,
            metadata: FetchMetadata {
                final_url,
                content_type,
            },
        })
    }
}

fn ensure_page_content(content_type: &str) -> Result<(), FetchError> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    if PAGE_CONTENT_TYPES
        .iter()
        .any(|page| page.eq_ignore_ascii_case(essence))
    {
        return Ok(());
    }
    Err(FetchError::new(
        FailureKind::UnsupportedContentType {
            content_type: content_type.to_string(),
        },
        "not a page",
    ))
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, err.to_string())
}
