use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use oasst_core::TaskUpdate;
use oasst_logging::{oasst_error, oasst_info};

use crate::api::{ApiError, ReqwestTaskApi, TaskApi};
use crate::ask::{AskClient, AskError, ReqwestAskClient, DEFAULT_ASK_ENDPOINT};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::page::load_page;
use crate::{EngineEvent, FetchError, PageSource, RequestId};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub ask_endpoint: String,
    pub api_base_url: String,
    pub request_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            ask_endpoint: DEFAULT_ASK_ENDPOINT.to_string(),
            api_base_url: "http://localhost:3000".to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Ask(#[from] AskError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

enum EngineCommand {
    LoadPage {
        request_id: RequestId,
        source: PageSource,
    },
    Ask {
        request_id: RequestId,
        prompt: String,
    },
    FetchTask {
        request_id: RequestId,
    },
    SubmitRanking {
        request_id: RequestId,
        update: TaskUpdate,
    },
}

#[derive(Clone)]
struct Services {
    fetcher: Arc<dyn Fetcher>,
    ask: Arc<dyn AskClient>,
    api: Arc<dyn TaskApi>,
}

/// Runs network work on a background tokio runtime; results come back as [`EngineEvent`]s.
///
/// Dropping the handle stops the worker once in-flight commands are accepted.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    next_request: AtomicU64,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let fetcher = ReqwestFetcher::new(config.fetch)?;
        let ask = ReqwestAskClient::new(&config.ask_endpoint, config.request_timeout)?;
        let api = ReqwestTaskApi::new(&config.api_base_url, config.request_timeout)?;
        Ok(Self::with_services(
            Arc::new(fetcher),
            Arc::new(ask),
            Arc::new(api),
        ))
    }

    pub fn with_services(
        fetcher: Arc<dyn Fetcher>,
        ask: Arc<dyn AskClient>,
        api: Arc<dyn TaskApi>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let services = Services { fetcher, ask, api };

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    oasst_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let services = services.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(&services, command, event_tx).await;
                });
            }
            oasst_info!("Engine command channel closed");
        });

        Self {
            cmd_tx,
            event_rx,
            next_request: AtomicU64::new(1),
        }
    }

    pub fn load_page(&self, source: PageSource) -> RequestId {
        self.send(|request_id| EngineCommand::LoadPage { request_id, source })
    }

    pub fn ask(&self, prompt: impl Into<String>) -> RequestId {
        let prompt = prompt.into();
        self.send(|request_id| EngineCommand::Ask { request_id, prompt })
    }

    pub fn fetch_task(&self) -> RequestId {
        self.send(|request_id| EngineCommand::FetchTask { request_id })
    }

    pub fn submit_ranking(&self, update: TaskUpdate) -> RequestId {
        self.send(|request_id| EngineCommand::SubmitRanking { request_id, update })
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: impl FnOnce(RequestId) -> EngineCommand) -> RequestId {
        let request_id = self.next_request.fetch_add(1, Ordering::Relaxed);
        if self.cmd_tx.send(command(request_id)).is_err() {
            oasst_error!("Engine worker is gone; request {} dropped", request_id);
        }
        request_id
    }
}

async fn handle_command(
    services: &Services,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::LoadPage { request_id, source } => {
            let result = load_page(request_id, &source, services.fetcher.as_ref(), &event_tx).await;
            EngineEvent::PageLoaded { request_id, result }
        }
        EngineCommand::Ask { request_id, prompt } => EngineEvent::AskCompleted {
            request_id,
            result: services.ask.ask(&prompt).await,
        },
        EngineCommand::FetchTask { request_id } => EngineEvent::TaskFetched {
            request_id,
            result: services.api.new_ranking_task().await,
        },
        EngineCommand::SubmitRanking { request_id, update } => EngineEvent::RankingSubmitted {
            request_id,
            result: services.api.update_task(&update).await,
        },
    };
    let _ = event_tx.send(event);
}
