use std::collections::HashSet;
use std::time::{Duration, Instant};

use oasst_core::{RankingEffect, RankingMsg, WidgetEffect, WidgetMsg};
use oasst_engine::{EngineEvent, EngineHandle, PageSource, RequestId};
use oasst_logging::{oasst_debug, oasst_info, oasst_warn};

/// Turns core effects into engine requests and engine results back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    in_flight: HashSet<RequestId>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            in_flight: HashSet::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn run_widget(&mut self, effects: Vec<WidgetEffect>, page: &PageSource) {
        for effect in effects {
            let request_id = match effect {
                WidgetEffect::GatherPageText => {
                    oasst_info!("Gathering page text from {}", page);
                    self.engine.load_page(page.clone())
                }
                WidgetEffect::RemoteAsk {
                    prompt,
                    dropped_chunks,
                } => {
                    if dropped_chunks > 0 {
                        oasst_warn!(
                            "Page text exceeds the chunk budget; {} later chunk(s) not sent",
                            dropped_chunks
                        );
                    }
                    self.engine.ask(prompt)
                }
            };
            self.in_flight.insert(request_id);
        }
    }

    pub fn run_ranking(&mut self, effects: Vec<RankingEffect>) {
        for effect in effects {
            let request_id = match effect {
                RankingEffect::FetchTask => self.engine.fetch_task(),
                RankingEffect::SubmitRanking(update) => self.engine.submit_ranking(update),
            };
            self.in_flight.insert(request_id);
        }
    }

    /// Waits for the next result of a request issued by this runner.
    ///
    /// Progress events are logged and skipped. `None` once `timeout` elapses.
    pub fn next_result(&mut self, timeout: Duration) -> Option<EngineEvent> {
        // An unrepresentable deadline means waiting without limit.
        let deadline = Instant::now().checked_add(timeout);
        loop {
            let remaining = match deadline {
                Some(deadline) => deadline.checked_duration_since(Instant::now())?,
                None => timeout,
            };
            let event = self.engine.recv_timeout(remaining)?;
            let request_id = match &event {
                EngineEvent::Progress(progress) => {
                    oasst_debug!("{}: {} bytes", progress.url, progress.bytes);
                    continue;
                }
                EngineEvent::PageLoaded { request_id, .. }
                | EngineEvent::AskCompleted { request_id, .. }
                | EngineEvent::TaskFetched { request_id, .. }
                | EngineEvent::RankingSubmitted { request_id, .. } => *request_id,
            };
            if self.in_flight.remove(&request_id) {
                return Some(event);
            }
            oasst_debug!("Ignoring result of unknown request {}", request_id);
        }
    }

    /// Forgets outstanding requests, e.g. after a timeout.
    pub fn abandon(&mut self) {
        if !self.in_flight.is_empty() {
            oasst_warn!("Abandoning {} outstanding request(s)", self.in_flight.len());
            self.in_flight.clear();
        }
    }
}

pub fn widget_msg(event: EngineEvent) -> WidgetMsg {
    match event {
        EngineEvent::PageLoaded { result, .. } => match result {
            Ok(page) => WidgetMsg::PageTextGathered(page.text),
            Err(err) => {
                oasst_warn!("Page text unavailable: {}", err);
                WidgetMsg::AskFailed(err.to_string())
            }
        },
        EngineEvent::AskCompleted { result, .. } => match result {
            Ok(answer) => WidgetMsg::AnswerReceived(answer),
            Err(err) => {
                oasst_warn!("Ask failed: {}", err);
                WidgetMsg::AskFailed(err.to_string())
            }
        },
        _ => WidgetMsg::NoOp,
    }
}

pub fn ranking_msg(event: EngineEvent) -> RankingMsg {
    match event {
        EngineEvent::TaskFetched { result, .. } => match result {
            Ok(task) => RankingMsg::TaskLoaded(task),
            Err(err) => RankingMsg::RequestFailed(err.to_string()),
        },
        EngineEvent::RankingSubmitted { result, .. } => match result {
            Ok(next) => RankingMsg::SubmitCompleted(next),
            Err(err) => RankingMsg::RequestFailed(err.to_string()),
        },
        _ => RankingMsg::NoOp,
    }
}

#[cfg(test)]
mod tests {
    use oasst_engine::{ApiError, AskError, FailureKind, FetchError, PageText};

    use super::*;

    #[test]
    fn page_results_become_widget_messages() {
        let loaded = EngineEvent::PageLoaded {
            request_id: 1,
            result: Ok(PageText {
                title: None,
                text: "body".into(),
                encoding: "UTF-8".into(),
            }),
        };
        assert_eq!(widget_msg(loaded), WidgetMsg::PageTextGathered("body".into()));

        let failed = EngineEvent::PageLoaded {
            request_id: 2,
            result: Err(FetchError {
                kind: FailureKind::Timeout,
                message: "slow".into(),
            }),
        };
        assert!(matches!(widget_msg(failed), WidgetMsg::AskFailed(_)));
    }

    #[test]
    fn ask_failures_become_failed_messages() {
        let event = EngineEvent::AskCompleted {
            request_id: 3,
            result: Err(AskError::HttpStatus(500)),
        };
        assert_eq!(
            widget_msg(event),
            WidgetMsg::AskFailed("ask endpoint answered with status 500".into())
        );
    }

    #[test]
    fn task_results_become_ranking_messages() {
        let event = EngineEvent::TaskFetched {
            request_id: 4,
            result: Ok(None),
        };
        assert_eq!(ranking_msg(event), RankingMsg::TaskLoaded(None));

        let event = EngineEvent::RankingSubmitted {
            request_id: 5,
            result: Err(ApiError::Timeout),
        };
        assert_eq!(
            ranking_msg(event),
            RankingMsg::RequestFailed("request timed out".into())
        );
    }
}
