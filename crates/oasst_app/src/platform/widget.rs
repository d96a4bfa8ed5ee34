use std::time::{Duration, Instant};

use oasst_core::widget::update;
use oasst_core::{WidgetMsg, WidgetOutput, WidgetSettings, WidgetState};
use oasst_engine::{EngineHandle, PageSource};
use oasst_logging::{oasst_info, oasst_warn};

use super::effects::{widget_msg, EffectRunner};

/// One page-question widget bound to one page, from creation until destroyed.
pub struct AskWidget {
    state: WidgetState,
    runner: EffectRunner,
    page: PageSource,
    reveal_at: Instant,
}

impl AskWidget {
    /// Creates the widget hidden; it shows itself once `reveal_delay` has passed.
    pub fn create(
        settings: WidgetSettings,
        reveal_delay: Duration,
        page: PageSource,
        engine: EngineHandle,
    ) -> Self {
        oasst_info!("Ask widget created for {}", page);
        Self {
            state: WidgetState::new(settings),
            runner: EffectRunner::new(engine),
            page,
            reveal_at: Instant::now() + reveal_delay,
        }
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn output(&self) -> &WidgetOutput {
        self.state.output()
    }

    /// Reveals the widget when its delay has run out. Returns whether it is visible.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.state.is_visible() && now >= self.reveal_at {
            self.dispatch(WidgetMsg::Revealed);
        }
        self.state.is_visible()
    }

    /// Blocks until the reveal delay has passed.
    pub fn wait_until_visible(&mut self) {
        let now = Instant::now();
        if let Some(remaining) = self.reveal_at.checked_duration_since(now) {
            std::thread::sleep(remaining);
        }
        self.tick(Instant::now());
    }

    pub fn close(&mut self) {
        self.dispatch(WidgetMsg::CloseClicked);
    }

    pub fn dispatch(&mut self, msg: WidgetMsg) -> bool {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run_widget(effects, &self.page);
        self.state.consume_dirty()
    }

    /// Asks `question` (or the current one) about the page and waits for the answer.
    ///
    /// Every failure, including running out of time, ends in [`WidgetOutput::Error`].
    pub fn ask(&mut self, question: Option<String>, timeout: Duration) -> &WidgetOutput {
        if let Some(question) = question {
            self.dispatch(WidgetMsg::QuestionChanged(question));
        }
        self.dispatch(WidgetMsg::AskClicked);

        let deadline = Instant::now().checked_add(timeout);
        while self.state.is_pending() {
            let remaining = deadline.map_or(timeout, |deadline| {
                deadline.saturating_duration_since(Instant::now())
            });
            match self.runner.next_result(remaining) {
                Some(event) => {
                    self.dispatch(widget_msg(event));
                }
                None => {
                    oasst_warn!("No answer within {:?}", timeout);
                    self.runner.abandon();
                    self.dispatch(WidgetMsg::AskFailed("timed out".to_string()));
                }
            }
        }
        self.state.output()
    }

    /// Tears the widget down; outstanding requests are dropped with the engine.
    pub fn destroy(mut self) {
        self.runner.abandon();
        oasst_info!("Ask widget for {} destroyed", self.page);
    }
}
