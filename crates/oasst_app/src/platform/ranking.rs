use std::time::Duration;

use oasst_core::ranking::update;
use oasst_core::{RankingMsg, RankingState, RankingView};
use oasst_engine::EngineHandle;
use oasst_logging::oasst_warn;

use super::effects::{ranking_msg, EffectRunner};

/// Drives the ranking page against the task backend, one request at a time.
pub struct RankingSession {
    state: RankingState,
    runner: EffectRunner,
    timeout: Duration,
}

impl RankingSession {
    pub fn new(engine: EngineHandle, timeout: Duration) -> Self {
        Self {
            state: RankingState::new(),
            runner: EffectRunner::new(engine),
            timeout,
        }
    }

    pub fn state(&self) -> &RankingState {
        &self.state
    }

    pub fn view(&self) -> RankingView {
        self.state.view()
    }

    /// Applies `msg` and waits until the requests it triggered have resolved.
    pub fn dispatch(&mut self, msg: RankingMsg) {
        self.apply(msg);
        while !self.runner.is_idle() {
            match self.runner.next_result(self.timeout) {
                Some(event) => self.apply(ranking_msg(event)),
                None => {
                    oasst_warn!("Task backend did not answer within {:?}", self.timeout);
                    self.runner.abandon();
                    self.apply(RankingMsg::RequestFailed("request timed out".to_string()));
                }
            }
        }
    }

    fn apply(&mut self, msg: RankingMsg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run_ranking(effects);
    }
}

/// One line of input in the interactive ranking loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingCommand {
    Move { from: usize, to: usize },
    Order(Vec<usize>),
    Submit,
    Skip,
    Refetch,
    Quit,
    Help,
}

impl RankingCommand {
    pub const HELP: &'static str = "commands: move <from> <to> | order <i,j,...> | submit | skip | refetch | quit";

    /// Positions and indices are typed 1-based and stored 0-based.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(RankingCommand::Help);
        };
        let rest: Vec<&str> = words.collect();
        match (head.to_ascii_lowercase().as_str(), rest.as_slice()) {
            ("move" | "m", [from, to]) => Ok(RankingCommand::Move {
                from: one_based(from)?,
                to: one_based(to)?,
            }),
            ("order" | "o", [list]) => list
                .split(',')
                .map(one_based)
                .collect::<Result<Vec<_>, _>>()
                .map(RankingCommand::Order),
            ("submit" | "s", []) => Ok(RankingCommand::Submit),
            ("skip" | "k", []) => Ok(RankingCommand::Skip),
            ("refetch" | "r", []) => Ok(RankingCommand::Refetch),
            ("quit" | "q", []) => Ok(RankingCommand::Quit),
            ("help" | "h" | "?", []) => Ok(RankingCommand::Help),
            _ => Err(format!("cannot parse {line:?}; {}", Self::HELP)),
        }
    }

    pub fn into_msg(self) -> Option<RankingMsg> {
        match self {
            RankingCommand::Move { from, to } => Some(RankingMsg::ReplyMoved { from, to }),
            RankingCommand::Order(order) => Some(RankingMsg::RankingChanged(order)),
            RankingCommand::Submit => Some(RankingMsg::SubmitClicked),
            RankingCommand::Skip => Some(RankingMsg::SkipClicked),
            RankingCommand::Refetch => Some(RankingMsg::Refetch),
            RankingCommand::Quit | RankingCommand::Help => None,
        }
    }
}

fn one_based(word: &str) -> Result<usize, String> {
    match word.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("{word:?} is not a position (positions start at 1)")),
    }
}

/// Parses `--ranking 3,1,2` style orders given on the command line.
pub fn parse_order(list: &str) -> Result<Vec<usize>, String> {
    list.split(',').map(one_based).collect()
}
