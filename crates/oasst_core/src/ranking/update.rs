use super::{RankingEffect, RankingError, RankingMsg, RankingPhase, RankingState};

/// Pure update function for the ranking page.
pub fn update(mut state: RankingState, msg: RankingMsg) -> (RankingState, Vec<RankingEffect>) {
    let effects = match msg {
        RankingMsg::Mounted => {
            // The fetched task stays cached until an explicit refetch.
            if state.task().is_some() || state.phase() == RankingPhase::Loading {
                Vec::new()
            } else {
                state.set_phase(RankingPhase::Loading);
                vec![RankingEffect::FetchTask]
            }
        }
        RankingMsg::Refetch | RankingMsg::SkipClicked => {
            if matches!(state.phase(), RankingPhase::Loading | RankingPhase::Submitting) {
                return (state, Vec::new());
            }
            state.reset_ranking();
            state.set_phase(RankingPhase::Loading);
            vec![RankingEffect::FetchTask]
        }
        RankingMsg::TaskLoaded(task) | RankingMsg::SubmitCompleted(task) => {
            state.replace_task(task);
            Vec::new()
        }
        RankingMsg::ReplyMoved { from, to } => {
            let result = state.move_reply(from, to);
            record(&mut state, result);
            Vec::new()
        }
        RankingMsg::RankingChanged(ranking) => {
            let result = state.set_ranking(ranking);
            record(&mut state, result);
            Vec::new()
        }
        RankingMsg::SubmitClicked => {
            if state.phase() != RankingPhase::Ready {
                return (state, Vec::new());
            }
            match state.submission() {
                Ok(body) => {
                    state.set_phase(RankingPhase::Submitting);
                    vec![RankingEffect::SubmitRanking(body)]
                }
                Err(err) => {
                    state.set_error(Some(err));
                    Vec::new()
                }
            }
        }
        RankingMsg::RequestFailed(message) => {
            let phase = if state.task().is_some() {
                RankingPhase::Ready
            } else {
                RankingPhase::Empty
            };
            state.set_phase(phase);
            state.set_error(Some(RankingError::Request(message)));
            Vec::new()
        }
        RankingMsg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn record(state: &mut RankingState, result: Result<(), RankingError>) {
    state.set_error(result.err());
}
