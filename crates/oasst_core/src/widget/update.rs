use super::chunk::split_text;
use super::{WidgetEffect, WidgetMsg, WidgetOutput, WidgetState};

/// Pure update function for the page-question widget.
pub fn update(mut state: WidgetState, msg: WidgetMsg) -> (WidgetState, Vec<WidgetEffect>) {
    let effects = match msg {
        WidgetMsg::Revealed => {
            state.set_visible(true);
            Vec::new()
        }
        WidgetMsg::CloseClicked => {
            state.set_visible(false);
            Vec::new()
        }
        WidgetMsg::QuestionChanged(question) => {
            state.set_question(question);
            Vec::new()
        }
        WidgetMsg::AskClicked => {
            if state.is_pending() {
                return (state, Vec::new());
            }
            state.set_output(WidgetOutput::Pending);
            vec![WidgetEffect::GatherPageText]
        }
        WidgetMsg::PageTextGathered(text) => {
            if !state.is_pending() {
                return (state, Vec::new());
            }
            let chunks = split_text(&text, state.settings().chunk_budget);
            // Only the first chunk is sent; the rest of the page is not asked about.
            let dropped_chunks = chunks.len().saturating_sub(1);
            let first = chunks.into_iter().next().unwrap_or_default();
            vec![WidgetEffect::RemoteAsk {
                prompt: format!("{first}{}", state.question()),
                dropped_chunks,
            }]
        }
        WidgetMsg::AnswerReceived(answer) => {
            state.set_output(WidgetOutput::Answer(answer));
            Vec::new()
        }
        WidgetMsg::AskFailed(_) => {
            state.set_output(WidgetOutput::Error);
            Vec::new()
        }
        WidgetMsg::NoOp => Vec::new(),
    };

    (state, effects)
}
