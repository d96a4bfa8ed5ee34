//! Draft viewer: several streamed candidate replies shown side by side.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chat::SamplingParameters;

/// Lifecycle state of a draft message as reported by the inference server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DraftState {
    Pending,
    InProgress,
    Complete,
    AbortedByWorker,
    Cancelled,
    Timeout,
    Other(String),
}

impl DraftState {
    pub fn as_str(&self) -> &str {
        match self {
            DraftState::Pending => "pending",
            DraftState::InProgress => "in_progress",
            DraftState::Complete => "complete",
            DraftState::AbortedByWorker => "aborted_by_worker",
            DraftState::Cancelled => "cancelled",
            DraftState::Timeout => "timeout",
            DraftState::Other(state) => state,
        }
    }

    /// No further tokens will arrive.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DraftState::Complete
                | DraftState::AbortedByWorker
                | DraftState::Cancelled
                | DraftState::Timeout
        )
    }
}

impl From<&str> for DraftState {
    fn from(value: &str) -> Self {
        match value {
            "pending" => DraftState::Pending,
            "in_progress" => DraftState::InProgress,
            "complete" => DraftState::Complete,
            "aborted_by_worker" => DraftState::AbortedByWorker,
            "cancelled" => DraftState::Cancelled,
            "timeout" => DraftState::Timeout,
            other => DraftState::Other(other.to_string()),
        }
    }
}

impl From<String> for DraftState {
    fn from(value: String) -> Self {
        DraftState::from(value.as_str())
    }
}

impl From<DraftState> for String {
    fn from(value: DraftState) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for DraftState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings the worker actually used to produce a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkParameters {
    #[serde(default)]
    pub model_config: ModelConfigRef,
    #[serde(default)]
    pub sampling_parameters: SamplingParameters,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// The worker reports its full model config; only the id is shown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelConfigRef {
    #[serde(default)]
    pub model_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftMessage {
    pub state: DraftState,
    #[serde(default)]
    pub work_parameters: Option<WorkParameters>,
}

impl DraftMessage {
    pub fn new(state: impl Into<DraftState>) -> Self {
        Self {
            state: state.into(),
            work_parameters: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftViewer {
    streamed_drafts: Vec<String>,
    draft_messages: Vec<DraftMessage>,
    expanded: Option<usize>,
}

impl Default for DraftViewer {
    fn default() -> Self {
        Self {
            streamed_drafts: Vec::new(),
            draft_messages: Vec::new(),
            expanded: Some(0),
        }
    }
}

impl DraftViewer {
    pub fn new(streamed_drafts: Vec<String>, draft_messages: Vec<DraftMessage>) -> Self {
        Self {
            streamed_drafts,
            draft_messages,
            ..Self::default()
        }
    }

    pub fn set_streamed_drafts(&mut self, drafts: Vec<String>) {
        self.streamed_drafts = drafts;
    }

    pub fn set_draft_messages(&mut self, messages: Vec<DraftMessage>) {
        self.draft_messages = messages;
    }

    pub fn streamed_drafts(&self) -> &[String] {
        &self.streamed_drafts
    }

    /// Nothing has streamed in yet.
    pub fn is_loading(&self) -> bool {
        self.streamed_drafts.iter().all(String::is_empty)
    }

    pub fn is_complete(&self) -> bool {
        self.draft_messages.iter().all(|m| m.state.is_terminal())
    }

    /// Toggling the expanded draft collapses every draft.
    pub fn toggle_expand(&mut self, index: usize) {
        self.expanded = if self.expanded == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded == Some(index)
    }

    /// Work parameters of the first draft, once every draft has finished.
    pub fn work_parameters(&self) -> Option<&WorkParameters> {
        if !self.is_complete() {
            return None;
        }
        self.draft_messages
            .first()
            .and_then(|m| m.work_parameters.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::{DraftMessage, DraftState, DraftViewer};

    fn drafts(states: &[&str]) -> Vec<DraftMessage> {
        states.iter().map(|s| DraftMessage::new(*s)).collect()
    }

    #[test]
    fn terminal_states_complete_the_viewer() {
        let viewer = DraftViewer::new(
            Vec::new(),
            drafts(&["complete", "timeout", "cancelled", "aborted_by_worker"]),
        );
        assert!(viewer.is_complete());
    }

    #[test]
    fn streaming_draft_is_not_complete() {
        let viewer = DraftViewer::new(Vec::new(), drafts(&["complete", "streaming"]));
        assert!(!viewer.is_complete());
        assert_eq!(
            DraftState::from("streaming"),
            DraftState::Other("streaming".into())
        );
    }

    #[test]
    fn loading_until_any_draft_has_text() {
        let mut viewer = DraftViewer::new(vec![String::new(), String::new()], Vec::new());
        assert!(viewer.is_loading());
        viewer.set_streamed_drafts(vec![String::new(), "Hi".into()]);
        assert!(!viewer.is_loading());
    }

    #[test]
    fn first_draft_starts_expanded_and_toggles_closed() {
        let mut viewer = DraftViewer::default();
        assert!(viewer.is_expanded(0));
        viewer.toggle_expand(1);
        assert!(viewer.is_expanded(1));
        assert!(!viewer.is_expanded(0));
        viewer.toggle_expand(1);
        assert!(!viewer.is_expanded(1));
    }

    #[test]
    fn states_round_trip_through_strings() {
        let state: DraftState = serde_json::from_str("\"aborted_by_worker\"").unwrap();
        assert_eq!(state, DraftState::AbortedByWorker);
        assert_eq!(serde_json::to_string(&state).unwrap(), "\"aborted_by_worker\"");
    }
}
