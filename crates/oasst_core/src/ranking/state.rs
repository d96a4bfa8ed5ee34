use super::task::{ConversationMessage, Task, TaskId, TaskUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankingPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Submitting,
    /// The server had no task to hand out.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankingError {
    #[error("ranking must order all {expected} replies exactly once")]
    InvalidRanking { expected: usize },
    #[error("reply position {position} is out of bounds for {len} replies")]
    InvalidMove { position: usize, len: usize },
    #[error("no task loaded")]
    NoTask,
    #[error("request failed: {0}")]
    Request(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedReply {
    pub original_index: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RankingView {
    pub phase: RankingPhase,
    pub task_id: Option<TaskId>,
    pub messages: Vec<ConversationMessage>,
    /// Replies in the user's current order, best first.
    pub replies: Vec<RankedReply>,
    pub error: Option<String>,
    pub dirty: bool,
}

/// One task at a time; a successor replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RankingState {
    phase: RankingPhase,
    task: Option<Task>,
    order: Vec<usize>,
    last_error: Option<RankingError>,
    dirty: bool,
}

impl RankingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> RankingView {
        let (task_id, messages, replies) = match &self.task {
            Some(task) => (
                Some(task.id.clone()),
                task.task.conversation.messages.clone(),
                self.order
                    .iter()
                    .map(|&index| RankedReply {
                        original_index: index,
                        text: task.task.replies[index].clone(),
                    })
                    .collect(),
            ),
            None => (None, Vec::new(), Vec::new()),
        };
        RankingView {
            phase: self.phase,
            task_id,
            messages,
            replies,
            error: self.last_error.as_ref().map(ToString::to_string),
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> RankingPhase {
        self.phase
    }

    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    /// Original reply indices in the user's order.
    pub fn ranking(&self) -> &[usize] {
        &self.order
    }

    pub fn last_error(&self) -> Option<&RankingError> {
        self.last_error.as_ref()
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_phase(&mut self, phase: RankingPhase) {
        if self.phase != phase {
            self.phase = phase;
            self.dirty = true;
        }
    }

    pub(crate) fn set_error(&mut self, error: Option<RankingError>) {
        if self.last_error != error {
            self.last_error = error;
            self.dirty = true;
        }
    }

    pub(crate) fn replace_task(&mut self, task: Option<Task>) {
        self.order = task
            .as_ref()
            .map(|t| (0..t.task.replies.len()).collect())
            .unwrap_or_default();
        self.phase = if task.is_some() {
            RankingPhase::Ready
        } else {
            RankingPhase::Empty
        };
        self.task = task;
        self.last_error = None;
        self.dirty = true;
    }

    pub(crate) fn reset_ranking(&mut self) {
        let len = self.order.len();
        self.order = (0..len).collect();
        self.dirty = true;
    }

    pub(crate) fn move_reply(&mut self, from: usize, to: usize) -> Result<(), RankingError> {
        let len = self.order.len();
        if self.task.is_none() {
            return Err(RankingError::NoTask);
        }
        for position in [from, to] {
            if position >= len {
                return Err(RankingError::InvalidMove { position, len });
            }
        }
        let index = self.order.remove(from);
        self.order.insert(to, index);
        self.dirty = true;
        Ok(())
    }

    pub(crate) fn set_ranking(&mut self, ranking: Vec<usize>) -> Result<(), RankingError> {
        let task = self.task.as_ref().ok_or(RankingError::NoTask)?;
        let expected = task.task.replies.len();
        if !is_permutation(&ranking, expected) {
            return Err(RankingError::InvalidRanking { expected });
        }
        self.order = ranking;
        self.dirty = true;
        Ok(())
    }

    pub(crate) fn submission(&self) -> Result<TaskUpdate, RankingError> {
        let task = self.task.as_ref().ok_or(RankingError::NoTask)?;
        Ok(TaskUpdate::message_ranking(
            task.id.clone(),
            self.order.clone(),
        ))
    }
}

fn is_permutation(ranking: &[usize], len: usize) -> bool {
    if ranking.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    ranking.iter().all(|&index| {
        index < len && !std::mem::replace(&mut seen[index], true)
    })
}
