use super::task::Task;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingMsg {
    /// Page opened; fetches a task unless one is already cached.
    Mounted,
    /// Explicit re-fetch trigger.
    Refetch,
    /// Task endpoint answered; `None` means no task is available.
    TaskLoaded(Option<Task>),
    /// User dragged the reply at display position `from` to position `to`.
    ReplyMoved { from: usize, to: usize },
    /// Sortable list reported a complete ordering of original indices.
    RankingChanged(Vec<usize>),
    /// User clicked Submit.
    SubmitClicked,
    /// Update endpoint answered with the next task.
    SubmitCompleted(Option<Task>),
    /// User clicked Skip.
    SkipClicked,
    /// A fetch or submit failed.
    RequestFailed(String),
    /// Fallback for placeholder wiring.
    NoOp,
}
