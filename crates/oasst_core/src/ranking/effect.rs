use super::task::TaskUpdate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingEffect {
    /// `GET /api/new_task/rank_assistant_replies`.
    FetchTask,
    /// `POST /api/update_task`.
    SubmitRanking(TaskUpdate),
}
