use serde::{Deserialize, Serialize};

pub type TaskId = String;

/// Ranking task as issued by `GET /api/new_task/rank_assistant_replies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub task: RankingTask,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RankingTask {
    #[serde(default)]
    pub replies: Vec<String>,
    #[serde(default)]
    pub conversation: Conversation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub text: String,
    #[serde(default)]
    pub is_assistant: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    MessageRanking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingContent {
    pub ranking: Vec<usize>,
}

/// Body of `POST /api/update_task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub id: TaskId,
    pub update_type: UpdateType,
    pub content: RankingContent,
}

impl TaskUpdate {
    pub fn message_ranking(id: impl Into<TaskId>, ranking: Vec<usize>) -> Self {
        Self {
            id: id.into(),
            update_type: UpdateType::MessageRanking,
            content: RankingContent { ranking },
        }
    }
}
