//! Rank-assistant-replies task page.
mod effect;
mod msg;
mod state;
mod task;
mod update;

pub use effect::RankingEffect;
pub use msg::RankingMsg;
pub use state::{RankedReply, RankingError, RankingPhase, RankingState, RankingView};
pub use task::{
    Conversation, ConversationMessage, RankingContent, RankingTask, Task, TaskId, TaskUpdate,
    UpdateType,
};
pub use update::update;
