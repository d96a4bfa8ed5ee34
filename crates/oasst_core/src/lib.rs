//! Oasst core: pure state machines and view-model helpers.
//!
//! Every interactive surface is modelled the same way: a state value, a message
//! enum and a pure `update` function returning the next state plus the effects
//! the caller has to execute (network calls, cache writes, notifications).
pub mod chat;
pub mod docs;
pub mod drafts;
pub mod message;
pub mod ranking;
pub mod widget;

pub use chat::{
    ChatConfigEffect, ChatConfigError, ChatConfigMsg, ChatConfigState, ChatConfigView,
    ChatInitialData, ChatRequestSettings, ConfigCache, CustomPreset, ModelInfo,
    ModelParameterConfig, ParameterKey, PluginEntry, PresetResolution, SamplingParameters,
};
pub use docs::{DocEntry, DocsIndex, SidebarItem, SidebarLink};
pub use drafts::{DraftMessage, DraftState, DraftViewer, ModelConfigRef, WorkParameters};
pub use message::{Avatar, MarkdownRender, MessageEntry, MessageView, RenderedBody};
pub use ranking::{
    RankingEffect, RankingError, RankingMsg, RankingPhase, RankingState, RankingView, Task,
    TaskId, TaskUpdate,
};
pub use widget::{split_text, WidgetEffect, WidgetMsg, WidgetOutput, WidgetSettings, WidgetState};
