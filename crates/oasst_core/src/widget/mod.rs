//! Page-question widget: collects page text and asks a remote endpoint about it.
mod chunk;
mod effect;
mod msg;
mod state;
mod update;

pub use chunk::split_text;
pub use effect::WidgetEffect;
pub use msg::WidgetMsg;
pub use state::{
    WidgetOutput, WidgetSettings, WidgetState, DEFAULT_CHUNK_BUDGET, DEFAULT_QUESTION, ERROR_TEXT,
};
pub use update::update;
