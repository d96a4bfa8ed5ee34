pub mod chat;
pub mod effects;
pub mod ranking;
pub mod render;
pub mod widget;
