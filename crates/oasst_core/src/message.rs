//! Conversation bubble: markdown content plus avatar metadata.

/// Markdown renderer that may still be loading.
pub trait MarkdownRender {
    /// Rendered HTML, or `None` while the renderer is not available yet.
    fn try_render(&self, markdown: &str) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Avatar {
    pub name: Option<String>,
    pub src: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedBody {
    /// Raw content shown while the renderer loads.
    Plain(String),
    Html(String),
}

impl RenderedBody {
    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderedBody::Html(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    pub content: String,
    pub avatar: Avatar,
    /// Background override; the theme default applies when `None`.
    pub bg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub avatar: Avatar,
    pub body: RenderedBody,
    pub bg: Option<String>,
}

impl MessageEntry {
    pub fn new(content: impl Into<String>, avatar: Avatar) -> Self {
        Self {
            content: content.into(),
            avatar,
            bg: None,
        }
    }

    pub fn render(&self, renderer: &dyn MarkdownRender) -> MessageView {
        let body = match renderer.try_render(&self.content) {
            Some(html) => RenderedBody::Html(html),
            None => RenderedBody::Plain(self.content.clone()),
        };
        MessageView {
            avatar: self.avatar.clone(),
            body,
            bg: self.bg.clone(),
        }
    }
}
