use std::sync::OnceLock;

use oasst_core::MarkdownRender;
use oasst_logging::oasst_debug;
use pulldown_cmark::{html, Event, Options, Parser};

struct MarkdownEngine {
    options: Options,
}

impl MarkdownEngine {
    fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        Self { options }
    }

    fn render(&self, markdown: &str) -> String {
        // Raw HTML in message content is shown as text.
        let events = Parser::new_ext(markdown, self.options).map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events);
        out
    }
}

/// Markdown renderer that stays unavailable until [`load`](Self::load) runs.
///
/// Messages rendered before that fall back to their plain content.
#[derive(Default)]
pub struct DeferredMarkdown {
    engine: OnceLock<MarkdownEngine>,
}

impl DeferredMarkdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.engine.get().is_some()
    }

    pub fn load(&self) {
        self.engine.get_or_init(|| {
            oasst_debug!("Markdown renderer loaded");
            MarkdownEngine::new()
        });
    }
}

impl MarkdownRender for DeferredMarkdown {
    fn try_render(&self, markdown: &str) -> Option<String> {
        self.engine.get().map(|engine| engine.render(markdown))
    }
}
