use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Elements whose content never counts as page text.
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "button", "input", "head",
];

const BLOCK_TAGS: &[&str] = &[
    "div", "p", "section", "article", "header", "footer", "nav", "aside", "main", "figure",
    "figcaption", "table", "tr", "td", "th", "ul", "ol", "li", "blockquote", "address", "h1",
    "h2", "h3", "h4", "h5", "h6", "br", "hr", "pre",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub title: Option<String>,
    pub text: String,
}

/// Collects the readable text of a page as one whitespace-collapsed line.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibleTextExtractor;

impl VisibleTextExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, html: &str) -> ExtractedText {
        let document = Html::parse_document(html);
        let root = document.root_element();
        let title = root
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().name().eq_ignore_ascii_case("title"))
            .map(|element| collapse(&element.text().collect::<String>()))
            .filter(|title| !title.is_empty());

        let mut ctx = TextContext::default();
        for child in root.children() {
            self.visit_node(child, &mut ctx);
        }

        ExtractedText {
            title,
            text: ctx.into_text(),
        }
    }

    fn visit_node(&self, node: NodeRef<'_, Node>, ctx: &mut TextContext) {
        match node.value() {
            Node::Text(text) => ctx.append_text(text),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(node) {
                    self.visit_element(element, ctx);
                }
            }
            _ => {
                for child in node.children() {
                    self.visit_node(child, ctx);
                }
            }
        }
    }

    fn visit_element(&self, element: ElementRef<'_>, ctx: &mut TextContext) {
        let tag = element.value().name().to_ascii_lowercase();
        if SKIPPED_TAGS.contains(&tag.as_str()) {
            return;
        }
        let block = BLOCK_TAGS.contains(&tag.as_str());
        if block {
            ctx.separate();
        }
        for child in element.children() {
            self.visit_node(child, ctx);
        }
        if block {
            ctx.separate();
        }
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Default)]
struct TextContext {
    builder: String,
    last_char: Option<char>,
}

impl TextContext {
    fn append_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                self.separate();
            } else {
                self.builder.push(ch);
                self.last_char = Some(ch);
            }
        }
    }

    fn separate(&mut self) {
        if self.builder.is_empty() || self.last_char == Some(' ') {
            return;
        }
        self.builder.push(' ');
        self.last_char = Some(' ');
    }

    fn into_text(self) -> String {
        self.builder.trim_end().to_string()
    }
}
