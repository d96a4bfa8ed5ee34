/// Literal shown in the output area whenever an ask fails.
pub const ERROR_TEXT: &str = "ERROR";
pub const DEFAULT_QUESTION: &str = "Key takeaways of this page?";
pub const DEFAULT_CHUNK_BUDGET: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSettings {
    /// Maximum characters per page-text chunk.
    pub chunk_budget: usize,
    pub default_question: String,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            chunk_budget: DEFAULT_CHUNK_BUDGET,
            default_question: DEFAULT_QUESTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WidgetOutput {
    #[default]
    Empty,
    Pending,
    Answer(String),
    Error,
}

impl WidgetOutput {
    pub fn display_text(&self) -> &str {
        match self {
            WidgetOutput::Empty | WidgetOutput::Pending => "",
            WidgetOutput::Answer(text) => text,
            WidgetOutput::Error => ERROR_TEXT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidgetState {
    settings: WidgetSettings,
    visible: bool,
    question: String,
    output: WidgetOutput,
    dirty: bool,
}

impl WidgetState {
    pub fn new(settings: WidgetSettings) -> Self {
        Self {
            question: settings.default_question.clone(),
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn output(&self) -> &WidgetOutput {
        &self.output
    }

    pub fn is_pending(&self) -> bool {
        self.output == WidgetOutput::Pending
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.dirty = true;
        }
    }

    pub(crate) fn set_question(&mut self, question: String) {
        if self.question != question {
            self.question = question;
            self.dirty = true;
        }
    }

    pub(crate) fn set_output(&mut self, output: WidgetOutput) {
        if self.output != output {
            self.output = output;
            self.dirty = true;
        }
    }
}
