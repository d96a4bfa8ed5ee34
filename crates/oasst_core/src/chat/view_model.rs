use super::plugin::PluginEntry;
use super::sampling::{ParameterKey, ParameterRange};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterFieldView {
    pub key: ParameterKey,
    pub label: &'static str,
    /// `None` renders the switch off and hides the slider.
    pub value: Option<f64>,
    pub range: ParameterRange,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatConfigView {
    pub model_config_name: String,
    pub models: Vec<String>,
    pub selected_preset_name: String,
    pub preset_options: Vec<PresetOption>,
    pub preset_locked: bool,
    pub parameters: Vec<ParameterFieldView>,
    pub plugins: Vec<PluginEntry>,
    /// The save button is only offered for unsaved custom values.
    pub can_save_preset: bool,
    pub error: Option<String>,
    pub hydrated: bool,
    pub dirty: bool,
}
