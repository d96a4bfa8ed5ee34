use serde::{Deserialize, Serialize};

use super::plugin::PluginEntry;
use super::preset::CustomPreset;
use super::sampling::SamplingParameters;

/// Record persisted after every accepted configuration change.
///
/// Field names match the record the web client keeps in local storage so the
/// two can share a cache file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigCache {
    #[serde(rename = "selectedPresetName", default)]
    pub selected_preset_name: String,
    #[serde(default)]
    pub model_config_name: String,
    #[serde(default)]
    pub custom_preset_config: SamplingParameters,
    #[serde(rename = "selectedPlugins", default)]
    pub selected_plugins: Vec<PluginEntry>,
    #[serde(default)]
    pub plugins: Option<Vec<PluginEntry>>,
    #[serde(default)]
    pub custom_presets: Option<Vec<CustomPreset>>,
}
