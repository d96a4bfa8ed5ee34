use serde::{Deserialize, Serialize};

use super::cache::ConfigCache;
use super::plugin::any_enabled;
use super::sampling::SamplingParameters;

/// Pseudo preset standing for "values edited by hand, not saved".
pub const CUSTOM_PRESET_NAME: &str = "__custom__";
/// Prefix distinguishing user presets from server-provided ones.
pub const CUSTOM_PRESET_PREFIX: &str = "$$";
/// Preset forced while any plugin is enabled.
pub const PLUGIN_PRESET_NAME: &str = "k50-Plugins";

/// Built-in preset shipped with a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameterConfig {
    pub name: String,
    pub sampling_parameters: SamplingParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub parameter_configs: Vec<ModelParameterConfig>,
}

impl ModelInfo {
    pub fn preset(&self, name: &str) -> Option<&SamplingParameters> {
        self.parameter_configs
            .iter()
            .find(|preset| preset.name == name)
            .map(|preset| &preset.sampling_parameters)
    }
}

/// User preset; `name` carries [`CUSTOM_PRESET_PREFIX`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomPreset {
    pub name: String,
    pub config: SamplingParameters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    BuiltIn,
    Custom,
    Unsaved,
}

pub fn preset_kind(name: &str) -> PresetKind {
    if name == CUSTOM_PRESET_NAME {
        PresetKind::Unsaved
    } else if name.starts_with(CUSTOM_PRESET_PREFIX) {
        PresetKind::Custom
    } else {
        PresetKind::BuiltIn
    }
}

pub fn prefixed_custom_name(name: &str) -> String {
    format!("{CUSTOM_PRESET_PREFIX}{name}")
}

/// Name shown to the user, without the custom prefix.
pub fn display_name(name: &str) -> &str {
    name.strip_prefix(CUSTOM_PRESET_PREFIX).unwrap_or(name)
}

pub fn find_custom<'a>(presets: &'a [CustomPreset], name: &str) -> Option<&'a SamplingParameters> {
    presets
        .iter()
        .find(|preset| preset.name == name)
        .map(|preset| &preset.config)
}

/// Name of the built-in preset whose values equal `params`, else the unsaved pseudo preset.
pub fn find_preset_name(presets: &[ModelParameterConfig], params: &SamplingParameters) -> String {
    presets
        .iter()
        .find(|preset| preset.sampling_parameters == *params)
        .map(|preset| preset.name.clone())
        .unwrap_or_else(|| CUSTOM_PRESET_NAME.to_string())
}

/// Preset restored from the cache, in descending priority.
#[derive(Debug, Clone, PartialEq)]
pub enum PresetResolution {
    /// Enabled plugins pin the plugin preset; parameters are `None` if the model lacks it.
    Plugin {
        parameters: Option<SamplingParameters>,
    },
    ExplicitCustom {
        parameters: SamplingParameters,
    },
    NamedCustom {
        name: String,
        parameters: SamplingParameters,
    },
    BuiltIn {
        name: String,
        parameters: SamplingParameters,
    },
    Unresolved,
}

/// Picks the preset to restore: plugin > explicit custom > named custom > built-in.
pub fn resolve_preset(
    cache: &ConfigCache,
    model: Option<&ModelInfo>,
    custom_presets: &[CustomPreset],
) -> PresetResolution {
    if any_enabled(&cache.selected_plugins) {
        return PresetResolution::Plugin {
            parameters: model.and_then(|m| m.preset(PLUGIN_PRESET_NAME)).copied(),
        };
    }

    let name = cache.selected_preset_name.as_str();
    match preset_kind(name) {
        PresetKind::Unsaved => PresetResolution::ExplicitCustom {
            parameters: cache.custom_preset_config,
        },
        PresetKind::Custom => match find_custom(custom_presets, name) {
            Some(parameters) => PresetResolution::NamedCustom {
                name: name.to_string(),
                parameters: *parameters,
            },
            None => PresetResolution::Unresolved,
        },
        PresetKind::BuiltIn => match model.and_then(|m| m.preset(name)) {
            Some(parameters) => PresetResolution::BuiltIn {
                name: name.to_string(),
                parameters: *parameters,
            },
            None => PresetResolution::Unresolved,
        },
    }
}
