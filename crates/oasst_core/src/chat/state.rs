use serde::{Deserialize, Serialize};

use super::cache::ConfigCache;
use super::plugin::{any_enabled, merge_cached_plugins, PluginEntry};
use super::preset::{
    display_name, find_custom, find_preset_name, preset_kind, prefixed_custom_name,
    resolve_preset, CustomPreset, ModelInfo, ModelParameterConfig, PresetKind, PresetResolution,
    CUSTOM_PRESET_NAME, PLUGIN_PRESET_NAME,
};
use super::sampling::{ParameterError, ParameterKey, SamplingParameters};
use super::view_model::{ChatConfigView, ParameterFieldView, PresetOption};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChatConfigError {
    #[error("a preset named {name:?} already exists")]
    PresetExists { name: String },
    #[error("preset name must not be empty")]
    EmptyPresetName,
    #[error("unknown preset {0:?}")]
    UnknownPreset(String),
    #[error("unknown model {0:?}")]
    UnknownModel(String),
    #[error("preset selection is locked while plugins are enabled")]
    PresetLocked,
    #[error("only hand-edited values can be saved, current preset is {0:?}")]
    NotCustomPreset(String),
    #[error("parameters are fixed by preset {0:?}")]
    ParametersLocked(String),
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error("unknown plugin {0:?}")]
    UnknownPlugin(String),
    #[error("plugin {0:?} is already listed")]
    PluginExists(String),
    #[error("built-in plugin {0:?} cannot be removed")]
    BuiltInPlugin(String),
}

/// Server-provided data the form is built from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatInitialData {
    #[serde(default)]
    pub model_infos: Vec<ModelInfo>,
    #[serde(default)]
    pub built_in_plugins: Vec<PluginEntry>,
}

/// Settings submitted along with a chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequestSettings {
    pub model_config_name: String,
    pub sampling_parameters: SamplingParameters,
    pub plugins: Vec<PluginEntry>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatConfigState {
    models: Vec<ModelInfo>,
    built_in_plugins: Vec<PluginEntry>,
    model_config_name: String,
    selected_preset_name: String,
    parameters: SamplingParameters,
    plugins: Vec<PluginEntry>,
    custom_presets: Vec<CustomPreset>,
    preset_locked: bool,
    hydrated: bool,
    last_error: Option<ChatConfigError>,
    dirty: bool,
}

impl ChatConfigState {
    /// Form defaults: first model, its first preset, built-in plugins all disabled.
    pub fn new(initial: ChatInitialData) -> Self {
        let ChatInitialData {
            model_infos,
            built_in_plugins,
        } = initial;
        let first_model = model_infos.first();
        let model_config_name = first_model.map(|m| m.name.clone()).unwrap_or_default();
        let presets = first_model
            .map(|m| m.parameter_configs.as_slice())
            .unwrap_or_default();
        let parameters = presets
            .first()
            .map(|p| p.sampling_parameters)
            .unwrap_or_default();
        let selected_preset_name = find_preset_name(presets, &parameters);

        Self {
            plugins: built_in_plugins.clone(),
            models: model_infos,
            built_in_plugins,
            model_config_name,
            selected_preset_name,
            parameters,
            ..Self::default()
        }
    }

    pub fn view(&self) -> ChatConfigView {
        let mut preset_options: Vec<PresetOption> = self
            .current_presets()
            .iter()
            .map(|preset| PresetOption {
                value: preset.name.clone(),
                label: preset.name.clone(),
            })
            .collect();
        preset_options.extend(self.custom_presets.iter().map(|preset| PresetOption {
            value: preset.name.clone(),
            label: display_name(&preset.name).to_string(),
        }));
        preset_options.push(PresetOption {
            value: CUSTOM_PRESET_NAME.to_string(),
            label: "Custom".to_string(),
        });

        let sliders_disabled = !self.parameters_editable();
        ChatConfigView {
            model_config_name: self.model_config_name.clone(),
            models: self.models.iter().map(|m| m.name.clone()).collect(),
            selected_preset_name: self.selected_preset_name.clone(),
            preset_options,
            preset_locked: self.preset_locked,
            parameters: self
                .parameters
                .iter()
                .map(|(key, value)| ParameterFieldView {
                    key,
                    label: key.label(),
                    value,
                    range: key.range(),
                    disabled: sliders_disabled,
                })
                .collect(),
            plugins: self.plugins.clone(),
            can_save_preset: self.can_save_preset(),
            error: self.last_error.as_ref().map(ToString::to_string),
            hydrated: self.hydrated,
            dirty: self.dirty,
        }
    }

    pub fn model_config_name(&self) -> &str {
        &self.model_config_name
    }

    pub fn selected_preset_name(&self) -> &str {
        &self.selected_preset_name
    }

    pub fn parameters(&self) -> &SamplingParameters {
        &self.parameters
    }

    pub fn plugins(&self) -> &[PluginEntry] {
        &self.plugins
    }

    pub fn custom_presets(&self) -> &[CustomPreset] {
        &self.custom_presets
    }

    pub fn is_preset_locked(&self) -> bool {
        self.preset_locked
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    pub fn last_error(&self) -> Option<&ChatConfigError> {
        self.last_error.as_ref()
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Record written to the client cache.
    pub fn cache_record(&self) -> ConfigCache {
        ConfigCache {
            selected_preset_name: self.selected_preset_name.clone(),
            model_config_name: self.model_config_name.clone(),
            custom_preset_config: self.parameters,
            selected_plugins: self.enabled_plugins(),
            plugins: Some(self.plugins.clone()),
            custom_presets: Some(self.custom_presets.clone()),
        }
    }

    pub fn chat_request_settings(&self) -> ChatRequestSettings {
        ChatRequestSettings {
            model_config_name: self.model_config_name.clone(),
            sampling_parameters: self.parameters,
            plugins: self.enabled_plugins(),
        }
    }

    pub(crate) fn set_error(&mut self, error: Option<ChatConfigError>) {
        if self.last_error != error {
            self.last_error = error;
            self.dirty = true;
        }
    }

    /// Returns false when the form was already hydrated.
    pub(crate) fn hydrate(&mut self, cache: Option<ConfigCache>) -> bool {
        if self.hydrated {
            return false;
        }
        self.hydrated = true;
        self.dirty = true;

        let Some(cache) = cache else {
            return true;
        };

        if self.model(&cache.model_config_name).is_some() {
            self.model_config_name = cache.model_config_name.clone();
        }

        if let Some(cached) = &cache.plugins {
            self.plugins = merge_cached_plugins(&self.built_in_plugins, cached);
        }
        for selected in cache.selected_plugins.iter().filter(|p| p.enabled) {
            if !self.plugins.iter().any(|p| p.url == selected.url) {
                self.plugins.push(selected.clone());
            }
        }
        for plugin in &mut self.plugins {
            plugin.enabled = cache
                .selected_plugins
                .iter()
                .any(|selected| selected.enabled && selected.url == plugin.url);
        }

        if let Some(presets) = &cache.custom_presets {
            self.custom_presets = presets.clone();
        }

        let resolution = resolve_preset(
            &cache,
            self.current_model().or_else(|| self.models.first()),
            &self.custom_presets,
        );
        self.apply_resolution(resolution);
        true
    }

    pub(crate) fn select_model(&mut self, name: &str) -> Result<(), ChatConfigError> {
        if self.model(name).is_none() {
            return Err(ChatConfigError::UnknownModel(name.to_string()));
        }
        self.model_config_name = name.to_string();

        if self.preset_locked {
            self.sync_plugin_lock();
        } else if preset_kind(&self.selected_preset_name) == PresetKind::BuiltIn
            && !self.current_presets().iter().any(|p| p.name == self.selected_preset_name)
        {
            self.selected_preset_name = find_preset_name(self.current_presets(), &self.parameters);
        }
        self.dirty = true;
        Ok(())
    }

    pub(crate) fn select_preset(&mut self, name: &str) -> Result<(), ChatConfigError> {
        if self.preset_locked {
            return Err(ChatConfigError::PresetLocked);
        }
        let parameters = match preset_kind(name) {
            PresetKind::Unsaved => None,
            PresetKind::Custom => Some(
                *find_custom(&self.custom_presets, name)
                    .ok_or_else(|| ChatConfigError::UnknownPreset(name.to_string()))?,
            ),
            PresetKind::BuiltIn => Some(
                *self
                    .current_model()
                    .and_then(|m| m.preset(name))
                    .ok_or_else(|| ChatConfigError::UnknownPreset(name.to_string()))?,
            ),
        };
        if let Some(parameters) = parameters {
            self.parameters = parameters;
        }
        self.selected_preset_name = name.to_string();
        self.dirty = true;
        Ok(())
    }

    pub(crate) fn set_parameter(
        &mut self,
        key: ParameterKey,
        value: Option<f64>,
    ) -> Result<(), ChatConfigError> {
        self.ensure_parameters_editable()?;
        self.parameters.set(key, value)?;
        self.dirty = true;
        Ok(())
    }

    pub(crate) fn toggle_parameter(
        &mut self,
        key: ParameterKey,
        enabled: bool,
    ) -> Result<(), ChatConfigError> {
        self.ensure_parameters_editable()?;
        self.parameters.toggle(key, enabled);
        self.dirty = true;
        Ok(())
    }

    pub(crate) fn toggle_plugin(&mut self, url: &str, enabled: bool) -> Result<(), ChatConfigError> {
        let plugin = self
            .plugins
            .iter_mut()
            .find(|p| p.url == url)
            .ok_or_else(|| ChatConfigError::UnknownPlugin(url.to_string()))?;
        plugin.enabled = enabled;
        self.sync_plugin_lock();
        self.dirty = true;
        Ok(())
    }

    pub(crate) fn add_plugin(&mut self, plugin: PluginEntry) -> Result<(), ChatConfigError> {
        if self.plugins.iter().any(|p| p.url == plugin.url) {
            return Err(ChatConfigError::PluginExists(plugin.url));
        }
        self.plugins.push(plugin);
        self.sync_plugin_lock();
        self.dirty = true;
        Ok(())
    }

    pub(crate) fn remove_plugin(&mut self, url: &str) -> Result<(), ChatConfigError> {
        if self.built_in_plugins.iter().any(|p| p.url == url) {
            return Err(ChatConfigError::BuiltInPlugin(url.to_string()));
        }
        let index = self
            .plugins
            .iter()
            .position(|p| p.url == url)
            .ok_or_else(|| ChatConfigError::UnknownPlugin(url.to_string()))?;
        self.plugins.remove(index);
        self.sync_plugin_lock();
        self.dirty = true;
        Ok(())
    }

    pub(crate) fn save_preset(&mut self, name: &str) -> Result<(), ChatConfigError> {
        if self.preset_locked {
            return Err(ChatConfigError::PresetLocked);
        }
        if !self.can_save_preset() {
            return Err(ChatConfigError::NotCustomPreset(
                self.selected_preset_name.clone(),
            ));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(ChatConfigError::EmptyPresetName);
        }
        let prefixed = prefixed_custom_name(name);
        if self.custom_presets.iter().any(|p| p.name == prefixed) {
            return Err(ChatConfigError::PresetExists {
                name: name.to_string(),
            });
        }
        self.custom_presets.push(CustomPreset {
            name: prefixed.clone(),
            config: self.parameters,
        });
        self.selected_preset_name = prefixed;
        self.dirty = true;
        Ok(())
    }

    fn can_save_preset(&self) -> bool {
        !self.preset_locked && self.selected_preset_name == CUSTOM_PRESET_NAME
    }

    fn apply_resolution(&mut self, resolution: PresetResolution) {
        match resolution {
            PresetResolution::Plugin { parameters } => {
                if let Some(parameters) = parameters.filter(|p| p.validate().is_ok()) {
                    self.parameters = parameters;
                }
                self.selected_preset_name = PLUGIN_PRESET_NAME.to_string();
                self.preset_locked = true;
            }
            PresetResolution::ExplicitCustom { parameters } => {
                if parameters.validate().is_ok() {
                    self.parameters = parameters;
                    self.selected_preset_name = CUSTOM_PRESET_NAME.to_string();
                }
            }
            PresetResolution::NamedCustom { name, parameters }
            | PresetResolution::BuiltIn { name, parameters } => {
                if parameters.validate().is_ok() {
                    self.parameters = parameters;
                    self.selected_preset_name = name;
                }
            }
            PresetResolution::Unresolved => {}
        }
    }

    /// Any enabled plugin pins the plugin preset and locks the selector.
    fn sync_plugin_lock(&mut self) {
        if any_enabled(&self.plugins) {
            if let Some(parameters) = self
                .current_model()
                .and_then(|m| m.preset(PLUGIN_PRESET_NAME))
                .copied()
            {
                self.parameters = parameters;
            }
            self.selected_preset_name = PLUGIN_PRESET_NAME.to_string();
            self.preset_locked = true;
        } else {
            self.preset_locked = false;
        }
    }

    fn parameters_editable(&self) -> bool {
        preset_kind(&self.selected_preset_name) != PresetKind::BuiltIn
    }

    fn ensure_parameters_editable(&self) -> Result<(), ChatConfigError> {
        if self.parameters_editable() {
            Ok(())
        } else {
            Err(ChatConfigError::ParametersLocked(
                self.selected_preset_name.clone(),
            ))
        }
    }

    fn enabled_plugins(&self) -> Vec<PluginEntry> {
        self.plugins.iter().filter(|p| p.enabled).cloned().collect()
    }

    fn model(&self, name: &str) -> Option<&ModelInfo> {
        self.models.iter().find(|m| m.name == name)
    }

    fn current_model(&self) -> Option<&ModelInfo> {
        self.model(&self.model_config_name)
    }

    fn current_presets(&self) -> &[ModelParameterConfig] {
        self.current_model()
            .map(|m| m.parameter_configs.as_slice())
            .unwrap_or_default()
    }
}
