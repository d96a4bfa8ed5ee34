//! Chat configuration form: model, preset, sampling sliders and plugins.
mod cache;
mod effect;
mod msg;
mod plugin;
mod preset;
mod sampling;
mod state;
mod update;
mod view_model;

pub use cache::ConfigCache;
pub use effect::ChatConfigEffect;
pub use msg::ChatConfigMsg;
pub use plugin::{any_enabled, merge_cached_plugins, PluginEntry};
pub use preset::{
    display_name, find_preset_name, preset_kind, prefixed_custom_name, resolve_preset,
    CustomPreset, ModelInfo, ModelParameterConfig, PresetKind, PresetResolution,
    CUSTOM_PRESET_NAME, CUSTOM_PRESET_PREFIX, PLUGIN_PRESET_NAME,
};
pub use sampling::{ParameterError, ParameterKey, ParameterRange, SamplingParameters};
pub use state::{ChatConfigError, ChatConfigState, ChatInitialData, ChatRequestSettings};
pub use update::update;
pub use view_model::{ChatConfigView, ParameterFieldView, PresetOption};
