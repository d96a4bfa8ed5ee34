use super::cache::ConfigCache;
use super::plugin::PluginEntry;
use super::sampling::ParameterKey;

#[derive(Debug, Clone, PartialEq)]
pub enum ChatConfigMsg {
    /// Restore the form from the persisted cache. Runs once per state.
    Hydrate(Option<ConfigCache>),
    /// User picked a model.
    ModelSelected(String),
    /// User picked a preset from the preset selector.
    PresetSelected(String),
    /// User moved a slider or typed into its number box.
    ParameterChanged {
        key: ParameterKey,
        value: Option<f64>,
    },
    /// User flipped the switch next to a slider.
    ParameterToggled { key: ParameterKey, enabled: bool },
    /// User enabled or disabled a plugin.
    PluginToggled { url: String, enabled: bool },
    /// User added a plugin by url.
    PluginAdded(PluginEntry),
    /// User removed a non built-in plugin.
    PluginRemoved(String),
    /// User confirmed the "save preset" input.
    SavePreset(String),
    /// User dismissed the error notification.
    ErrorDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}
