use std::fs;
use std::path::Path;

use anyhow::Context;
use oasst_core::chat::update;
use oasst_core::{
    ChatConfigEffect, ChatConfigError, ChatConfigMsg, ChatConfigState, ChatInitialData,
};
use oasst_engine::ConfigCacheStore;
use oasst_logging::{oasst_error, oasst_info, oasst_warn};

pub fn load_initial_data(path: &Path) -> anyhow::Result<ChatInitialData> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read model list {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse model list {}", path.display()))
}

/// Chat configuration form backed by the cache file.
pub struct ChatConfigSession {
    state: ChatConfigState,
    store: ConfigCacheStore,
}

impl ChatConfigSession {
    /// Builds the form and hydrates it from whatever the cache holds.
    pub fn open(initial: ChatInitialData, store: ConfigCacheStore) -> Self {
        let cached = store.load_or_empty();
        let mut session = Self {
            state: ChatConfigState::new(initial),
            store,
        };
        if let Err(err) = session.dispatch(ChatConfigMsg::Hydrate(cached)) {
            oasst_warn!("Hydration reported {}", err);
        }
        session
    }

    pub fn state(&self) -> &ChatConfigState {
        &self.state
    }

    /// Applies `msg`; a rejected change comes back as the error shown to the user.
    pub fn dispatch(&mut self, msg: ChatConfigMsg) -> Result<(), ChatConfigError> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        let mut outcome = Ok(());
        for effect in effects {
            match effect {
                ChatConfigEffect::PersistCache(record) => {
                    if let Err(err) = self.store.save(&record) {
                        oasst_error!("Failed to write chat config cache: {}", err);
                    }
                }
                ChatConfigEffect::ShowError(err) => {
                    oasst_info!("Chat config change rejected: {}", err);
                    outcome = Err(err);
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use oasst_core::{
        ChatConfigError, ChatConfigMsg, ChatInitialData, ModelInfo, ModelParameterConfig,
        PluginEntry, SamplingParameters,
    };
    use oasst_engine::ConfigCacheStore;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::{load_initial_data, ChatConfigSession};

    fn preset(name: &str, temperature: f64) -> ModelParameterConfig {
        ModelParameterConfig {
            name: name.to_string(),
            sampling_parameters: SamplingParameters {
                temperature: Some(temperature),
                ..Default::default()
            },
        }
    }

    fn initial() -> ChatInitialData {
        ChatInitialData {
            model_infos: vec![ModelInfo {
                name: "llama".to_string(),
                parameter_configs: vec![preset("k50", 0.5), preset("k50-Plugins", 0.9)],
            }],
            built_in_plugins: vec![PluginEntry::new("https://web.example/ai-plugin.json", false)],
        }
    }

    #[test]
    fn accepted_changes_survive_a_restart() {
        let temp = TempDir::new().unwrap();
        let store = ConfigCacheStore::new(temp.path().join("cache.json"));

        let mut session = ChatConfigSession::open(initial(), store.clone());
        session
            .dispatch(ChatConfigMsg::PresetSelected("__custom__".into()))
            .unwrap();
        session.dispatch(ChatConfigMsg::SavePreset("mine".into())).unwrap();

        let reopened = ChatConfigSession::open(initial(), store);
        assert_eq!(reopened.state().selected_preset_name(), "$$mine");
        assert_eq!(reopened.state().custom_presets().len(), 1);
    }

    #[test]
    fn rejected_changes_do_not_touch_the_cache() {
        let temp = TempDir::new().unwrap();
        let store = ConfigCacheStore::new(temp.path().join("cache.json"));

        let mut session = ChatConfigSession::open(initial(), store.clone());
        let before = store.load().unwrap();
        let err = session
            .dispatch(ChatConfigMsg::ModelSelected("gpt-unknown".into()))
            .unwrap_err();
        assert_eq!(err, ChatConfigError::UnknownModel("gpt-unknown".into()));
        assert_eq!(store.load().unwrap(), before);
    }

    #[test]
    fn enabling_a_plugin_is_persisted_with_its_preset() {
        let temp = TempDir::new().unwrap();
        let store = ConfigCacheStore::new(temp.path().join("cache.json"));

        let mut session = ChatConfigSession::open(initial(), store.clone());
        session
            .dispatch(ChatConfigMsg::PluginToggled {
                url: "https://web.example/ai-plugin.json".into(),
                enabled: true,
            })
            .unwrap();

        let cached = store.load().unwrap().unwrap();
        assert_eq!(cached.selected_preset_name, "k50-Plugins");
        assert_eq!(cached.custom_preset_config.temperature, Some(0.9));
        assert!(cached.selected_plugins.iter().any(|p| p.enabled));
    }

    #[test]
    fn model_list_is_read_from_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("models.json");
        std::fs::write(&path, serde_json::to_string(&initial()).unwrap()).unwrap();
        assert_eq!(load_initial_data(&path).unwrap(), initial());
    }
}
