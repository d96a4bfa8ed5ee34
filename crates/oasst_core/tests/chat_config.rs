use std::sync::Once;

use oasst_core::chat::{
    update, ChatConfigEffect, ChatConfigError, ChatConfigMsg, ChatConfigState, ChatInitialData,
    ConfigCache, CustomPreset, ModelInfo, ModelParameterConfig, ParameterKey, PluginEntry,
    SamplingParameters, CUSTOM_PRESET_NAME, PLUGIN_PRESET_NAME,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(oasst_logging::initialize_for_tests);
}

fn params(temperature: f64, top_k: Option<f64>) -> SamplingParameters {
    SamplingParameters {
        temperature: Some(temperature),
        max_new_tokens: Some(1024.0),
        top_p: Some(0.95),
        repetition_penalty: Some(1.2),
        top_k,
        typical_p: None,
    }
}

fn initial_data() -> ChatInitialData {
    ChatInitialData {
        model_infos: vec![
            ModelInfo {
                name: "oasst-sft-6".into(),
                parameter_configs: vec![
                    ModelParameterConfig {
                        name: "k50".into(),
                        sampling_parameters: params(0.75, Some(50.0)),
                    },
                    ModelParameterConfig {
                        name: "nucleus9".into(),
                        sampling_parameters: params(0.8, None),
                    },
                    ModelParameterConfig {
                        name: PLUGIN_PRESET_NAME.into(),
                        sampling_parameters: params(0.35, Some(50.0)),
                    },
                ],
            },
            ModelInfo {
                name: "oasst-rlhf-2".into(),
                parameter_configs: vec![ModelParameterConfig {
                    name: "k50".into(),
                    sampling_parameters: params(0.6, Some(50.0)),
                }],
            },
        ],
        built_in_plugins: vec![PluginEntry::new("https://plugins.example/search", false)],
    }
}

fn hydrated(cache: Option<ConfigCache>) -> ChatConfigState {
    let (state, _) = update(
        ChatConfigState::new(initial_data()),
        ChatConfigMsg::Hydrate(cache),
    );
    state
}

fn persisted(effects: &[ChatConfigEffect]) -> Option<&ConfigCache> {
    effects.iter().find_map(|effect| match effect {
        ChatConfigEffect::PersistCache(record) => Some(record),
        _ => None,
    })
}

#[test]
fn new_form_starts_on_first_builtin_preset() {
    init_logging();
    let state = ChatConfigState::new(initial_data());
    assert_eq!(state.model_config_name(), "oasst-sft-6");
    assert_eq!(state.selected_preset_name(), "k50");
    assert_eq!(*state.parameters(), params(0.75, Some(50.0)));
    assert!(!state.is_hydrated());
}

#[test]
fn preset_switch_overwrites_every_parameter() {
    init_logging();
    let state = hydrated(None);
    let (state, effects) = update(state, ChatConfigMsg::PresetSelected("nucleus9".into()));

    assert_eq!(state.selected_preset_name(), "nucleus9");
    assert_eq!(*state.parameters(), params(0.8, None));
    assert_eq!(persisted(&effects).unwrap().custom_preset_config, params(0.8, None));
}

#[test]
fn unknown_preset_is_rejected_without_change() {
    init_logging();
    let state = hydrated(None);
    let before = *state.parameters();
    let (state, effects) = update(state, ChatConfigMsg::PresetSelected("k999".into()));

    assert_eq!(*state.parameters(), before);
    assert_eq!(
        effects,
        vec![ChatConfigEffect::ShowError(ChatConfigError::UnknownPreset(
            "k999".into()
        ))]
    );
}

#[test]
fn enabling_a_plugin_forces_and_locks_the_plugin_preset() {
    init_logging();
    let state = hydrated(None);
    let (state, _) = update(
        state,
        ChatConfigMsg::PluginToggled {
            url: "https://plugins.example/search".into(),
            enabled: true,
        },
    );
    assert_eq!(state.selected_preset_name(), PLUGIN_PRESET_NAME);
    assert_eq!(*state.parameters(), params(0.35, Some(50.0)));
    assert!(state.is_preset_locked());

    let (state, effects) = update(state, ChatConfigMsg::PresetSelected("k50".into()));
    assert_eq!(state.selected_preset_name(), PLUGIN_PRESET_NAME);
    assert_eq!(
        effects,
        vec![ChatConfigEffect::ShowError(ChatConfigError::PresetLocked)]
    );

    let (state, _) = update(
        state,
        ChatConfigMsg::PluginToggled {
            url: "https://plugins.example/search".into(),
            enabled: false,
        },
    );
    assert!(!state.is_preset_locked());

    let (state, effects) = update(state, ChatConfigMsg::PresetSelected("k50".into()));
    assert_eq!(state.selected_preset_name(), "k50");
    assert!(persisted(&effects).is_some());
}

#[test]
fn lock_holds_while_any_plugin_stays_enabled() {
    init_logging();
    let state = hydrated(None);
    let (state, _) = update(
        state,
        ChatConfigMsg::PluginAdded(PluginEntry::new("https://plugins.example/weather", true)),
    );
    let (state, _) = update(
        state,
        ChatConfigMsg::PluginToggled {
            url: "https://plugins.example/search".into(),
            enabled: true,
        },
    );
    let (state, _) = update(
        state,
        ChatConfigMsg::PluginToggled {
            url: "https://plugins.example/search".into(),
            enabled: false,
        },
    );
    assert!(state.is_preset_locked());

    let (state, _) = update(
        state,
        ChatConfigMsg::PluginRemoved("https://plugins.example/weather".into()),
    );
    assert!(!state.is_preset_locked());
}

#[test]
fn builtin_plugins_cannot_be_removed() {
    init_logging();
    let state = hydrated(None);
    let (state, effects) = update(
        state,
        ChatConfigMsg::PluginRemoved("https://plugins.example/search".into()),
    );
    assert_eq!(state.plugins().len(), 1);
    assert!(matches!(
        effects.as_slice(),
        [ChatConfigEffect::ShowError(ChatConfigError::BuiltInPlugin(_))]
    ));
}

#[test]
fn sliders_are_disabled_for_builtin_presets() {
    init_logging();
    let state = hydrated(None);
    let (state, effects) = update(
        state,
        ChatConfigMsg::ParameterChanged {
            key: ParameterKey::Temperature,
            value: Some(1.0),
        },
    );
    assert_eq!(state.parameters().temperature, Some(0.75));
    assert_eq!(
        effects,
        vec![ChatConfigEffect::ShowError(
            ChatConfigError::ParametersLocked("k50".into())
        )]
    );
}

#[test]
fn custom_values_are_editable_and_range_checked() {
    init_logging();
    let state = hydrated(None);
    let (state, _) = update(
        state,
        ChatConfigMsg::PresetSelected(CUSTOM_PRESET_NAME.into()),
    );
    let (state, _) = update(
        state,
        ChatConfigMsg::ParameterChanged {
            key: ParameterKey::Temperature,
            value: Some(1.1),
        },
    );
    assert_eq!(state.parameters().temperature, Some(1.1));

    let (state, effects) = update(
        state,
        ChatConfigMsg::ParameterChanged {
            key: ParameterKey::Temperature,
            value: Some(2.5),
        },
    );
    assert_eq!(state.parameters().temperature, Some(1.1));
    assert!(matches!(
        effects.as_slice(),
        [ChatConfigEffect::ShowError(ChatConfigError::Parameter(_))]
    ));

    let (state, _) = update(
        state,
        ChatConfigMsg::ParameterToggled {
            key: ParameterKey::TypicalP,
            enabled: true,
        },
    );
    assert_eq!(state.parameters().typical_p, Some(1.0));
    assert!(state.view().error.is_none());
}

#[test]
fn saving_a_preset_prefixes_and_selects_it() {
    init_logging();
    let state = hydrated(None);
    let (state, _) = update(
        state,
        ChatConfigMsg::PresetSelected(CUSTOM_PRESET_NAME.into()),
    );
    assert!(state.view().can_save_preset);

    let (state, effects) = update(state, ChatConfigMsg::SavePreset("  fast  ".into()));
    assert_eq!(state.selected_preset_name(), "$$fast");
    assert_eq!(state.custom_presets().len(), 1);
    let record = persisted(&effects).unwrap();
    assert_eq!(record.selected_preset_name, "$$fast");
    assert_eq!(record.custom_presets.as_ref().unwrap()[0].name, "$$fast");

    let labels: Vec<_> = state
        .view()
        .preset_options
        .into_iter()
        .map(|option| option.label)
        .collect();
    assert!(labels.contains(&"fast".to_string()));
}

#[test]
fn duplicate_preset_name_leaves_list_unchanged() {
    init_logging();
    let state = hydrated(None);
    let (state, _) = update(state, ChatConfigMsg::PresetSelected(CUSTOM_PRESET_NAME.into()));
    let (state, _) = update(state, ChatConfigMsg::SavePreset("fast".into()));
    let (state, _) = update(state, ChatConfigMsg::PresetSelected(CUSTOM_PRESET_NAME.into()));
    let before = state.custom_presets().to_vec();

    let (state, effects) = update(state, ChatConfigMsg::SavePreset("fast".into()));
    assert_eq!(state.custom_presets(), before.as_slice());
    assert_eq!(
        effects,
        vec![ChatConfigEffect::ShowError(ChatConfigError::PresetExists {
            name: "fast".into()
        })]
    );
    assert_eq!(
        state.last_error(),
        Some(&ChatConfigError::PresetExists {
            name: "fast".into()
        })
    );
}

#[test]
fn empty_preset_name_is_rejected() {
    init_logging();
    let state = hydrated(None);
    let (state, _) = update(state, ChatConfigMsg::PresetSelected(CUSTOM_PRESET_NAME.into()));
    let (state, effects) = update(state, ChatConfigMsg::SavePreset("   ".into()));
    assert!(state.custom_presets().is_empty());
    assert_eq!(
        effects,
        vec![ChatConfigEffect::ShowError(ChatConfigError::EmptyPresetName)]
    );
}

#[test]
fn saving_requires_hand_edited_values() {
    init_logging();
    let state = hydrated(None);
    assert!(!state.view().can_save_preset);

    let (state, effects) = update(state, ChatConfigMsg::SavePreset("copy".into()));
    assert_eq!(state.selected_preset_name(), "k50");
    assert!(state.custom_presets().is_empty());
    assert_eq!(
        effects,
        vec![ChatConfigEffect::ShowError(ChatConfigError::NotCustomPreset(
            "k50".into()
        ))]
    );
}

#[test]
fn saving_while_a_plugin_is_enabled_keeps_the_plugin_preset_locked() {
    init_logging();
    let state = hydrated(None);
    let (state, _) = update(
        state,
        ChatConfigMsg::PluginToggled {
            url: "https://plugins.example/search".into(),
            enabled: true,
        },
    );
    assert!(!state.view().can_save_preset);

    let (state, effects) = update(state, ChatConfigMsg::SavePreset("mine".into()));
    assert_eq!(state.selected_preset_name(), PLUGIN_PRESET_NAME);
    assert!(state.is_preset_locked());
    assert!(state.custom_presets().is_empty());
    assert_eq!(
        effects,
        vec![ChatConfigEffect::ShowError(ChatConfigError::PresetLocked)]
    );

    let (state, effects) = update(
        state,
        ChatConfigMsg::ParameterChanged {
            key: ParameterKey::Temperature,
            value: Some(1.9),
        },
    );
    assert_eq!(state.parameters().temperature, Some(0.35));
    assert_eq!(
        effects,
        vec![ChatConfigEffect::ShowError(ChatConfigError::ParametersLocked(
            PLUGIN_PRESET_NAME.into()
        ))]
    );
}

#[test]
fn changes_before_hydration_are_not_persisted() {
    init_logging();
    let state = ChatConfigState::new(initial_data());
    let (state, effects) = update(state, ChatConfigMsg::PresetSelected("nucleus9".into()));
    assert_eq!(state.selected_preset_name(), "nucleus9");
    assert!(effects.is_empty());
}

#[test]
fn hydration_runs_once() {
    init_logging();
    let state = hydrated(Some(ConfigCache {
        selected_preset_name: "nucleus9".into(),
        model_config_name: "oasst-sft-6".into(),
        ..Default::default()
    }));
    assert_eq!(state.selected_preset_name(), "nucleus9");

    let (state, effects) = update(
        state,
        ChatConfigMsg::Hydrate(Some(ConfigCache {
            selected_preset_name: "k50".into(),
            model_config_name: "oasst-sft-6".into(),
            ..Default::default()
        })),
    );
    assert_eq!(state.selected_preset_name(), "nucleus9");
    assert!(effects.is_empty());
}

#[test]
fn hydration_restores_model_and_explicit_custom_values() {
    init_logging();
    let custom = params(1.3, Some(100.0));
    let state = hydrated(Some(ConfigCache {
        selected_preset_name: CUSTOM_PRESET_NAME.into(),
        model_config_name: "oasst-rlhf-2".into(),
        custom_preset_config: custom,
        ..Default::default()
    }));
    assert_eq!(state.model_config_name(), "oasst-rlhf-2");
    assert_eq!(state.selected_preset_name(), CUSTOM_PRESET_NAME);
    assert_eq!(*state.parameters(), custom);
}

#[test]
fn hydration_restores_named_custom_preset() {
    init_logging();
    let saved = params(0.4, Some(10.0));
    let state = hydrated(Some(ConfigCache {
        selected_preset_name: "$$precise".into(),
        model_config_name: "oasst-sft-6".into(),
        custom_presets: Some(vec![CustomPreset {
            name: "$$precise".into(),
            config: saved,
        }]),
        ..Default::default()
    }));
    assert_eq!(state.selected_preset_name(), "$$precise");
    assert_eq!(*state.parameters(), saved);
}

#[test]
fn hydration_with_selected_plugins_pins_plugin_preset() {
    init_logging();
    let state = hydrated(Some(ConfigCache {
        selected_preset_name: "nucleus9".into(),
        model_config_name: "oasst-sft-6".into(),
        selected_plugins: vec![PluginEntry::new("https://plugins.example/search", true)],
        plugins: Some(vec![
            PluginEntry::new("https://plugins.example/search", true),
            PluginEntry::new("https://plugins.example/custom", false),
        ]),
        ..Default::default()
    }));
    assert_eq!(state.selected_preset_name(), PLUGIN_PRESET_NAME);
    assert_eq!(*state.parameters(), params(0.35, Some(50.0)));
    assert!(state.is_preset_locked());
    assert_eq!(
        state.plugins(),
        &[
            PluginEntry::new("https://plugins.example/search", true),
            PluginEntry::new("https://plugins.example/custom", false),
        ]
    );
}

#[test]
fn hydration_ignores_out_of_range_cached_values() {
    init_logging();
    let state = hydrated(Some(ConfigCache {
        selected_preset_name: CUSTOM_PRESET_NAME.into(),
        model_config_name: "oasst-sft-6".into(),
        custom_preset_config: params(9.0, None),
        ..Default::default()
    }));
    assert_eq!(state.selected_preset_name(), "k50");
    assert_eq!(*state.parameters(), params(0.75, Some(50.0)));
}

#[test]
fn switching_model_keeps_shared_preset_name() {
    init_logging();
    let state = hydrated(None);
    let (state, effects) = update(state, ChatConfigMsg::ModelSelected("oasst-rlhf-2".into()));
    assert_eq!(state.model_config_name(), "oasst-rlhf-2");
    assert_eq!(state.selected_preset_name(), "k50");
    assert_eq!(persisted(&effects).unwrap().model_config_name, "oasst-rlhf-2");

    let (state, effects) = update(state, ChatConfigMsg::ModelSelected("gpt-x".into()));
    assert_eq!(state.model_config_name(), "oasst-rlhf-2");
    assert_eq!(
        effects,
        vec![ChatConfigEffect::ShowError(ChatConfigError::UnknownModel(
            "gpt-x".into()
        ))]
    );
}

#[test]
fn cache_record_uses_browser_field_names() {
    init_logging();
    let state = hydrated(None);
    let json = serde_json::to_value(state.cache_record()).unwrap();
    for field in [
        "selectedPresetName",
        "model_config_name",
        "custom_preset_config",
        "selectedPlugins",
        "plugins",
        "custom_presets",
    ] {
        assert!(json.get(field).is_some(), "missing {field}");
    }
}

#[test]
fn chat_request_settings_carry_enabled_plugins_only() {
    init_logging();
    let state = hydrated(None);
    let (state, _) = update(
        state,
        ChatConfigMsg::PluginAdded(PluginEntry::new("https://plugins.example/off", false)),
    );
    let settings = state.chat_request_settings();
    assert!(settings.plugins.is_empty());
    assert_eq!(settings.model_config_name, "oasst-sft-6");
}

#[test]
fn error_is_cleared_by_dismiss() {
    init_logging();
    let state = hydrated(None);
    let (state, _) = update(state, ChatConfigMsg::SavePreset(String::new()));
    assert!(state.view().error.is_some());
    let (mut state, effects) = update(state, ChatConfigMsg::ErrorDismissed);
    assert!(effects.is_empty());
    assert!(state.view().error.is_none());
    assert!(state.consume_dirty());
}
