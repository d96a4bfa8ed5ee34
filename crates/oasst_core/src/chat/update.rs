use super::{ChatConfigEffect, ChatConfigMsg, ChatConfigState};

/// Pure update function: applies a message to the form and returns any effects.
///
/// Rejected messages leave the form untouched apart from the recorded error.
/// Accepted ones are persisted, but only once the form has been hydrated so
/// the cached record is never overwritten by defaults.
pub fn update(
    mut state: ChatConfigState,
    msg: ChatConfigMsg,
) -> (ChatConfigState, Vec<ChatConfigEffect>) {
    let result = match msg {
        ChatConfigMsg::Hydrate(cache) => {
            if !state.hydrate(cache) {
                return (state, Vec::new());
            }
            Ok(())
        }
        ChatConfigMsg::ModelSelected(name) => state.select_model(&name),
        ChatConfigMsg::PresetSelected(name) => state.select_preset(&name),
        ChatConfigMsg::ParameterChanged { key, value } => state.set_parameter(key, value),
        ChatConfigMsg::ParameterToggled { key, enabled } => state.toggle_parameter(key, enabled),
        ChatConfigMsg::PluginToggled { url, enabled } => state.toggle_plugin(&url, enabled),
        ChatConfigMsg::PluginAdded(plugin) => state.add_plugin(plugin),
        ChatConfigMsg::PluginRemoved(url) => state.remove_plugin(&url),
        ChatConfigMsg::SavePreset(name) => state.save_preset(&name),
        ChatConfigMsg::ErrorDismissed => {
            state.set_error(None);
            return (state, Vec::new());
        }
        ChatConfigMsg::NoOp => return (state, Vec::new()),
    };

    let effects = match result {
        Ok(()) => {
            state.set_error(None);
            if state.is_hydrated() {
                vec![ChatConfigEffect::PersistCache(state.cache_record())]
            } else {
                Vec::new()
            }
        }
        Err(err) => {
            state.set_error(Some(err.clone()));
            vec![ChatConfigEffect::ShowError(err)]
        }
    };

    (state, effects)
}
