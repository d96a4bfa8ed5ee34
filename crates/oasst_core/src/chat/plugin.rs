use serde::{Deserialize, Serialize};

/// A tool attachable to a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginEntry {
    pub url: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted: Option<bool>,
}

impl PluginEntry {
    pub fn new(url: impl Into<String>, enabled: bool) -> Self {
        Self {
            url: url.into(),
            enabled,
            trusted: None,
        }
    }
}

pub fn any_enabled(plugins: &[PluginEntry]) -> bool {
    plugins.iter().any(|plugin| plugin.enabled)
}

/// Built-ins first, then cached plugins that are not built-in.
///
/// Cached duplicates collapse onto the position of their first occurrence and
/// keep the value of their last one.
pub fn merge_cached_plugins(built_in: &[PluginEntry], cached: &[PluginEntry]) -> Vec<PluginEntry> {
    let mut merged = built_in.to_vec();
    let custom_start = merged.len();
    for plugin in cached {
        if built_in.iter().any(|p| p.url == plugin.url) {
            continue;
        }
        match merged[custom_start..]
            .iter_mut()
            .find(|existing| existing.url == plugin.url)
        {
            Some(existing) => *existing = plugin.clone(),
            None => merged.push(plugin.clone()),
        }
    }
    merged
}
