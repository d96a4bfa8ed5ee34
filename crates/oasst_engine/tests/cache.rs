use std::fs;

use oasst_core::{ConfigCache, PluginEntry, SamplingParameters};
use oasst_engine::{ensure_dir, AtomicFileWriter, CacheError, ConfigCacheStore};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn sample_cache() -> ConfigCache {
    ConfigCache {
        selected_preset_name: "$$fast".to_string(),
        model_config_name: "OA_SFT_Llama_30B".to_string(),
        custom_preset_config: SamplingParameters {
            temperature: Some(0.4),
            ..Default::default()
        },
        selected_plugins: vec![PluginEntry::new("https://plugin.example/ai-plugin.json", true)],
        plugins: None,
        custom_presets: None,
    }
}

#[test]
fn missing_file_is_an_empty_cache() {
    let temp = TempDir::new().unwrap();
    let store = ConfigCacheStore::new(temp.path().join("cache.json"));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn saved_record_loads_back_and_last_write_wins() {
    let temp = TempDir::new().unwrap();
    let store = ConfigCacheStore::new(temp.path().join("nested/cache.json"));

    let mut cache = sample_cache();
    store.save(&cache).unwrap();
    cache.selected_preset_name = "k50".to_string();
    store.save(&cache).unwrap();

    assert_eq!(store.load().unwrap(), Some(cache));
}

#[test]
fn record_uses_browser_field_names() {
    let temp = TempDir::new().unwrap();
    let store = ConfigCacheStore::new(temp.path().join("cache.json"));
    store.save(&sample_cache()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw["selectedPresetName"], "$$fast");
    assert_eq!(raw["model_config_name"], "OA_SFT_Llama_30B");
    assert_eq!(raw["selectedPlugins"][0]["enabled"], true);
}

#[test]
fn corrupt_record_is_a_parse_error_and_loads_as_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("cache.json");
    fs::write(&path, "{not json").unwrap();
    let store = ConfigCacheStore::new(&path);

    assert!(matches!(store.load(), Err(CacheError::Parse { .. })));
    assert_eq!(store.load_or_empty(), None);
}

#[test]
fn ensure_dir_creates_missing_directories() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("a/b");
    ensure_dir(&dir).unwrap();
    assert!(dir.is_dir());
}

#[test]
fn writer_refuses_a_file_as_parent_and_leaves_nothing_behind() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "x").unwrap();

    let writer = AtomicFileWriter::new(blocker.join("cache.json"));
    assert!(writer.write("{}").is_err());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
