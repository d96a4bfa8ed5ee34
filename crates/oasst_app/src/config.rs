//! Layered application settings.
//!
//! Precedence, lowest first: built-in defaults, the RON config file,
//! `OASST_*` environment variables, command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use oasst_core::widget::{DEFAULT_CHUNK_BUDGET, DEFAULT_QUESTION};
use oasst_core::WidgetSettings;
use oasst_engine::{EngineConfig, FetchSettings, DEFAULT_ASK_ENDPOINT, DEFAULT_CACHE_FILE};
use oasst_logging::{LogDestination, DEFAULT_LOG_FILE};
use serde::{Deserialize, Serialize};

/// Config file read when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG_FILE: &str = "oasst.ron";
pub const ENV_PREFIX: &str = "OASST_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ask_endpoint: String,
    pub default_question: String,
    pub chunk_budget: usize,
    pub reveal_delay_ms: u64,
    pub api_base_url: String,
    pub cache_path: PathBuf,
    pub models_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub max_page_bytes: u64,
    pub redirect_limit: usize,
    pub log_level: String,
    pub log_file: PathBuf,
    pub log_to_terminal: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ask_endpoint: DEFAULT_ASK_ENDPOINT.to_string(),
            default_question: DEFAULT_QUESTION.to_string(),
            chunk_budget: DEFAULT_CHUNK_BUDGET,
            reveal_delay_ms: 3000,
            api_base_url: "http://localhost:3000".to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            models_path: None,
            request_timeout_secs: 60,
            max_page_bytes: FetchSettings::default().max_bytes,
            redirect_limit: FetchSettings::default().redirect_limit,
            log_level: "info".to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_to_terminal: false,
        }
    }
}

/// Values given on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub ask_endpoint: Option<String>,
    pub chunk_budget: Option<usize>,
    pub reveal_delay_ms: Option<u64>,
    pub api_base_url: Option<String>,
    pub cache_path: Option<PathBuf>,
    pub models_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub verbose: bool,
}

impl AppConfig {
    /// Builds the effective configuration from every layer.
    pub fn load(config_file: Option<&Path>, overrides: &ConfigOverrides) -> anyhow::Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        ron::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        if let Some(value) = var("ASK_ENDPOINT") {
            self.ask_endpoint = value;
        }
        if let Some(value) = var("DEFAULT_QUESTION") {
            self.default_question = value;
        }
        if let Some(value) = var("CHUNK_BUDGET") {
            self.chunk_budget = parse_env("CHUNK_BUDGET", &value)?;
        }
        if let Some(value) = var("REVEAL_DELAY_MS") {
            self.reveal_delay_ms = parse_env("REVEAL_DELAY_MS", &value)?;
        }
        if let Some(value) = var("API_BASE_URL") {
            self.api_base_url = value;
        }
        if let Some(value) = var("CACHE_PATH") {
            self.cache_path = PathBuf::from(value);
        }
        if let Some(value) = var("MODELS_PATH") {
            self.models_path = Some(PathBuf::from(value));
        }
        if let Some(value) = var("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = var("LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = var("LOG_FILE") {
            self.log_file = PathBuf::from(value);
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(value) = &overrides.ask_endpoint {
            self.ask_endpoint = value.clone();
        }
        if let Some(value) = overrides.chunk_budget {
            self.chunk_budget = value;
        }
        if let Some(value) = overrides.reveal_delay_ms {
            self.reveal_delay_ms = value;
        }
        if let Some(value) = &overrides.api_base_url {
            self.api_base_url = value.clone();
        }
        if let Some(value) = &overrides.cache_path {
            self.cache_path = value.clone();
        }
        if let Some(value) = &overrides.models_path {
            self.models_path = Some(value.clone());
        }
        if let Some(value) = &overrides.log_level {
            self.log_level = value.clone();
        }
        if overrides.verbose {
            self.log_to_terminal = true;
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.chunk_budget == 0 {
            bail!("chunk_budget must be positive");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be positive");
        }
        if oasst_logging::parse_level(&self.log_level).is_none() {
            bail!("unknown log level {:?}", self.log_level);
        }
        Ok(())
    }

    pub fn widget_settings(&self) -> WidgetSettings {
        WidgetSettings {
            chunk_budget: self.chunk_budget,
            default_question: self.default_question.clone(),
        }
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// How long the ask command waits: page load plus the ask request.
    pub fn ask_wait(&self) -> Duration {
        self.request_timeout().saturating_mul(2)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            fetch: FetchSettings {
                max_bytes: self.max_page_bytes,
                redirect_limit: self.redirect_limit,
                ..FetchSettings::default()
            },
            ask_endpoint: self.ask_endpoint.clone(),
            api_base_url: self.api_base_url.clone(),
            request_timeout: self.request_timeout(),
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        if self.log_to_terminal {
            LogDestination::Both(self.log_file.clone())
        } else {
            LogDestination::File(self.log_file.clone())
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("{ENV_PREFIX}{name} has invalid value {value:?}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_the_widget_constants() {
        let config = AppConfig::default();
        assert_eq!(config.ask_endpoint, "https://MYENDPOINT.COM/ask");
        assert_eq!(config.chunk_budget, 5000);
        assert_eq!(config.reveal_delay(), Duration::from_secs(3));
        assert_eq!(config.default_question, "Key takeaways of this page?");
    }

    #[test]
    fn file_values_fill_over_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("oasst.ron");
        fs::write(
            &path,
            r#"(ask_endpoint: "https://summarize.example/ask", chunk_budget: 1200)"#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.ask_endpoint, "https://summarize.example/ask");
        assert_eq!(config.chunk_budget, 1200);
        assert_eq!(config.reveal_delay_ms, 3000);
    }

    #[test]
    fn env_beats_file_and_flags_beat_env() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("oasst.ron");
        fs::write(&path, r#"(chunk_budget: 1200, api_base_url: "http://file")"#).unwrap();

        let mut config = AppConfig::from_file(&path).unwrap();
        config
            .apply_env(env(&[
                ("OASST_CHUNK_BUDGET", "800"),
                ("OASST_API_BASE_URL", "http://env"),
            ]))
            .unwrap();
        assert_eq!(config.chunk_budget, 800);

        config.apply_overrides(&ConfigOverrides {
            api_base_url: Some("http://flag".into()),
            verbose: true,
            ..ConfigOverrides::default()
        });
        assert_eq!(config.chunk_budget, 800);
        assert_eq!(config.api_base_url, "http://flag");
        assert_eq!(
            config.log_destination(),
            LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE))
        );
    }

    #[test]
    fn bad_env_numbers_are_reported() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(env(&[("OASST_CHUNK_BUDGET", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("OASST_CHUNK_BUDGET"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = AppConfig::load(
            Some(Path::new("/no/such/oasst.ron")),
            &ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn zero_chunk_budget_is_rejected() {
        let config = AppConfig {
            chunk_budget: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_request_timeout_is_rejected() {
        let config = AppConfig {
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn huge_request_timeout_saturates() {
        let config = AppConfig {
            request_timeout_secs: u64::MAX,
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.ask_wait(), Duration::MAX);
    }
}
