use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use crate::services::NotifierKind;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub backend: BackendSettings,
    #[serde(default)]
    pub interaction: InteractionSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionSettings {
    /// Length of the exit animation; the decision request waits this long
    #[serde(default = "default_transition_delay_ms")]
    pub transition_delay_ms: u64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            transition_delay_ms: default_transition_delay_ms(),
        }
    }
}

impl InteractionSettings {
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_notifier")]
    pub sink: NotifierKind,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            sink: default_notifier(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_base_url() -> String { "http://127.0.0.1:5000".to_string() }
fn default_request_timeout_secs() -> u64 { 10 }
fn default_transition_delay_ms() -> u64 { 500 }
fn default_notifier() -> NotifierKind { NotifierKind::Console }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Built-in defaults
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PETSWIPE)
    /// 5. PETSWIPE_BACKEND_URL
    pub fn load() -> Result<Self, ConfigError> {
        let builder = defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PETSWIPE__BACKEND__BASE_URL -> backend.base_url
            .add_source(environment());

        with_backend_override(builder)?.build()?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let builder = defaults()?
            .add_source(File::from(path.as_ref()))
            .add_source(environment());

        with_backend_override(builder)?.build()?.try_deserialize()
    }

    /// Render the effective settings as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("backend.base_url", default_base_url())?
        .set_default("backend.request_timeout_secs", default_request_timeout_secs())?
        .set_default("interaction.transition_delay_ms", default_transition_delay_ms())
}

fn environment() -> Environment {
    Environment::with_prefix("PETSWIPE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// PETSWIPE_BACKEND_URL wins over every other source
fn with_backend_override(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match std::env::var("PETSWIPE_BACKEND_URL") {
        Ok(url) if !url.trim().is_empty() => builder.set_override("backend.base_url", url),
        _ => Ok(builder),
    }
}
