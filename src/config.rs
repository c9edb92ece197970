//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
use crate::i18n::FileLocaleStore;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub state: StateConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub debug_mode: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            debug_mode: false,
        }
    }
}

/// Where client-side state (the chosen locale) lives
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateConfig {
    pub file: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// A config file that exists but cannot be read or parsed is an error,
    /// never silently replaced by defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("kinyu").join("config.toml")),
            Some(PathBuf::from("/etc/kinyu/config.toml")),
            Some(PathBuf::from("./kinyu.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        match Self::load_first(&config_paths)? {
            Some(config) => Ok(config),
            None => Ok(Self::from_env()),
        }
    }

    /// Load the first of `paths` that exists, with environment overrides
    pub fn load_first(paths: &[PathBuf]) -> Result<Option<Self>, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::debug!("Loaded config from {:?}", path);
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup. Unparseable numbers and flags are ignored.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("KINYU_API_URL").filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(timeout) = var("KINYU_API_TIMEOUT_MS") {
            match timeout.parse() {
                Ok(ms) => self.api.timeout_ms = ms,
                Err(_) => tracing::warn!("Ignoring invalid KINYU_API_TIMEOUT_MS: {}", timeout),
            }
        }
        if let Some(debug) = var("KINYU_DEBUG_MODE") {
            self.api.debug_mode = parse_flag(&debug);
        }

        if let Some(file) = var("KINYU_STATE_FILE") {
            self.state.file = Some(PathBuf::from(file));
        }

        if let Some(level) = var("KINYU_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("KINYU_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Client configuration derived from the `[api]` section
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::default()
            .base_url(self.api.base_url.clone())
            .timeout_ms(self.api.timeout_ms)
            .debug(self.api.debug_mode)
    }

    /// Locale store at the configured state file, or the per-user default
    pub fn locale_store(&self) -> FileLocaleStore {
        match &self.state.file {
            Some(path) => FileLocaleStore::new(path.clone()),
            None => FileLocaleStore::new(FileLocaleStore::default_path()),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    format!(
        r#"# Kinyu Client Configuration
#
# Environment variables override these settings:
# - KINYU_API_URL
# - KINYU_API_TIMEOUT_MS
# - KINYU_DEBUG_MODE
# - KINYU_STATE_FILE
# - KINYU_LOG_LEVEL
# - KINYU_LOG_FORMAT

[api]
# Backend base URL (no trailing slash)
base_url = "{base_url}"

# Per-request timeout (ms)
timeout_ms = {timeout_ms}

# Log every request URL and response status
debug_mode = false

[state]
# File holding the chosen display language
# file = "~/.config/kinyu/client-state.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#,
        base_url = DEFAULT_BASE_URL,
        timeout_ms = DEFAULT_TIMEOUT_MS,
    )
}
