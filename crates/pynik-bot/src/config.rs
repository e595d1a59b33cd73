//! Bot configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/pynik/config.toml` by default. Every field has a default, so
//! a missing or empty file is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pynik_plugins::{
    CacheSettings, DEFAULT_PREFIX, HttpSettings, RawSettings, ScheduleSettings,
    TemperatureSettings,
};

use crate::error::{BotError, BotResult};

/// Configuration for the bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Command prefix.
    pub prefix: String,

    /// The bot's nick.
    pub nick: String,

    /// Debug mode.
    pub debug: bool,

    /// Storage settings.
    pub storage: StorageSettings,

    /// HTTP client settings.
    pub http: HttpSettings,

    /// Schedule command settings.
    pub schedule: ScheduleSettings,

    /// Temperature command settings.
    pub temperature: TemperatureSettings,

    /// Raw passthrough settings.
    pub raw: RawSettings,

    /// Fetch cache settings.
    pub cache: CacheSettings,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            nick: "pynik".to_string(),
            debug: false,
            storage: StorageSettings::default(),
            http: HttpSettings::default(),
            schedule: ScheduleSettings::default(),
            temperature: TemperatureSettings::default(),
            raw: RawSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

/// Where plugin data is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory for the JSON data files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl StorageSettings {
    /// Returns the configured data directory, or the default one.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(BotConfig::default_data_dir)
    }
}

impl BotConfig {
    /// Loads configuration from the default path.
    pub fn load() -> BotResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> BotResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BotError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> BotResult<Self> {
        toml::from_str(content).map_err(|e| BotError::Config(format!("failed to parse config: {}", e)))
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> BotResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| BotError::Config(format!("failed to serialize config: {}", e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pynik")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pynik")
    }
}
