//! Configuration loading
//!
//! Every setting is resolved with the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error. A config file that exists but
//! does not parse is.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::Deserialize;
use tracing::{debug, info};

use crate::cache::DEFAULT_TTL_SECS;
use crate::{Error, Result};

pub const ENV_DATA_CSV: &str = "PRESENCE_DATA_CSV";
pub const ENV_USERS_XML: &str = "PRESENCE_USERS_XML";
pub const ENV_CACHE_TTL: &str = "PRESENCE_CACHE_TTL";
pub const ENV_BIND: &str = "PRESENCE_BIND";
pub const ENV_LOG_LEVEL: &str = "PRESENCE_LOG_LEVEL";

const CONFIG_DIR_NAME: &str = "presence-analyzer";

/// Built-in defaults used when nothing else provides a value
pub struct CompiledDefaults;

impl CompiledDefaults {
    pub const DATA_CSV: &'static str = "runtime/data/sitan.csv";
    pub const USERS_XML: &'static str = "runtime/data/users.xml";
    pub const CACHE_TTL_SECS: i64 = DEFAULT_TTL_SECS;
    pub const BIND: &'static str = "127.0.0.1:5000";
    pub const LOG_LEVEL: &'static str = "info";
}

/// Contents of the TOML config file; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub data_csv: Option<PathBuf>,

    #[serde(default)]
    pub users_xml: Option<PathBuf>,

    /// Cache entry lifetime in seconds
    #[serde(default)]
    pub cache_ttl_secs: Option<i64>,

    #[serde(default)]
    pub bind: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default)]
    pub level: Option<String>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub data_csv: Option<PathBuf>,
    pub users_xml: Option<PathBuf>,
    pub cache_ttl_secs: Option<i64>,
    pub bind: Option<String>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_csv: PathBuf,
    pub users_xml: PathBuf,
    pub cache_ttl: Duration,
    pub bind: String,
    pub log_level: String,
}

impl AppConfig {
    /// Resolve every setting from overrides, environment, TOML and defaults
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let file_config = match &overrides.config_file {
            Some(path) => load_toml(path)?,
            None => match default_config_file() {
                Some(path) => load_toml(&path)?,
                None => {
                    debug!("No config file found, using defaults");
                    TomlConfig::default()
                }
            },
        };

        let cache_ttl_secs = match overrides.cache_ttl_secs {
            Some(secs) => secs,
            None => match env_var(ENV_CACHE_TTL) {
                Some(value) => value.parse::<i64>().map_err(|e| {
                    Error::Config(format!("{} must be a number of seconds: {}", ENV_CACHE_TTL, e))
                })?,
                None => file_config.cache_ttl_secs.unwrap_or(CompiledDefaults::CACHE_TTL_SECS),
            },
        };

        if cache_ttl_secs < 0 {
            return Err(Error::Config(format!(
                "cache TTL must not be negative: {}",
                cache_ttl_secs
            )));
        }
        let cache_ttl = Duration::try_seconds(cache_ttl_secs).ok_or_else(|| {
            Error::Config(format!("cache TTL out of range: {}", cache_ttl_secs))
        })?;

        let config = Self {
            data_csv: overrides
                .data_csv
                .clone()
                .or_else(|| env_var(ENV_DATA_CSV).map(PathBuf::from))
                .or(file_config.data_csv)
                .unwrap_or_else(|| PathBuf::from(CompiledDefaults::DATA_CSV)),
            users_xml: overrides
                .users_xml
                .clone()
                .or_else(|| env_var(ENV_USERS_XML).map(PathBuf::from))
                .or(file_config.users_xml)
                .unwrap_or_else(|| PathBuf::from(CompiledDefaults::USERS_XML)),
            cache_ttl,
            bind: overrides
                .bind
                .clone()
                .or_else(|| env_var(ENV_BIND))
                .or(file_config.bind)
                .unwrap_or_else(|| CompiledDefaults::BIND.to_string()),
            log_level: overrides
                .log_level
                .clone()
                .or_else(|| env_var(ENV_LOG_LEVEL))
                .or(file_config.logging.level)
                .unwrap_or_else(|| CompiledDefaults::LOG_LEVEL.to_string()),
        };

        Ok(config)
    }
}

/// Load and parse a TOML config file
pub fn load_toml(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
    let config = toml::from_str::<TomlConfig>(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))?;

    info!("Loaded config file {}", path.display());
    Ok(config)
}

/// First existing config file among the platform locations
fn default_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join("config.toml"));

    let system_config = if cfg!(target_os = "linux") {
        Some(PathBuf::from("/etc").join(CONFIG_DIR_NAME).join("config.toml"))
    } else {
        None
    };

    user_config
        .into_iter()
        .chain(system_config)
        .find(|path| path.exists())
}

/// Environment variable, treating empty values as unset
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
