//! Logger configuration
//!
//! Configuration is resolved once, up front, into a [`LoggerConfig`] and then
//! handed to constructors explicitly. Values come from any [`ConfigSource`]
//! using dotted keys, or from a deserialized application config document
//! with the same key names.

use super::error::{LoggerError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_FILE_PATH: &str = "./logger/app.logger";
pub const DEFAULT_MAX_SIZE_MB: u64 = 10;
pub const DEFAULT_MAX_BACKUPS: usize = 10;
pub const DEFAULT_MAX_AGE_DAYS: u64 = 20;

/// Dotted configuration keys
pub mod keys {
    pub const PATH_FILE: &str = "logger.path_file";
    pub const MAX_SIZE: &str = "logger.max_size";
    pub const MAX_BACKUPS: &str = "logger.max_back_up";
    pub const MAX_AGE: &str = "logger.max_age";
    pub const ENV: &str = "env";
    pub const LOG_TYPE: &str = "log_type";
}

/// Encoder preset selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Human readable, verbose
    #[default]
    Development,
    /// Compact, machine parseable
    Production,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" => Ok(Mode::Development),
            "production" => Ok(Mode::Production),
            _ => Err(LoggerError::UnsupportedMode(s.to_string())),
        }
    }
}

/// Output destination selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkType {
    /// Rotating log file
    File,
    /// Standard output
    #[default]
    Default,
}

impl SinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkType::File => "file",
            SinkType::Default => "default",
        }
    }
}

impl fmt::Display for SinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SinkType {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(SinkType::File),
            "default" => Ok(SinkType::Default),
            _ => Err(LoggerError::UnsupportedSinkType(s.to_string())),
        }
    }
}

/// Parameters of the rotating file target
///
/// # Examples
///
/// ```
/// use context_logger::RotationConfig;
///
/// let rotation = RotationConfig::new("/var/log/orders.logger")
///     .with_max_size_mb(50)
///     .with_max_backups(7);
/// assert!(rotation.compress);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    #[serde(rename = "path_file")]
    pub filename: PathBuf,
    /// Maximum size of the active file in megabytes
    #[serde(rename = "max_size")]
    pub max_size_mb: u64,
    /// Rotated files kept; zero means the default
    #[serde(rename = "max_back_up")]
    pub max_backups: usize,
    /// Days a rotated file is kept; zero means the default
    #[serde(rename = "max_age")]
    pub max_age_days: u64,
    pub compress: bool,
    /// Name backups using local time instead of UTC
    pub local_time: bool,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            filename: PathBuf::from(DEFAULT_FILE_PATH),
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            max_backups: DEFAULT_MAX_BACKUPS,
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            compress: true,
            local_time: true,
        }
    }
}

impl RotationConfig {
    #[must_use]
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size_mb(mut self, max_size_mb: u64) -> Self {
        self.max_size_mb = max_size_mb;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, max_backups: usize) -> Self {
        self.max_backups = max_backups;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age_days(mut self, max_age_days: u64) -> Self {
        self.max_age_days = max_age_days;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_local_time(mut self, enabled: bool) -> Self {
        self.local_time = enabled;
        self
    }

    /// Replace zero or empty values with the built-in defaults
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.filename.as_os_str().is_empty() {
            self.filename = PathBuf::from(DEFAULT_FILE_PATH);
        }
        if self.max_size_mb == 0 {
            self.max_size_mb = DEFAULT_MAX_SIZE_MB;
        }
        if self.max_backups == 0 {
            self.max_backups = DEFAULT_MAX_BACKUPS;
        }
        if self.max_age_days == 0 {
            self.max_age_days = DEFAULT_MAX_AGE_DAYS;
        }
        self
    }

    #[inline]
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(1024 * 1024)
    }
}

/// Fully resolved settings for building a logger
///
/// # Examples
///
/// ```
/// use context_logger::{LoggerConfig, Mode, SinkType};
/// use std::collections::HashMap;
///
/// let mut values = HashMap::new();
/// values.insert("env".to_string(), "production".to_string());
/// values.insert("log_type".to_string(), "file".to_string());
///
/// let config = LoggerConfig::resolve(&values);
/// assert_eq!(config.mode, Mode::Production);
/// assert_eq!(config.sink_type, SinkType::File);
/// assert_eq!(config.rotation.max_size_mb, 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    #[serde(rename = "env", deserialize_with = "lenient")]
    pub mode: Mode,
    #[serde(rename = "log_type", deserialize_with = "lenient")]
    pub sink_type: SinkType,
    #[serde(rename = "logger")]
    pub rotation: RotationConfig,
}

impl LoggerConfig {
    #[must_use]
    pub fn new(mode: Mode, sink_type: SinkType) -> Self {
        Self {
            mode,
            sink_type,
            rotation: RotationConfig::default(),
        }
    }

    /// Resolve settings from a configuration source.
    ///
    /// An unrecognized `env` selects development mode and an unrecognized
    /// `log_type` selects standard output. Missing, empty, non-positive or
    /// unparseable rotation values fall back to the defaults.
    pub fn resolve<S: ConfigSource + ?Sized>(source: &S) -> Self {
        let mode = source
            .get_string(keys::ENV)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        let sink_type = source
            .get_string(keys::LOG_TYPE)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();

        let defaults = RotationConfig::default();
        let rotation = RotationConfig {
            filename: source
                .get_string(keys::PATH_FILE)
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.filename),
            max_size_mb: positive(source.get_int(keys::MAX_SIZE)).unwrap_or(defaults.max_size_mb),
            max_backups: positive(source.get_int(keys::MAX_BACKUPS))
                .map(|n| n as usize)
                .unwrap_or(defaults.max_backups),
            max_age_days: positive(source.get_int(keys::MAX_AGE))
                .unwrap_or(defaults.max_age_days),
            compress: true,
            local_time: true,
        };

        Self {
            mode,
            sink_type,
            rotation,
        }
    }

    /// Parse a JSON config document.
    ///
    /// Unrecognized `env` and `log_type` values and zero rotation limits fall
    /// back to the defaults, as in [`LoggerConfig::resolve`].
    ///
    /// # Errors
    ///
    /// Returns error if the document is not valid JSON or a field has the wrong shape
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: LoggerConfig = serde_json::from_str(json)?;
        config.rotation = config.rotation.normalized();
        Ok(config)
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_sink_type(mut self, sink_type: SinkType) -> Self {
        self.sink_type = sink_type;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: RotationConfig) -> Self {
        self.rotation = rotation;
        self
    }
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|name| name.parse().ok())
        .unwrap_or_default())
}

fn positive(value: Option<i64>) -> Option<u64> {
    value.filter(|v| *v > 0).map(|v| v as u64)
}

/// Lookup of configuration values by dotted key
pub trait ConfigSource {
    fn get_string(&self, key: &str) -> Option<String>;

    fn get_int(&self, key: &str) -> Option<i64> {
        self.get_string(key)
            .and_then(|value| value.trim().parse().ok())
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Navigates nested objects, so `logger.max_size` reads `{"logger": {"max_size": 5}}`
impl ConfigSource for serde_json::Value {
    fn get_string(&self, key: &str) -> Option<String> {
        match lookup(self, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        match lookup(self, key)? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

fn lookup<'a>(value: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    key.split('.').try_fold(value, |node, part| node.get(part))
}

/// Reads dotted keys from environment variables.
///
/// `logger.max_size` maps to `LOGGER_MAX_SIZE`, or `APP_LOGGER_MAX_SIZE`
/// with the prefix `APP`.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    prefix: Option<String>,
}

impl EnvSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    pub fn variable_name(&self, key: &str) -> String {
        let name = key.replace('.', "_").to_uppercase();
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix.trim_end_matches('_').to_uppercase(), name),
            None => name,
        }
    }
}

impl ConfigSource for EnvSource {
    fn get_string(&self, key: &str) -> Option<String> {
        std::env::var(self.variable_name(key)).ok()
    }
}
