//! Configuration module for screenlog.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::SinkLevel;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for screenlog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub reports: ReportsConfig,
}

/// Logging / sink settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Lowest level passed to sinks: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Directory holding log files and exception reports.
    pub directory: PathBuf,
    /// Channel name; also the stem of the log file.
    pub channel: String,
    /// Number of daily log files to keep (0 keeps all).
    pub max_files: u32,
}

impl LoggingConfig {
    /// Sink level below which records are dropped.
    ///
    /// `trace` has no sink counterpart and admits everything, like `debug`.
    /// Unknown values (rejected by [`Config::validate`]) admit everything.
    pub fn min_sink_level(&self) -> SinkLevel {
        match self.level.as_str() {
            "info" => SinkLevel::Info,
            "warn" => SinkLevel::Warning,
            "error" => SinkLevel::Error,
            _ => SinkLevel::Debug,
        }
    }
}

/// Exception report settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Write HTML reports for error events.
    pub enabled: bool,
    /// Size in bytes of each chunk written while capturing a rendering.
    pub chunk_size: usize,
    /// Maximum number of cause-chain links followed when formatting messages.
    pub max_chain_depth: usize,
    /// Remember identifier → filename lookups in memory.
    pub index: bool,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/screenlog/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("screenlog")
            .join("config.yaml")
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for LoggingConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("screenlog");
        Self {
            level: "info".to_string(),
            directory: data_dir.join("log"),
            channel: "app".to_string(),
            max_files: 14,
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chunk_size: 4096,
            max_chain_depth: 64,
            index: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"reports.chunk_size"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for `reports.max_chain_depth`.
const MAX_CHAIN_DEPTH_LIMIT: usize = 1024;

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }
        if self.logging.channel.trim().is_empty() {
            errors.push(ValidationError {
                field: "logging.channel".into(),
                message: "must not be empty".into(),
            });
        } else if self
            .logging
            .channel
            .contains(|c: char| c == '/' || c == '\\')
        {
            errors.push(ValidationError {
                field: "logging.channel".into(),
                message: "must not contain path separators".into(),
            });
        }

        // Only check existence when the path is absolute and not `~`-prefixed.
        let dir_str = self.logging.directory.to_string_lossy();
        if !dir_str.starts_with('~')
            && self.logging.directory.is_absolute()
            && self.logging.directory.exists()
            && !self.logging.directory.is_dir()
        {
            errors.push(ValidationError {
                field: "logging.directory".into(),
                message: format!("not a directory: {}", self.logging.directory.display()),
            });
        }

        // --- reports ---
        if self.reports.chunk_size == 0 {
            errors.push(ValidationError {
                field: "reports.chunk_size".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.reports.max_chain_depth == 0 || self.reports.max_chain_depth > MAX_CHAIN_DEPTH_LIMIT
        {
            errors.push(ValidationError {
                field: "reports.max_chain_depth".into(),
                message: format!("must be in range 1..={MAX_CHAIN_DEPTH_LIMIT}"),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use screenlog_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .logging_directory(PathBuf::from("/var/log/myapp"))
///     .logging_channel("web")
///     .reports_chunk_size(8192)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn logging_directory(mut self, directory: PathBuf) -> Self {
        self.config.logging.directory = directory;
        self
    }

    pub fn logging_channel(mut self, channel: impl Into<String>) -> Self {
        self.config.logging.channel = channel.into();
        self
    }

    pub fn logging_max_files(mut self, n: u32) -> Self {
        self.config.logging.max_files = n;
        self
    }

    // --- reports ---

    pub fn reports_enabled(mut self, enabled: bool) -> Self {
        self.config.reports.enabled = enabled;
        self
    }

    pub fn reports_chunk_size(mut self, bytes: usize) -> Self {
        self.config.reports.chunk_size = bytes;
        self
    }

    pub fn reports_max_chain_depth(mut self, depth: usize) -> Self {
        self.config.reports.max_chain_depth = depth;
        self
    }

    pub fn reports_index(mut self, index: bool) -> Self {
        self.config.reports.index = index;
        self
    }

    /// Consume the builder and return the final [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
