//! Configuration file loading with precedence handling.

use crate::shell::ShellConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "NAVSHELL_CONFIG";

/// Environment override for the settle timeout, in milliseconds.
pub const SETTLE_TIMEOUT_ENV_VAR: &str = "NAVSHELL_SETTLE_TIMEOUT_MS";

/// Environment override for the scroll-save throttle, in milliseconds.
pub const SCROLL_THROTTLE_ENV_VAR: &str = "NAVSHELL_SCROLL_THROTTLE_MS";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/navshell/config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Maximum number of routes with a remembered scroll offset.
    #[serde(default)]
    pub scroll_store_capacity: Option<usize>,

    /// Upper bound on a transition without a settle signal.
    #[serde(default)]
    pub settle_timeout_ms: Option<u64>,

    /// Minimum interval between scroll-offset saves.
    #[serde(default)]
    pub scroll_throttle_ms: Option<u64>,

    /// Minimum time a shown skeleton stays visible.
    #[serde(default)]
    pub skeleton_min_display_ms: Option<u64>,

    /// Delay before the live region clears its message.
    #[serde(default)]
    pub announcement_clear_ms: Option<u64>,

    /// Retries after a skeleton render failure before pinning the fallback.
    #[serde(default)]
    pub max_render_retries: Option<u32>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub scroll_store_capacity: usize,
    pub settle_timeout_ms: u64,
    pub scroll_throttle_ms: u64,
    pub skeleton_min_display_ms: u64,
    pub announcement_clear_ms: u64,
    pub max_render_retries: u32,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let shell = ShellConfig::default();
        Self {
            scroll_store_capacity: shell.scroll_store_capacity,
            settle_timeout_ms: millis(shell.settle_timeout),
            scroll_throttle_ms: millis(shell.scroll_throttle),
            skeleton_min_display_ms: millis(shell.skeleton_min_display),
            announcement_clear_ms: millis(shell.announcement_clear),
            max_render_retries: shell.max_render_retries,
            log_file_path: default_log_path(),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl From<&ResolvedConfig> for ShellConfig {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            scroll_store_capacity: config.scroll_store_capacity,
            settle_timeout: Duration::from_millis(config.settle_timeout_ms),
            scroll_throttle: Duration::from_millis(config.scroll_throttle_ms),
            skeleton_min_display: Duration::from_millis(config.skeleton_min_display_ms),
            announcement_clear: Duration::from_millis(config.announcement_clear_ms),
            max_render_retries: config.max_render_retries,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/navshell/navshell.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("navshell").join("navshell.log")
    } else {
        PathBuf::from("navshell.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/navshell/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("navshell").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `NAVSHELL_CONFIG` environment variable
/// 3. Default path `~/.config/navshell/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `NAVSHELL_SETTLE_TIMEOUT_MS` and `NAVSHELL_SCROLL_THROTTLE_MS`.
/// Values that do not parse as milliseconds are ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(ms) = env_millis(SETTLE_TIMEOUT_ENV_VAR) {
        config.settle_timeout_ms = ms;
    }
    if let Some(ms) = env_millis(SCROLL_THROTTLE_ENV_VAR) {
        config.scroll_throttle_ms = ms;
    }
    config
}

fn env_millis(name: &str) -> Option<u64> {
    std::env::var(name).ok()?.trim().parse().ok()
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        scroll_store_capacity: config
            .scroll_store_capacity
            .unwrap_or(defaults.scroll_store_capacity),
        settle_timeout_ms: config.settle_timeout_ms.unwrap_or(defaults.settle_timeout_ms),
        scroll_throttle_ms: config.scroll_throttle_ms.unwrap_or(defaults.scroll_throttle_ms),
        skeleton_min_display_ms: config
            .skeleton_min_display_ms
            .unwrap_or(defaults.skeleton_min_display_ms),
        announcement_clear_ms: config
            .announcement_clear_ms
            .unwrap_or(defaults.announcement_clear_ms),
        max_render_retries: config
            .max_render_retries
            .unwrap_or(defaults.max_render_retries),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only flags the user actually passed are applied.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    settle_timeout_ms: Option<u64>,
    scroll_throttle_ms: Option<u64>,
    scroll_store_capacity: Option<usize>,
) -> ResolvedConfig {
    if let Some(ms) = settle_timeout_ms {
        config.settle_timeout_ms = ms;
    }
    if let Some(ms) = scroll_throttle_ms {
        config.scroll_throttle_ms = ms;
    }
    if let Some(capacity) = scroll_store_capacity {
        config.scroll_store_capacity = capacity;
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
