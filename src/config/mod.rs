//! Configuration module.
//!
//! TOML file, environment and CLI layers resolved into a [`ResolvedConfig`],
//! which converts into the shell's [`ShellConfig`](crate::shell::ShellConfig).

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, ConfigError, ConfigFile,
    ResolvedConfig, CONFIG_ENV_VAR, SCROLL_THROTTLE_ENV_VAR, SETTLE_TIMEOUT_ENV_VAR,
};
