//! navshell - navigation script runner entry point

use clap::Parser;
use navshell::runner::ScriptRunner;
use navshell::shell::ShellConfig;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Replay a JSONL navigation script through the app shell and print what the
/// user would see: frames, scroll restorations and announcements.
#[derive(Parser, Debug)]
#[command(name = "navshell")]
#[command(version)]
#[command(about = "Replay navigation scripts through the navigation resilience layer")]
pub struct Args {
    /// Path to JSONL script (reads from stdin if not provided)
    pub script: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Upper bound on a transition without a settle signal, in milliseconds
    #[arg(long)]
    pub settle_timeout_ms: Option<u64>,

    /// Minimum interval between scroll-offset saves, in milliseconds
    #[arg(long)]
    pub scroll_throttle_ms: Option<u64>,

    /// Number of routes whose scroll offset is remembered (0 = default)
    #[arg(long)]
    pub capacity: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = navshell::config::load_config_with_precedence(args.config.clone())?;
        let merged = navshell::config::merge_config(config_file);
        let with_env = navshell::config::apply_env_overrides(merged);
        navshell::config::apply_cli_overrides(
            with_env,
            args.settle_timeout_ms,
            args.scroll_throttle_ms,
            args.capacity,
        )
    };

    navshell::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let mut input = navshell::source::detect_input_source(args.script.clone())?;
    let lines = input.lines()?;
    let (events, errors) = navshell::source::parse_script(&lines);
    for error in &errors {
        warn!(%error, "Skipping script line");
        eprintln!("navshell: {error}");
    }

    let stdout = std::io::stdout();
    let runner = ScriptRunner::new(ShellConfig::from(&config), Instant::now(), stdout.lock());
    let summary = runner.run(events)?;
    info!(?summary, skipped = errors.len(), "Script finished");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["navshell", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["navshell", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["navshell"]);
        assert_eq!(args.script, None);
        assert_eq!(args.config, None);
        assert_eq!(args.settle_timeout_ms, None);
        assert_eq!(args.scroll_throttle_ms, None);
        assert_eq!(args.capacity, None);
    }

    #[test]
    fn test_script_path_populates_script_field() {
        let args = Args::parse_from(["navshell", "scenario.jsonl"]);
        assert_eq!(args.script, Some(PathBuf::from("scenario.jsonl")));
    }

    #[test]
    fn test_timing_flags() {
        let args = Args::parse_from([
            "navshell",
            "--settle-timeout-ms",
            "250",
            "--scroll-throttle-ms",
            "16",
            "--capacity",
            "20",
        ]);
        assert_eq!(args.settle_timeout_ms, Some(250));
        assert_eq!(args.scroll_throttle_ms, Some(16));
        assert_eq!(args.capacity, Some(20));
    }

    #[test]
    fn test_negative_timeout_rejected() {
        let result = Args::try_parse_from(["navshell", "--settle-timeout-ms", "-5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_path() {
        let args = Args::parse_from(["navshell", "--config", "/custom/config.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_cli_flags_flow_through_config_precedence_chain() {
        use navshell::config::{apply_cli_overrides, merge_config, ConfigFile};

        let config_file = ConfigFile {
            scroll_store_capacity: Some(40),
            settle_timeout_ms: Some(600),
            scroll_throttle_ms: None,
            skeleton_min_display_ms: None,
            announcement_clear_ms: None,
            max_render_retries: None,
            log_file_path: None,
        };

        let merged = merge_config(Some(config_file));
        assert_eq!(merged.settle_timeout_ms, 600, "Config file should override default");

        let args = Args::parse_from(["navshell", "--settle-timeout-ms", "250"]);
        let with_cli = apply_cli_overrides(merged, args.settle_timeout_ms, args.scroll_throttle_ms, args.capacity);
        assert_eq!(with_cli.settle_timeout_ms, 250, "CLI should override all other sources");
        assert_eq!(with_cli.scroll_store_capacity, 40);
    }
}
