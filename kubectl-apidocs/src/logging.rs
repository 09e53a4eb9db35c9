//! Logger setup.
//!
//! Subcommands log to stderr. The browser owns the terminal, so it logs to a
//! file or not at all.

use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
};

use anyhow::Context;
use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Set to `enable` to write a debug log while the browser runs.
pub const DEBUG_LOG_ENV: &str = "KUBECTL_APIDOCS_DEBUG_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Stderr,
    File(PathBuf),
    Off,
}

/// Pick where log records go.
///
/// A configured `log_file` wins over the debug environment switch, which
/// writes a timestamped file into the temp directory.
pub fn log_destination(
    interactive: bool,
    log_file: Option<&Path>,
    debug_env: Option<&str>,
) -> LogDestination {
    if !interactive {
        return LogDestination::Stderr;
    }
    if let Some(path) = log_file {
        return LogDestination::File(path.to_path_buf());
    }
    if debug_env == Some("enable") {
        let name = format!(
            "{}-kubectl-apidocs.log",
            chrono::Local::now().format("%Y%m%d%H%M%S")
        );
        return LogDestination::File(std::env::temp_dir().join(name));
    }
    LogDestination::Off
}

/// Install the global logger.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init(interactive: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let debug_env = std::env::var(DEBUG_LOG_ENV).ok();
    match log_destination(interactive, log_file, debug_env.as_deref()) {
        LogDestination::Stderr => {
            Builder::from_env(Env::default().default_filter_or("warn")).init();
        }
        LogDestination::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Builder::new()
                .filter_level(LevelFilter::Debug)
                .format_timestamp_millis()
                .target(Target::Pipe(Box::new(file)))
                .init();
            debug!("logging to {}", path.display());
        }
        LogDestination::Off => log::set_max_level(LevelFilter::Off),
    }
    Ok(())
}
