//! User configuration.
//!
//! Settings are read from `.apidocs.toml` in the current directory when it
//! exists, or from the file named by `--config`.
//!
//! # Configuration File Format
//!
//! ```toml
//! priority_groups = ["v1", "apps/v1", "batch/v1"]
//! request_timeout_secs = 30
//! log_file = "/tmp/apidocs.log"
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use apidocs::data::builder::DEFAULT_PRIORITY_GROUPS;
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".apidocs.toml";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings shared by every command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Group versions pinned to the top of the catalog, in order.
    pub priority_groups: Vec<String>,
    /// Upper bound for every cluster request.
    pub request_timeout_secs: u64,
    /// Log file used while the browser owns the terminal.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            priority_groups: DEFAULT_PRIORITY_GROUPS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Load the configuration.
    ///
    /// An explicit `path` must exist. Without one, the default file is used
    /// when present and built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub async fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        debug!("config loaded from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        Ok(config)
    }
}
