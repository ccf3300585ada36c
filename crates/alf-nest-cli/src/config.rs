//! # CLI Configuration
//!
//! Optional YAML file supplying defaults for command flags. Flags given on
//! the command line always win over the file.
//!
//! ```yaml
//! ignore_empty: false
//! sentinel: {"$tuple": []}
//! use_sentinel: true
//! log_format: json
//! pretty: false
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Defaults for command behavior, loaded from `--config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// `find` skips null and empty matches.
    pub ignore_empty: bool,
    /// `prune` sentinel, in the JSON nest encoding. Defaults to `null`.
    pub sentinel: serde_json::Value,
    /// When false, `prune` runs without a sentinel.
    pub use_sentinel: bool,
    /// Log line format on stderr.
    pub log_format: LogFormat,
    /// Pretty-print JSON results.
    pub pretty: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            ignore_empty: true,
            sentinel: serde_json::Value::Null,
            use_sentinel: true,
            log_format: LogFormat::Text,
            pretty: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl CliConfig {
    /// Load the config file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("failed to parse config YAML: {}", path.display()))
    }

    /// Parse config YAML. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}
