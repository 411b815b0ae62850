//! Configuration management for memwatch.
//!
//! This module handles loading, merging, and validating configuration from
//! an optional file and CLI arguments. It supports YAML, JSON, and TOML
//! formats, selected by file extension. Precedence is CLI > file > defaults.

use crate::cli::Args;
use crate::error::{Result, WatchError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Default configuration constants
pub const DEFAULT_INTERVAL_SECS: f64 = 5.0;

/// Effective run configuration after merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Time between ticks, seconds
    pub interval: Option<f64>,

    /// Total run time in seconds; absent means unbounded
    pub duration: Option<f64>,

    /// Fold descendant process memory into each sample
    #[serde(alias = "include-children")]
    pub include_children: Option<bool>,

    /// Destination for sample output; absent means stdout
    #[serde(alias = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Diagnostic log level name
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    pub fn interval_secs(&self) -> f64 {
        self.interval.unwrap_or(DEFAULT_INTERVAL_SECS)
    }

    pub fn duration_secs(&self) -> Option<f64> {
        self.duration
    }

    pub fn include_children(&self) -> bool {
        self.include_children.unwrap_or(true)
    }
}

/// Loads a config file by extension.
fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(WatchError::ConfigNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;

    let parsed = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .map_err(|e| WatchError::InvalidConfig(e.to_string()))?,
        Some("json") => serde_json::from_str(&content)
            .map_err(|e| WatchError::InvalidConfig(e.to_string()))?,
        Some("toml") => {
            toml::from_str(&content).map_err(|e| WatchError::InvalidConfig(e.to_string()))?
        }
        _ => return Err(WatchError::UnsupportedConfigFormat(path.to_path_buf())),
    };
    Ok(parsed)
}

/// Resolves the effective config: file values (when `--config` is given)
/// overridden by CLI flags.
///
/// Runs before the tracing subscriber exists (the effective log level may
/// come from the file), so it must not emit log events; the caller logs the
/// outcome once logging is up.
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => load_config_file(path)?,
        None => Config::default(),
    };

    if args.interval.is_some() {
        config.interval = args.interval;
    }
    if args.duration.is_some() {
        config.duration = args.duration;
    }
    if let Some(flag) = args.include_children_flag() {
        config.include_children = Some(flag);
    }
    if args.log_file.is_some() {
        config.log_file = args.log_file.clone();
    }
    if let Some(level) = args.log_level {
        config.log_level = Some(format!("{:?}", level).to_lowercase());
    }

    Ok(config)
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<()> {
    let interval = cfg.interval_secs();
    if !interval.is_finite() || interval <= 0.0 {
        return Err(WatchError::InvalidConfig(format!(
            "interval must be a positive number of seconds, got {}",
            interval
        )));
    }

    if let Some(duration) = cfg.duration_secs() {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(WatchError::InvalidConfig(format!(
                "duration must be a positive number of seconds, got {}",
                duration
            )));
        }
    }

    Ok(())
}
