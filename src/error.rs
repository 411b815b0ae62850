//! Error types for memwatch.
//!
//! A vanished process and a Ctrl+C interrupt are expected outcomes of a
//! monitoring run and are not represented here; they resolve inside the
//! watcher. These variants cover startup and configuration failures that
//! prevent a run from beginning, plus I/O failures on the output destination.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("No such process: {0}")]
    ProcessNotFound(u32),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Unsupported config format: {0} (expected .yaml, .yml, .json or .toml)")]
    UnsupportedConfigFormat(PathBuf),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, WatchError>;
