//! CLI arguments for memwatch.
//!
//! This module defines the command-line interface structure using the clap
//! library. The PID list is positional; everything else has a sensible
//! default and can also come from an optional config file.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "memwatch",
    about = "Check the memory usage of processes",
    long_about = "Check the memory usage of processes.\n\n\
                  Samples resident memory for each PID at a fixed interval, tracking \
                  per-interval delta and cumulative growth (including descendant \
                  processes by default) until a duration limit, Ctrl+C, or process \
                  exit, then prints a per-process summary to stderr.",
    version,
    propagate_version = true
)]
pub struct Args {
    /// Process IDs to watch (at least one)
    #[arg(required = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub pid: Vec<u32>,

    /// The log file to write to (defaults to STDOUT)
    #[arg(short = 'f', long)]
    pub log_file: Option<PathBuf>,

    /// Time between reads, in seconds [default: 5]
    #[arg(short = 'i', long)]
    pub interval: Option<f64>,

    /// How long to run, in seconds (defaults to indefinite)
    #[arg(short = 'd', long)]
    pub duration: Option<f64>,

    /// Include descendant processes in memory count [default]
    #[arg(long, overrides_with = "no_include_children")]
    pub include_children: bool,

    /// Count only each target process itself
    #[arg(long, overrides_with = "include_children")]
    pub no_include_children: bool,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Log level for diagnostics (sample rows are unaffected)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

impl Args {
    /// Tri-state child-aggregation flag: Some(..) when either CLI flag was
    /// given, None to defer to the config file / default.
    pub fn include_children_flag(&self) -> Option<bool> {
        if self.no_include_children {
            Some(false)
        } else if self.include_children {
            Some(true)
        } else {
            None
        }
    }
}
