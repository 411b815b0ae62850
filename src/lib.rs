//! memwatch - process memory growth monitor
//!
//! Samples resident memory (VmRSS) for a set of PIDs from /proc at a fixed
//! interval, tracking per-tick delta and cumulative growth, optionally
//! folding in descendant processes. Output is styled column rows on an
//! interactive terminal or CSV when redirected, with a per-process summary
//! on stderr when the run stops.
//!
//! # Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use memwatch::process::ProcessProbe;
//! use memwatch::sink::OutputSink;
//! use memwatch::watcher::{run, ShutdownFlag, WatchOptions};
//!
//! # async fn demo() -> memwatch::error::Result<()> {
//! let opts = WatchOptions {
//!     pids: vec![4242],
//!     interval: Duration::from_secs(5),
//!     duration: None,
//!     include_children: true,
//! };
//! let probe = ProcessProbe::new();
//! let mut sink = OutputSink::stdout(opts.include_children);
//! let shutdown = ShutdownFlag::new();
//! shutdown.install_ctrl_c();
//! let (summary, reason) = run(&opts, &probe, &mut sink, &shutdown).await?;
//! # let _ = (summary, reason);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod process;
pub mod sampler;
pub mod sink;
pub mod tracker;
pub mod watcher;

// Re-export main types for convenience
pub use error::{Result, WatchError};
pub use process::ProcessProbe;
pub use sampler::{Sample, SampleOutcome};
pub use sink::{OutputSink, SinkMode};
pub use tracker::{normalize_pids, ResourceTracker, RunSummary, WatchedProcess};
pub use watcher::{run, ShutdownFlag, StopReason, WatchOptions};
