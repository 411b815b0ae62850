//! Poll loop and run lifecycle.
//!
//! The watcher drives one tick after another: every tracked process is
//! sampled sequentially in ascending-PID order, then the loop waits one
//! interval before repeating. The run stops when any tracked process
//! vanishes (the first vanish stops the whole run), when the configured
//! duration has elapsed, or when a Ctrl+C interrupt is observed. All three
//! paths end with the summary rendered from consistent tracker state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::process::ProcessProbe;
use crate::sampler::{sample, SampleOutcome};
use crate::sink::{OutputSink, INTERRUPT_NOTICE};
use crate::tracker::{normalize_pids, RunSummary, WatchedProcess};

/// Options controlling one monitoring run.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Requested PIDs; de-duplicated and sorted before the run starts.
    pub pids: Vec<u32>,
    /// Time between ticks.
    pub interval: Duration,
    /// Total run time before auto-stop; None runs until interrupt or exit.
    pub duration: Option<Duration>,
    /// Fold descendant process memory into each sample.
    pub include_children: bool,
}

/// Why a run left the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A tracked process no longer exists.
    ProcessExited(u32),
    DurationElapsed,
    Interrupted,
}

/// Cooperative cancellation flag, set from a signal task and observed at
/// tick boundaries and during the inter-tick wait.
#[derive(Clone, Default)]
pub struct ShutdownFlag {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a task that trips the flag on Ctrl+C (SIGINT).
    pub fn install_ctrl_c(&self) {
        let this = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("received SIGINT, stopping after current tick");
                    this.trigger();
                }
                Err(e) => warn!("failed to listen for SIGINT: {}", e),
            }
        });
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
        // notify_one leaves a permit behind, so a wait that starts after the
        // trigger still returns immediately
        self.notify.notify_one();
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        if self.is_triggered() {
            return;
        }
        self.notify.notified().await;
    }
}

/// Runs the polling loop to completion and renders the summary.
///
/// Returns the computed summary and the reason the run stopped. Expected
/// stop conditions (vanish, duration, interrupt) are not errors; only
/// output I/O failures propagate.
pub async fn run(
    opts: &WatchOptions,
    probe: &ProcessProbe,
    sink: &mut OutputSink,
    shutdown: &ShutdownFlag,
) -> Result<(RunSummary, StopReason)> {
    let start = Instant::now();
    let mut watched: Vec<WatchedProcess> = normalize_pids(&opts.pids)
        .into_iter()
        .map(WatchedProcess::new)
        .collect();

    debug!(
        pids = ?watched.iter().map(|w| w.pid).collect::<Vec<_>>(),
        interval_secs = opts.interval.as_secs_f64(),
        include_children = opts.include_children,
        "starting watch loop"
    );

    sink.write_header()?;

    let reason = 'run: loop {
        if shutdown.is_triggered() {
            break 'run StopReason::Interrupted;
        }

        for w in watched.iter_mut() {
            match sample(probe, w, opts.include_children, start) {
                SampleOutcome::Observed(s) => sink.emit(&s)?,
                SampleOutcome::Terminated(pid) => {
                    info!(pid, "process no longer exists, stopping run");
                    break 'run StopReason::ProcessExited(pid);
                }
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(opts.interval) => {}
            _ = shutdown.wait() => break 'run StopReason::Interrupted,
        }

        if let Some(limit) = opts.duration {
            if start.elapsed() >= limit {
                break 'run StopReason::DurationElapsed;
            }
        }
    };

    let summary = RunSummary::from_watched(start.elapsed().as_secs_f64(), &watched);
    if reason == StopReason::Interrupted {
        sink.notice(INTERRUPT_NOTICE)?;
    }
    sink.emit_summary(&summary)?;

    Ok((summary, reason))
}
