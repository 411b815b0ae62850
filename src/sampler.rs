//! One reading cycle for a watched process.
//!
//! A sample queries liveness and resident memory, optionally folds in
//! descendant memory, feeds the tracker exactly once, and produces either
//! an immutable `Sample` or a termination signal for the run.

use std::time::Instant;

use chrono::Utc;
use tracing::debug;

use crate::process::ProcessProbe;
use crate::tracker::WatchedProcess;

/// Immutable record of one successful reading. Consumed by the output sink
/// and not retained.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub pid: u32,
    /// Wall-clock seconds since the Unix epoch, fractional.
    pub timestamp: f64,
    /// Seconds since the run started.
    pub elapsed_secs: f64,
    /// Combined resident memory in kilobytes (descendants included when enabled).
    pub memory_kb: f64,
    pub delta_kb: f64,
    pub total_kb: f64,
    pub status: String,
    /// Live descendant count, None when child aggregation is disabled.
    pub children: Option<usize>,
}

/// Outcome of one reading cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleOutcome {
    Observed(Sample),
    /// The process no longer exists; tracking it is over.
    Terminated(u32),
}

/// Performs one reading cycle for `watched`.
///
/// A vanished child is silently excluded from that tick's sum and count;
/// only the target process itself vanishing terminates tracking.
pub fn sample(
    probe: &ProcessProbe,
    watched: &mut WatchedProcess,
    include_children: bool,
    start: Instant,
) -> SampleOutcome {
    let pid = watched.pid;
    let timestamp = Utc::now().timestamp_micros() as f64 / 1e6;

    if !probe.is_alive(pid) {
        return SampleOutcome::Terminated(pid);
    }
    let own_kb = match probe.memory_kb(pid) {
        Some(kb) => kb,
        // Vanished between the liveness check and the read
        None => return SampleOutcome::Terminated(pid),
    };

    let mut combined_kb = own_kb;
    let children = if include_children {
        let mut live = 0usize;
        for child in probe.children(pid, true) {
            match probe.memory_kb(child) {
                Some(kb) => {
                    combined_kb += kb;
                    live += 1;
                }
                None => debug!(pid, child, "child vanished during enumeration, skipping"),
            }
        }
        Some(live)
    } else {
        None
    };

    let delta_kb = watched.mem.update(combined_kb);

    SampleOutcome::Observed(Sample {
        pid,
        timestamp,
        elapsed_secs: start.elapsed().as_secs_f64(),
        memory_kb: combined_kb,
        delta_kb,
        total_kb: watched.mem.total_growth(),
        status: probe.status_name(pid),
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn add_process(root: &Path, pid: u32, ppid: u32, rss_kb: u64) {
        let proc_path = root.join(pid.to_string());
        fs::create_dir_all(&proc_path).unwrap();
        fs::write(
            proc_path.join("status"),
            format!(
                "Name:\tfake\nState:\tS (sleeping)\nPPid:\t{}\nVmRSS:\t{} kB\n",
                ppid, rss_kb
            ),
        )
        .unwrap();
    }

    fn remove_process(root: &Path, pid: u32) {
        fs::remove_dir_all(root.join(pid.to_string())).unwrap();
    }

    #[test]
    fn test_sample_without_children() {
        let dir = TempDir::new().unwrap();
        add_process(dir.path(), 42, 1, 1000);
        let probe = ProcessProbe::with_root(dir.path());
        let mut watched = WatchedProcess::new(42);

        let outcome = sample(&probe, &mut watched, false, Instant::now());
        let s = match outcome {
            SampleOutcome::Observed(s) => s,
            other => panic!("expected a sample, got {:?}", other),
        };

        assert_eq!(s.pid, 42);
        assert_eq!(s.memory_kb, 1000.0);
        assert_eq!(s.delta_kb, 0.0);
        assert_eq!(s.total_kb, 0.0);
        assert_eq!(s.status, "sleeping");
        assert_eq!(s.children, None);
        assert!(s.timestamp > 0.0);
    }

    #[test]
    fn test_sample_aggregates_children() {
        let dir = TempDir::new().unwrap();
        add_process(dir.path(), 42, 1, 1000);
        add_process(dir.path(), 43, 42, 200);
        add_process(dir.path(), 44, 43, 50);
        let probe = ProcessProbe::with_root(dir.path());
        let mut watched = WatchedProcess::new(42);

        match sample(&probe, &mut watched, true, Instant::now()) {
            SampleOutcome::Observed(s) => {
                assert_eq!(s.memory_kb, 1250.0);
                assert_eq!(s.children, Some(2));
            }
            other => panic!("expected a sample, got {:?}", other),
        }
    }

    #[test]
    fn test_vanished_child_is_excluded_not_fatal() {
        let dir = TempDir::new().unwrap();
        add_process(dir.path(), 42, 1, 1000);
        add_process(dir.path(), 43, 42, 200);
        let probe = ProcessProbe::with_root(dir.path());
        let mut watched = WatchedProcess::new(42);

        // Tick 0: parent + child
        match sample(&probe, &mut watched, true, Instant::now()) {
            SampleOutcome::Observed(s) => {
                assert_eq!(s.memory_kb, 1200.0);
                assert_eq!(s.children, Some(1));
            }
            other => panic!("expected a sample, got {:?}", other),
        }

        // Child exits between ticks; tick 1 is parent only, no error
        remove_process(dir.path(), 43);
        match sample(&probe, &mut watched, true, Instant::now()) {
            SampleOutcome::Observed(s) => {
                assert_eq!(s.memory_kb, 1000.0);
                assert_eq!(s.delta_kb, -200.0);
                assert_eq!(s.children, Some(0));
            }
            other => panic!("expected a sample, got {:?}", other),
        }
    }

    #[test]
    fn test_vanished_target_terminates() {
        let dir = TempDir::new().unwrap();
        let probe = ProcessProbe::with_root(dir.path());
        let mut watched = WatchedProcess::new(42);

        assert_eq!(
            sample(&probe, &mut watched, true, Instant::now()),
            SampleOutcome::Terminated(42)
        );
        // The tracker was never fed
        assert!(watched.mem.is_first());
    }

    #[test]
    fn test_consecutive_samples_track_growth() {
        let dir = TempDir::new().unwrap();
        add_process(dir.path(), 42, 1, 1000);
        let probe = ProcessProbe::with_root(dir.path());
        let mut watched = WatchedProcess::new(42);
        let start = Instant::now();

        sample(&probe, &mut watched, false, start);

        add_process(dir.path(), 42, 1, 1500); // rewrite status with new VmRSS
        match sample(&probe, &mut watched, false, start) {
            SampleOutcome::Observed(s) => {
                assert_eq!(s.delta_kb, 500.0);
                assert_eq!(s.total_kb, 500.0);
            }
            other => panic!("expected a sample, got {:?}", other),
        }
    }
}
