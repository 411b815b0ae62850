//! Per-process accumulator state for memory growth tracking.
//!
//! Each watched process owns one `ResourceTracker` that turns a stream of
//! raw readings into deltas and a running total. The first reading has no
//! baseline, so its delta is suppressed to zero.

/// Accumulates deltas and cumulative growth for one process's readings.
#[derive(Debug, Clone)]
pub struct ResourceTracker {
    first: bool,
    last: f64,
    delta: f64,
    total: f64,
}

impl Default for ResourceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self {
            first: true,
            last: 0.0,
            delta: 0.0,
            total: 0.0,
        }
    }

    /// Applies one reading (kilobytes) and returns the resulting delta.
    ///
    /// Must be called at most once per tick. A reading lower than the last
    /// one yields a negative delta; shrinkage is a legitimate signal.
    pub fn update(&mut self, current: f64) -> f64 {
        let delta = if self.first { 0.0 } else { current - self.last };
        self.first = false;
        self.delta = delta;
        self.total += delta;
        self.last = current;
        delta
    }

    /// True until the first reading has been applied.
    pub fn is_first(&self) -> bool {
        self.first
    }

    /// Most recent reading, 0 before the first sample.
    pub fn last_value(&self) -> f64 {
        self.last
    }

    /// Delta applied by the most recent reading.
    pub fn last_delta(&self) -> f64 {
        self.delta
    }

    /// Running sum of all applied deltas; may be negative.
    pub fn total_growth(&self) -> f64 {
        self.total
    }
}

/// Binds a PID to its tracker for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct WatchedProcess {
    pub pid: u32,
    pub mem: ResourceTracker,
}

impl WatchedProcess {
    pub fn new(pid: u32) -> Self {
        Self {
            pid,
            mem: ResourceTracker::new(),
        }
    }
}

/// De-duplicates and sorts the requested PID set ascending. This order is
/// also the per-tick sampling and emission order.
pub fn normalize_pids(pids: &[u32]) -> Vec<u32> {
    let mut out = pids.to_vec();
    out.sort_unstable();
    out.dedup();
    out
}

/// Final per-process figures reported when a run stops.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSummary {
    pub pid: u32,
    pub final_kb: f64,
    pub total_growth_kb: f64,
    pub rate_kb_per_sec: f64,
}

/// Summary of a finished run, derived from the terminal tracker states and
/// elapsed wall-clock time. Pure function of its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub elapsed_secs: f64,
    pub entries: Vec<ProcessSummary>,
}

impl RunSummary {
    pub fn from_watched(elapsed_secs: f64, watched: &[WatchedProcess]) -> Self {
        let entries = watched
            .iter()
            .map(|w| ProcessSummary {
                pid: w.pid,
                final_kb: w.mem.last_value(),
                total_growth_kb: w.mem.total_growth(),
                rate_kb_per_sec: if elapsed_secs > 0.0 {
                    w.mem.total_growth() / elapsed_secs
                } else {
                    0.0
                },
            })
            .collect();
        Self {
            elapsed_secs,
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_update_suppresses_delta() {
        let mut tracker = ResourceTracker::new();
        assert!(tracker.is_first());

        let delta = tracker.update(1000.0);

        assert_eq!(delta, 0.0);
        assert!(!tracker.is_first());
        assert_eq!(tracker.last_value(), 1000.0);
        assert_eq!(tracker.last_delta(), 0.0);
        assert_eq!(tracker.total_growth(), 0.0);
    }

    #[test]
    fn test_delta_and_total_follow_readings() {
        // After update k > 0: delta == v_k - v_{k-1}, total == v_k - v_0
        let readings = [1000.0, 1000.0, 1500.0, 1200.0, 2000.0];
        let mut tracker = ResourceTracker::new();

        for (k, &v) in readings.iter().enumerate() {
            let delta = tracker.update(v);
            if k == 0 {
                assert_eq!(delta, 0.0);
            } else {
                assert_eq!(delta, v - readings[k - 1]);
            }
            assert_eq!(tracker.last_delta(), delta);
            assert_eq!(tracker.total_growth(), v - readings[0]);
            assert_eq!(tracker.last_value(), v);
        }
    }

    #[test]
    fn test_shrinkage_yields_negative_total() {
        let mut tracker = ResourceTracker::new();
        tracker.update(5000.0);
        let delta = tracker.update(3000.0);

        assert_eq!(delta, -2000.0);
        assert_eq!(tracker.total_growth(), -2000.0);
    }

    #[test]
    fn test_total_equals_sum_of_deltas() {
        let readings = [100.0, 250.0, 90.0, 90.0, 400.0];
        let mut tracker = ResourceTracker::new();
        let mut sum = 0.0;

        for &v in &readings {
            sum += tracker.update(v);
        }
        assert_eq!(tracker.total_growth(), sum);
    }

    #[test]
    fn test_normalize_pids_dedupes_and_sorts() {
        assert_eq!(normalize_pids(&[5, 3, 5]), vec![3, 5]);
        assert_eq!(normalize_pids(&[42]), vec![42]);
        assert_eq!(normalize_pids(&[9, 1, 9, 1, 4]), vec![1, 4, 9]);
        assert!(normalize_pids(&[]).is_empty());
    }

    #[test]
    fn test_watched_process_starts_fresh() {
        let watched = WatchedProcess::new(42);
        assert_eq!(watched.pid, 42);
        assert!(watched.mem.is_first());
        assert_eq!(watched.mem.total_growth(), 0.0);
    }

    #[test]
    fn test_summary_from_trackers() {
        let mut watched = WatchedProcess::new(42);
        for v in [1000.0, 1000.0, 1500.0] {
            watched.mem.update(v);
        }

        let summary = RunSummary::from_watched(3.0, std::slice::from_ref(&watched));
        assert_eq!(summary.entries.len(), 1);
        let entry = &summary.entries[0];
        assert_eq!(entry.pid, 42);
        assert_eq!(entry.final_kb, 1500.0);
        assert_eq!(entry.total_growth_kb, 500.0);
        assert!((entry.rate_kb_per_sec - 500.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_is_idempotent() {
        let mut watched = WatchedProcess::new(7);
        watched.mem.update(800.0);
        watched.mem.update(650.0);
        let watched = [watched];

        let first = RunSummary::from_watched(12.5, &watched);
        let second = RunSummary::from_watched(12.5, &watched);
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_zero_elapsed_has_zero_rate() {
        let mut watched = WatchedProcess::new(7);
        watched.mem.update(800.0);

        let summary = RunSummary::from_watched(0.0, std::slice::from_ref(&watched));
        assert_eq!(summary.entries[0].rate_kb_per_sec, 0.0);
    }
}
