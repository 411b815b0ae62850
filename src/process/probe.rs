//! Read-only process inspection over a procfs root.
//!
//! All queries are folded into expected outcomes: a process that vanished
//! (or that we lack permission to inspect) reads as gone, never as an error.
//! The procfs root is a parameter so tests can point the probe at a
//! synthetic tree.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::process::memory::{read_ppid, read_rss_kb, read_state};

/// Status string reported for a process whose state can no longer be read.
pub const STATUS_GONE: &str = "gone";

/// Inspects processes through the /proc filesystem.
#[derive(Debug, Clone)]
pub struct ProcessProbe {
    root: PathBuf,
}

impl Default for ProcessProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProbe {
    /// Creates a probe over the system /proc.
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    /// Creates a probe over an alternate procfs root (used by tests).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn proc_path(&self, pid: u32) -> PathBuf {
        self.root.join(pid.to_string())
    }

    /// Returns true if the process still exists.
    pub fn is_alive(&self, pid: u32) -> bool {
        self.proc_path(pid).join("status").is_file()
    }

    /// Current resident memory in kilobytes, or None if the process is gone.
    pub fn memory_kb(&self, pid: u32) -> Option<f64> {
        read_rss_kb(&self.proc_path(pid)).map(|kb| kb as f64)
    }

    /// Human-readable process state ("running", "sleeping", ...).
    pub fn status_name(&self, pid: u32) -> String {
        read_state(&self.proc_path(pid)).unwrap_or_else(|| STATUS_GONE.to_string())
    }

    /// Live child PIDs of a process, ascending. Empty if the process has no
    /// children or is gone. With `recursive`, the full descendant set.
    pub fn children(&self, pid: u32, recursive: bool) -> Vec<u32> {
        if !recursive {
            return self.direct_children(pid);
        }

        // Iterative walk; the visited set guards against PID reuse loops.
        let mut visited = HashSet::new();
        let mut queue = self.direct_children(pid);
        let mut out = Vec::new();
        while let Some(child) = queue.pop() {
            if !visited.insert(child) {
                continue;
            }
            out.push(child);
            queue.extend(self.direct_children(child));
        }
        out.sort_unstable();
        out
    }

    /// Direct children via /proc/<pid>/task/<tid>/children (kernel 3.5+),
    /// falling back to a PPid scan of the procfs root.
    fn direct_children(&self, pid: u32) -> Vec<u32> {
        let task_dir = self.proc_path(pid).join("task");
        if let Ok(entries) = fs::read_dir(&task_dir) {
            let mut out = Vec::new();
            let mut found = false;
            for entry in entries.flatten() {
                if let Ok(contents) = fs::read_to_string(entry.path().join("children")) {
                    found = true;
                    out.extend(
                        contents
                            .split_whitespace()
                            .filter_map(|t| t.parse::<u32>().ok()),
                    );
                }
            }
            if found {
                out.sort_unstable();
                out.dedup();
                return out;
            }
        }

        self.scan_children_by_ppid(pid)
    }

    fn scan_children_by_ppid(&self, pid: u32) -> Vec<u32> {
        let mut out = Vec::new();
        if let Ok(entries) = fs::read_dir(&self.root) {
            for entry in entries.flatten() {
                let p = entry.path();
                let candidate = match numeric_dir_pid(&p) {
                    Some(v) => v,
                    None => continue,
                };
                if candidate != pid && read_ppid(&p) == Some(pid) {
                    out.push(candidate);
                }
            }
        }
        out.sort_unstable();
        out
    }
}

/// Parses a procfs directory name into a PID, skipping non-numeric entries.
fn numeric_dir_pid(p: &Path) -> Option<u32> {
    let name = p.file_name().and_then(|s| s.to_str())?;
    if !name.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}
