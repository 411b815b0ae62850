//! Parsing helpers for reading process memory from /proc.
//!
//! This module provides functions to extract resident memory and process
//! state from `/proc/<pid>/status`.

use std::fs;
use std::path::Path;

/// Parses kilobyte values from /proc status file lines ("  1234 kB").
pub fn parse_kb_value(v: &str) -> Option<u64> {
    v.split_whitespace().next()?.parse().ok()
}

/// Reads VmRSS from /proc/[pid]/status.
/// Returns resident memory in kilobytes, or None if the process vanished,
/// the status file is unreadable, or no VmRSS line is present (a fully
/// reaped process reports no resident memory).
pub fn read_rss_kb(proc_path: &Path) -> Option<u64> {
    let content = fs::read_to_string(proc_path.join("status")).ok()?;

    for line in content.lines() {
        if let Some(v) = line.strip_prefix("VmRSS:") {
            return parse_kb_value(v);
        }
    }
    None
}

/// Reads the human-readable process state from /proc/[pid]/status.
///
/// The kernel writes the state as `State:\tS (sleeping)`; the name inside
/// the parentheses is returned ("running", "sleeping", "zombie", ...).
pub fn read_state(proc_path: &Path) -> Option<String> {
    let content = fs::read_to_string(proc_path.join("status")).ok()?;

    for line in content.lines() {
        if let Some(v) = line.strip_prefix("State:") {
            let v = v.trim();
            if let (Some(open), Some(close)) = (v.find('('), v.rfind(')')) {
                if open < close {
                    return Some(v[open + 1..close].to_string());
                }
            }
            // Older kernels may print only the single-letter code
            return v.split_whitespace().next().map(|s| s.to_string());
        }
    }
    None
}

/// Reads PPid from /proc/[pid]/status.
pub fn read_ppid(proc_path: &Path) -> Option<u32> {
    let content = fs::read_to_string(proc_path.join("status")).ok()?;

    for line in content.lines() {
        if let Some(v) = line.strip_prefix("PPid:") {
            return v.trim().parse().ok();
        }
    }
    None
}
