//! Process-related modules for inspecting targets through /proc.
//!
//! This module provides:
//! - `memory`: resident memory and state parsing from /proc/<pid>/status
//! - `probe`: read-only liveness, memory, and child queries per PID

pub mod memory;
pub mod probe;

// Re-export commonly used types
pub use memory::{parse_kb_value, read_ppid, read_rss_kb, read_state};
pub use probe::{ProcessProbe, STATUS_GONE};
