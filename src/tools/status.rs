//! ULC Status Tool
//!
//! Provides runtime status information about the ULC service.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Converter usage instructions for AI assistants
pub const CONVERTER_INSTRUCTIONS: &str = r#"
# ULC Converter Instructions

ULC converts lengths between centimeters (cm), meters (m), feet (ft) and
millimeters (mm). All factors are relative to meters.

## Quick conversion

Use `convert` with `value`, `from_unit` and `to_unit`:
- `convert(value: "2.5", from_unit: "m", to_unit: "ft")` → result `"8.2"`

## Live sessions

A session behaves like one converter screen:
1. `create_session` (optionally with `input_unit`, `output_unit`, `input_text`)
2. `set_input_text`, `set_input_unit`, `set_output_unit` as the user changes things
3. Every call returns the full state including `result` and `revision`
4. `close_session` when done. Nothing is persisted.

## Rules

- Unit ids are exactly `cm`, `m`, `ft`, `mm`. Anything else is rejected and the
  session is left unchanged.
- Input text that is not a number (including empty text) converts as 0.
- Results are rounded to 2 decimals, halves away from zero, and shown without
  padding zeros: `8.2`, not `8.20`.
"#;

/// Status information returned by the status tool
#[derive(Debug, Serialize)]
pub struct UlcStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub active_sessions: usize,
    pub max_sessions: usize,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Tracks runtime status
pub struct StatusTracker {
    start_time: Instant,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Get the current status
    pub fn get_status(&self, active_sessions: usize, max_sessions: usize) -> UlcStatus {
        let build_info = BuildInfo::current();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        UlcStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            active_sessions,
            max_sessions,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}
