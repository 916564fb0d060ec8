//! Report outputs: the append-only run log and the JSON summary export.
//! One finished run produces exactly one record; the formats here are the
//! external contract consumed by whatever tails the files.
mod format;
mod writers;


use chrono::Utc;
use serde::Serialize;

pub(crate) use format::format_x100;
pub use writers::{append_run_log, write_json_summary};

/// UTC timestamp layout used in run-log records.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One finished run, flattened for the report consumers.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub timestamp: String,
    pub target: String,
    pub duration_s: u64,
    pub concurrency: usize,
    pub total: u64,
    pub success: u64,
    pub failed: u64,
    /// Average requests per second, fixed-point scaled by 100.
    pub rate_x100: u64,
    pub clean_drain: bool,
}

#[must_use]
pub fn utc_timestamp() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}
