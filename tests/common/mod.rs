#![allow(dead_code)]

use std::path::Path;

pub use herald_test_utils::backend::RecordingBackend;
pub use herald_test_utils::builders::SettingsBuilder;
pub use herald_test_utils::{capture_handler, failing_handler, init_tracing, sh, with_timeout};

use herald::report::Report;

/// Read a report a capture handler wrote to disk.
pub fn read_report(path: &Path) -> Report {
    let bytes = std::fs::read(path).expect("handler wrote the report");
    Report::from_json(&bytes).expect("handler received valid JSON")
}

/// Regex fragment matching one timestamp prefix.
pub const TIMESTAMP_RE: &str =
    r"\[[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]{6}\] ";
