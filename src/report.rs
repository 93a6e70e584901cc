// src/report.rs

//! The report handed to noticers and reporters.
//!
//! One `Report` is built per supervised run. Noticers get a snapshot taken
//! right after the child started (no exit fields, no output); reporters get
//! the finished value. Both are serialized independently, so a handler never
//! observes a later mutation.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::exec::status::ExitState;

/// Result of one supervised command, in the JSON shape handlers receive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Shell-quoted invocation, safe to paste back into a shell.
    pub command: String,
    pub command_args: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,

    /// stdout and stderr interleaved in the order they were read.
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,

    /// `-1` means the command never started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub signaled: bool,
    #[serde(default)]
    pub result: String,

    #[serde(default)]
    pub hostname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Local>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Local>>,

    /// CPU time in fractional seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_time: Option<f64>,
}

impl Report {
    pub fn new(args: &[String], tag: &str, hostname: String) -> Self {
        Self {
            command: shell_words::join(args),
            command_args: args.to_vec(),
            tag: tag.to_string(),
            hostname,
            ..Self::default()
        }
    }

    /// Fill `exitCode`, `signaled` and the summary line together.
    pub fn record_exit(&mut self, state: ExitState) {
        self.exit_code = Some(state.code);
        self.signaled = state.signaled;
        self.result = state.summary();
    }

    /// Turn this report into the synthetic "never started" report.
    pub fn record_launch_failure(&mut self, reason: &str) {
        self.exit_code = Some(ExitState::NOT_STARTED.code);
        self.signaled = false;
        self.result = format!("failed to execute the command: {reason}");
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

/// Best-effort host name; empty when the platform will not tell us.
pub fn hostname() -> String {
    #[cfg(unix)]
    {
        let mut buf = [0u8; 256];
        // SAFETY: the buffer is valid for `buf.len()` bytes and gethostname
        // writes at most that many.
        let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
        if rc != 0 {
            return String::new();
        }
        let end = buf.iter().position(|b| *b == 0).unwrap_or(buf.len());
        String::from_utf8_lossy(&buf[..end]).into_owned()
    }

    #[cfg(not(unix))]
    {
        std::env::var("COMPUTERNAME")
            .or_else(|_| std::env::var("HOSTNAME"))
            .unwrap_or_default()
    }
}
