// src/exec/status.rs

//! Exit status normalization.
//!
//! Every way a supervised command can end is folded into a signed exit code
//! plus a `signaled` flag:
//!
//! - never started (spawn failed, wait lost) → `-1`
//! - normal exit → the process's own status (0-255)
//! - killed by signal N → `128 + N`, `signaled = true`

use std::io;
use std::process::ExitStatus;

/// What waiting on the command produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The process was reaped and reported a status.
    Exited(ExitStatus),
    /// The process never launched.
    NotStarted,
    /// The process launched but the wait itself failed.
    Lost,
}

/// Normalized exit information stored in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitState {
    pub code: i32,
    pub signaled: bool,
}

impl ExitState {
    pub const NOT_STARTED: ExitState = ExitState {
        code: -1,
        signaled: false,
    };

    /// Original signal number, recovered from the `128 + N` encoding.
    pub fn signal(&self) -> Option<i32> {
        self.signaled.then_some(self.code & 127)
    }

    /// One-line summary used as the report's `result`.
    pub fn summary(&self) -> String {
        match self.signal() {
            Some(sig) => format!("command died with signal: {sig}"),
            None => format!("command exited with code: {}", self.code),
        }
    }
}

pub fn resolve_exit_status(outcome: WaitOutcome) -> ExitState {
    match outcome {
        WaitOutcome::Exited(status) => from_exit_status(status),
        WaitOutcome::NotStarted | WaitOutcome::Lost => ExitState::NOT_STARTED,
    }
}

#[cfg(unix)]
fn from_exit_status(status: ExitStatus) -> ExitState {
    use std::os::unix::process::ExitStatusExt;

    if let Some(code) = status.code() {
        return ExitState {
            code,
            signaled: false,
        };
    }
    match status.signal() {
        Some(sig) => ExitState {
            code: 128 + sig,
            signaled: true,
        },
        // Stopped/continued statuses never come out of a blocking wait.
        None => ExitState::NOT_STARTED,
    }
}

#[cfg(not(unix))]
fn from_exit_status(status: ExitStatus) -> ExitState {
    match status.code() {
        Some(code) => ExitState {
            code,
            signaled: false,
        },
        None => ExitState::NOT_STARTED,
    }
}

/// Exit code for the wrapper itself when the command could not be launched.
///
/// Mirrors the shell: 127 for "command not found", 126 for "found but not
/// executable", 125 for anything else.
pub fn launch_failure_exit_code(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::NotFound => 127,
        io::ErrorKind::PermissionDenied => 126,
        _ => 125,
    }
}
