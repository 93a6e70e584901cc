// src/handler/mod.rs

//! Noticer and reporter handlers.
//!
//! A handler is a shell-syntax command string. It is split into a program and
//! arguments, spawned, fed the JSON report on stdin, and waited on. Handler
//! failures are logged and collected; they never reach the supervised job's
//! result.
//!
//! - [`split`] turns a command string into an argument vector.
//! - [`invoke`] runs one handler.
//! - [`fanout`] runs a set of handlers concurrently and joins them all.
//! - [`backend`] is the seam the supervisor dispatches through, so tests can
//!   record payloads instead of spawning processes.

use thiserror::Error;

pub mod backend;
pub mod fanout;
pub mod invoke;
pub mod split;

pub use backend::{HandlerBackend, ProcessBackend};
pub use fanout::{DispatchSummary, HandlerOutcome, run_handlers};
pub use invoke::{append_output, run_handler};
pub use split::split_command;

/// Why a single handler did not complete successfully.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("invalid handler: {handler:?}")]
    Invalid { handler: String },

    #[error("failed to spawn handler {handler:?}: {source}")]
    Spawn {
        handler: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for handler {handler:?}: {source}")]
    Wait {
        handler: String,
        #[source]
        source: std::io::Error,
    },

    #[error("handler {handler:?} failed: {status}")]
    Failed {
        handler: String,
        status: std::process::ExitStatus,
        output: String,
    },

    #[error("handler {handler:?} task aborted: {reason}")]
    Aborted { handler: String, reason: String },
}
