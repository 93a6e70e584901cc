// src/exec/mod.rs

//! Process execution layer.
//!
//! This module owns the supervised command: spawning it, draining its output,
//! reaping it, and turning the result into a [`Report`](crate::report::Report).
//!
//! - [`supervisor`] drives one run end to end.
//! - [`lifecycle`] is the run's state machine.
//! - [`status`] folds exits, signal deaths and launch failures into one
//!   exit code.
//! - [`wait`] reaps the child and collects CPU usage where available.

pub mod lifecycle;
pub mod status;
pub mod supervisor;
pub mod wait;

pub use lifecycle::Lifecycle;
pub use status::{ExitState, WaitOutcome, launch_failure_exit_code, resolve_exit_status};
pub use supervisor::{Streams, Supervisor};
pub use wait::{CpuUsage, Finished, wait_with_usage};
