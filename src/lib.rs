// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod handler;
pub mod logging;
pub mod output;
pub mod report;
pub mod settings;

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::errors::HeraldError;
use crate::exec::{ExitState, Streams, Supervisor, launch_failure_exit_code};
use crate::handler::ProcessBackend;
use crate::report::Report;
use crate::settings::Settings;

/// Exit code used when the command line cannot be parsed.
pub const USAGE_EXIT_CODE: i32 = 2;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings (CLI merged with the config file)
/// - the supervisor with the process-spawning handler backend
/// - the wrapper's own exit code
pub async fn run(args: CliArgs) -> Result<i32> {
    let settings = Settings::resolve(&args);
    debug!(?settings, "effective settings");

    let override_status = settings.override_status;
    let mut supervisor = Supervisor::new(settings, Arc::new(ProcessBackend), Streams::inherit());

    match supervisor.run(&args.command).await {
        Ok(report) => Ok(exit_code_for(&report, override_status)),
        // The job never ran, so there is no status to override.
        Err(HeraldError::Launch { source, .. }) => Ok(launch_failure_exit_code(&source)),
        Err(e) => Err(e.into()),
    }
}

/// The wrapper's exit code for a completed run.
pub fn exit_code_for(report: &Report, override_status: bool) -> i32 {
    if override_status {
        return 0;
    }
    report.exit_code.unwrap_or(ExitState::NOT_STARTED.code)
}
