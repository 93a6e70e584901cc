// src/exec/supervisor.rs

//! Runs one command and reports on it.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::Arc;

use chrono::Local;
use tokio::task::{self, JoinHandle};
use tracing::{Instrument, Span, debug, field, info, info_span, warn};

use crate::errors::{HeraldError, Result};
use crate::exec::lifecycle::Lifecycle;
use crate::exec::status::{WaitOutcome, resolve_exit_status};
use crate::exec::wait::wait_with_usage;
use crate::handler::{DispatchSummary, HandlerBackend};
use crate::output::{LogFile, OutputCapture, Sink, drain};
use crate::report::{Report, hostname};
use crate::settings::Settings;

/// Where the child's output is passed through to.
pub struct Streams {
    pub stdout: Box<dyn Write + Send>,
    pub stderr: Box<dyn Write + Send>,
}

impl Streams {
    /// The wrapper's own stdout/stderr.
    pub fn inherit() -> Self {
        Self {
            stdout: Box::new(io::stdout()),
            stderr: Box::new(io::stderr()),
        }
    }

    pub fn discard() -> Self {
        Self {
            stdout: Box::new(io::sink()),
            stderr: Box::new(io::sink()),
        }
    }
}

/// Supervises a single command from spawn to final report.
///
/// The run proceeds as:
/// 1. spawn the child with piped stdout/stderr
/// 2. launch the noticer dispatch in the background
/// 3. drain both pipes (tee'd into the capture buffers) until EOF
/// 4. reap the child and resolve its exit status
/// 5. deliver the final report to the reporters
/// 6. join the noticer dispatch
///
/// If the child cannot be started, a synthetic report (`exitCode = -1`) goes
/// to noticers and reporters alike and [`HeraldError::Launch`] is returned.
pub struct Supervisor {
    settings: Settings,
    backend: Arc<dyn HandlerBackend>,
    streams: Streams,
    span: Span,
    state: Lifecycle,
}

impl Supervisor {
    pub fn new(settings: Settings, backend: Arc<dyn HandlerBackend>, streams: Streams) -> Self {
        let span = info_span!("herald", tag = %settings.tag, command = field::Empty);
        Self {
            settings,
            backend,
            streams,
            span,
            state: Lifecycle::NotStarted,
        }
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    /// Run `args` to completion and return the final report.
    ///
    /// A supervisor runs once; later calls fail with
    /// [`HeraldError::AlreadyRan`].
    pub async fn run(&mut self, args: &[String]) -> Result<Report> {
        if self.state != Lifecycle::NotStarted {
            return Err(HeraldError::AlreadyRan(self.state));
        }
        let span = self.span.clone();
        span.record("command", shell_words::join(args).as_str());
        self.run_inner(args).instrument(span).await
    }

    async fn run_inner(&mut self, args: &[String]) -> Result<Report> {
        let mut report = Report::new(args, &self.settings.tag, hostname());
        self.advance(Lifecycle::Starting);

        let Some((program, rest)) = args.split_first() else {
            let err = io::Error::new(io::ErrorKind::InvalidInput, "no command given");
            return self.fail(report, err).await;
        };

        let capture = OutputCapture::new(self.settings.timestamp, self.open_log());

        let mut command = Command::new(program);
        command
            .args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        info!(command = %report.command, "starting execution of the command");
        report.start_at = Some(Local::now());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => return self.fail(report, e).await,
        };
        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            let err = io::Error::other("output pipes of the command are unavailable");
            return self.fail(report, err).await;
        };

        report.pid = Some(child.id());
        self.advance(Lifecycle::Running);

        // Snapshot taken now: no output, no exit fields, no endAt.
        let noticers = self.spawn_noticers(&report);

        self.advance(Lifecycle::Draining);
        let streams = std::mem::replace(&mut self.streams, Streams::discard());
        let out_reader = capture.stdout_reader(stdout);
        let err_reader = capture.stderr_reader(stderr);
        let out_task = task::spawn_blocking(move || drain(out_reader, streams.stdout));
        let err_task = task::spawn_blocking(move || drain(err_reader, streams.stderr));

        // Both pipes must hit EOF before we reap, or a chatty child could
        // block forever on a full pipe.
        for (stream, drain_task) in [("stdout", out_task), ("stderr", err_task)] {
            match drain_task.await {
                Ok(Ok(bytes)) => debug!(stream, bytes, "drain finished"),
                Ok(Err(e)) => warn!(
                    stream,
                    error = %e,
                    "something went wrong while executing the command"
                ),
                Err(e) => warn!(stream, error = %e, "drain task failed"),
            }
        }

        let waited = task::spawn_blocking(move || wait_with_usage(&mut child)).await;
        report.end_at = Some(Local::now());

        let (outcome, usage) = match waited {
            Ok(Ok(finished)) => (WaitOutcome::Exited(finished.status), finished.usage),
            Ok(Err(e)) => {
                warn!(error = %e, "waiting for the command failed");
                (WaitOutcome::Lost, None)
            }
            Err(e) => {
                warn!(error = %e, "wait task failed");
                (WaitOutcome::Lost, None)
            }
        };
        report.record_exit(resolve_exit_status(outcome));
        info!(command = %report.command, result = %report.result, "the command finished");

        let captured = capture.finish();
        report.stdout = captured.stdout;
        report.stderr = captured.stderr;
        report.output = captured.output;
        if let Some(usage) = usage {
            report.user_time = Some(usage.user.as_secs_f64());
            report.system_time = Some(usage.system.as_secs_f64());
        }

        self.dispatch_reporters(&report).await;
        self.join_noticers(noticers).await;

        self.advance(Lifecycle::Completed);
        info!(command = %report.command, "all processes are completed for the job");
        Ok(report)
    }

    /// Launch-failure path: both handler classes still hear about it.
    async fn fail(&mut self, mut report: Report, err: io::Error) -> Result<Report> {
        report.record_launch_failure(&err.to_string());
        warn!(command = %report.command, error = %err, "failed to execute the command");

        let noticers = self.spawn_noticers(&report);
        self.dispatch_reporters(&report).await;
        self.join_noticers(noticers).await;

        self.advance(Lifecycle::FailedToStart);
        Err(HeraldError::Launch {
            report: Box::new(report),
            source: err,
        })
    }

    fn spawn_noticers(&self, report: &Report) -> Option<JoinHandle<DispatchSummary>> {
        if self.settings.noticers.is_empty() {
            return None;
        }
        let payload = encode(report)?;

        info!("starting to run the noticers");
        let dispatch = self
            .backend
            .dispatch(self.settings.noticers.clone(), payload);
        Some(tokio::spawn(dispatch.in_current_span()))
    }

    async fn join_noticers(&self, noticers: Option<JoinHandle<DispatchSummary>>) {
        let Some(handle) = noticers else { return };
        match handle.await {
            Ok(summary) => info!(
                succeeded = summary.succeeded(),
                failed = summary.failed(),
                "finished to run the noticers"
            ),
            Err(e) => warn!(error = %e, "noticer dispatch task failed"),
        }
    }

    async fn dispatch_reporters(&self, report: &Report) {
        let Some(payload) = encode(report) else { return };

        info!("starting to run the reporters");
        let summary = self
            .backend
            .dispatch(self.settings.reporters.clone(), payload)
            .await;
        info!(
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            "finished to run the reporters"
        );
    }

    fn open_log(&self) -> Option<Arc<dyn Sink>> {
        let pattern = self.settings.log.as_deref()?;
        match LogFile::open_pattern(pattern) {
            Ok(file) => Some(Arc::new(file)),
            Err(e) => {
                warn!(pattern, error = %e, "log file unavailable; continuing without it");
                None
            }
        }
    }

    fn advance(&mut self, next: Lifecycle) {
        if !self.state.can_advance_to(next) {
            warn!(from = ?self.state, to = ?next, "unexpected lifecycle transition");
        }
        debug!(from = ?self.state, to = ?next, "lifecycle");
        self.state = next;
    }
}

fn encode(report: &Report) -> Option<Arc<[u8]>> {
    match report.to_json() {
        Ok(bytes) => Some(Arc::from(bytes)),
        Err(e) => {
            warn!(error = %e, "failed to encode the report");
            None
        }
    }
}
