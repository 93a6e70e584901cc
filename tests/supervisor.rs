// tests/supervisor.rs

#![cfg(unix)]

mod common;
use crate::common::{RecordingBackend, SettingsBuilder, TIMESTAMP_RE, init_tracing, sh, with_timeout};

use std::error::Error;
use std::sync::Arc;

use regex::Regex;
use tempfile::tempdir;

use herald::errors::HeraldError;
use herald::exec::{Lifecycle, Streams, Supervisor};
use herald::report::Report;
use herald::settings::Settings;

type TestResult = Result<(), Box<dyn Error>>;

fn handlers() -> SettingsBuilder {
    SettingsBuilder::new().noticer("notice").reporter("report")
}

async fn supervise(
    settings: Settings,
    args: Vec<String>,
) -> (Supervisor, RecordingBackend, herald::errors::Result<Report>) {
    let backend = RecordingBackend::new();
    let mut supervisor = Supervisor::new(settings, Arc::new(backend.clone()), Streams::discard());
    let result = with_timeout(supervisor.run(&args)).await;
    (supervisor, backend, result)
}

#[tokio::test]
async fn captures_output_and_exit_status() -> TestResult {
    init_tracing();
    let (supervisor, backend, result) =
        supervise(handlers().build(), sh("echo 1; echo 2; echo 3")).await;
    let report = result?;

    assert_eq!(supervisor.state(), Lifecycle::Completed);
    assert_eq!(report.output, "1\n2\n3\n");
    assert_eq!(report.stdout, "1\n2\n3\n");
    assert_eq!(report.stderr, "");
    assert_eq!(report.exit_code, Some(0));
    assert!(!report.signaled);
    assert_eq!(report.result, "command exited with code: 0");
    assert!(report.start_at.is_some());
    assert!(report.end_at >= report.start_at);
    assert_eq!(report.command_args, sh("echo 1; echo 2; echo 3"));

    assert_eq!(backend.reports_for("report"), vec![report]);
    Ok(())
}

#[tokio::test]
async fn keeps_streams_apart() -> TestResult {
    init_tracing();
    let (_, _, result) = supervise(
        handlers().build(),
        sh("echo out; echo err >&2; echo out2"),
    )
    .await;
    let report = result?;

    assert_eq!(report.stdout, "out\nout2\n");
    assert_eq!(report.stderr, "err\n");
    // Merged output holds every line of both streams; exact interleaving
    // across the two pipes is not guaranteed.
    let mut merged: Vec<&str> = report.output.lines().collect();
    merged.sort_unstable();
    assert_eq!(merged, vec!["err", "out", "out2"]);
    Ok(())
}

#[tokio::test]
async fn large_output_is_captured_whole() -> TestResult {
    init_tracing();
    let (_, _, result) = supervise(
        handlers().build(),
        sh("head -c 65537 /dev/zero | tr '\\0' a; head -c 70000 /dev/zero | tr '\\0' b >&2"),
    )
    .await;
    let report = result?;

    assert_eq!(report.stdout.len(), 65_537);
    assert!(report.stdout.bytes().all(|b| b == b'a'));
    assert_eq!(report.stderr.len(), 70_000);
    assert!(report.stderr.bytes().all(|b| b == b'b'));
    assert_eq!(report.output.len(), 65_537 + 70_000);
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_is_recorded() -> TestResult {
    init_tracing();
    let (_, _, result) = supervise(handlers().build(), sh("exit 3")).await;
    let report = result?;

    assert_eq!(report.exit_code, Some(3));
    assert!(!report.signaled);
    assert_eq!(report.result, "command exited with code: 3");
    Ok(())
}

#[tokio::test]
async fn signal_death_maps_to_128_plus_signal() -> TestResult {
    init_tracing();
    for (signal, expected) in [("TERM", 143), ("KILL", 137)] {
        let (_, _, result) =
            supervise(handlers().build(), sh(&format!("kill -{signal} $$"))).await;
        let report = result?;

        assert_eq!(report.exit_code, Some(expected), "SIG{signal}");
        assert!(report.signaled, "SIG{signal}");
        assert_eq!(
            report.result,
            format!("command died with signal: {}", expected - 128)
        );
    }
    Ok(())
}

#[tokio::test]
async fn launch_failure_reaches_both_handler_classes() {
    init_tracing();
    let (supervisor, backend, result) = supervise(
        handlers().build(),
        vec!["/nonexistent/herald-job".to_string()],
    )
    .await;

    let err = result.expect_err("command cannot start");
    assert!(matches!(err, HeraldError::Launch { .. }), "got {err:?}");
    assert_eq!(supervisor.state(), Lifecycle::FailedToStart);

    let report = err.report().expect("launch failure carries its report").clone();
    assert_eq!(report.exit_code, Some(-1));
    assert!(!report.signaled);
    assert!(report.result.starts_with("failed to execute the command: "));
    assert!(report.pid.is_none());
    assert!(report.end_at.is_none());
    assert!(report.output.is_empty());

    assert_eq!(backend.reports_for("notice"), vec![report.clone()]);
    assert_eq!(backend.reports_for("report"), vec![report]);
}

#[tokio::test]
async fn empty_command_is_a_launch_failure() {
    init_tracing();
    let (supervisor, backend, result) = supervise(handlers().build(), Vec::new()).await;

    assert!(matches!(result, Err(HeraldError::Launch { .. })));
    assert_eq!(supervisor.state(), Lifecycle::FailedToStart);
    assert_eq!(backend.reports_for("report").len(), 1);
}

#[tokio::test]
async fn noticers_get_the_start_snapshot() -> TestResult {
    init_tracing();
    let (_, backend, result) =
        supervise(handlers().tag("nightly").build(), sh("echo hi; exit 4")).await;
    let report = result?;

    let noticed = backend.reports_for("notice");
    assert_eq!(noticed.len(), 1);
    let snapshot = &noticed[0];
    assert_eq!(snapshot.pid, report.pid);
    assert!(snapshot.pid.is_some());
    assert_eq!(snapshot.start_at, report.start_at);
    assert_eq!(snapshot.tag, "nightly");
    assert_eq!(snapshot.exit_code, None);
    assert!(snapshot.end_at.is_none());
    assert!(snapshot.output.is_empty());
    assert!(snapshot.result.is_empty());
    assert!(snapshot.user_time.is_none());

    assert_eq!(report.tag, "nightly");
    assert_eq!(report.exit_code, Some(4));
    Ok(())
}

#[tokio::test]
async fn no_noticers_means_no_start_dispatch() -> TestResult {
    init_tracing();
    let (_, backend, result) =
        supervise(SettingsBuilder::new().reporter("report").build(), sh("true")).await;
    result?;

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].handlers, vec!["report".to_string()]);
    Ok(())
}

#[tokio::test]
async fn failing_handlers_do_not_change_the_result() -> TestResult {
    init_tracing();
    let backend = RecordingBackend::failing(&["notice", "report"]);
    let mut supervisor = Supervisor::new(
        handlers().build(),
        Arc::new(backend.clone()),
        Streams::discard(),
    );

    let report = with_timeout(supervisor.run(&sh("echo fine"))).await?;

    assert_eq!(report.exit_code, Some(0));
    assert_eq!(report.output, "fine\n");
    assert_eq!(backend.reports_for("report").len(), 1);
    Ok(())
}

#[tokio::test]
async fn supervisor_runs_once() -> TestResult {
    init_tracing();
    let backend = RecordingBackend::new();
    let mut supervisor = Supervisor::new(
        handlers().build(),
        Arc::new(backend.clone()),
        Streams::discard(),
    );

    with_timeout(supervisor.run(&sh("true"))).await?;
    let again = with_timeout(supervisor.run(&sh("true"))).await;

    assert!(matches!(
        again,
        Err(HeraldError::AlreadyRan(Lifecycle::Completed))
    ));
    assert_eq!(backend.reports_for("report").len(), 1);
    Ok(())
}

#[tokio::test]
async fn timestamps_prefix_merged_lines_only() -> TestResult {
    init_tracing();
    let (_, _, result) = supervise(
        handlers().timestamp(true).build(),
        sh("echo first; echo second"),
    )
    .await;
    let report = result?;

    let line = Regex::new(&format!("^{TIMESTAMP_RE}(first|second)$"))?;
    let lines: Vec<&str> = report.output.lines().collect();
    assert_eq!(lines.len(), 2);
    for l in lines {
        assert!(line.is_match(l), "unexpected line {l:?}");
    }
    assert_eq!(report.stdout, "first\nsecond\n");
    Ok(())
}

#[tokio::test]
async fn log_file_receives_merged_output() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let log = dir.path().join("job-%Y.log");
    let pattern = log.to_string_lossy().into_owned();

    for word in ["one", "two"] {
        let (_, _, result) = supervise(
            handlers().log(&pattern).build(),
            sh(&format!("echo {word}")),
        )
        .await;
        result?;
    }

    let expanded = dir
        .path()
        .join(format!("job-{}.log", chrono::Local::now().format("%Y")));
    assert_eq!(std::fs::read_to_string(expanded)?, "one\ntwo\n");
    Ok(())
}

#[tokio::test]
async fn unusable_log_file_does_not_stop_the_job() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let missing = dir.path().join("no-such-dir").join("job.log");

    let (_, _, result) = supervise(
        handlers().log(&missing.to_string_lossy()).build(),
        sh("echo still here"),
    )
    .await;
    let report = result?;

    assert_eq!(report.output, "still here\n");
    assert!(!missing.exists());
    Ok(())
}

#[tokio::test]
async fn cpu_times_are_reported() -> TestResult {
    init_tracing();
    let (_, _, result) = supervise(handlers().build(), sh("i=0; while [ $i -lt 2000 ]; do i=$((i+1)); done")).await;
    let report = result?;

    let user = report.user_time.ok_or("userTime missing")?;
    let system = report.system_time.ok_or("systemTime missing")?;
    assert!(user >= 0.0);
    assert!(system >= 0.0);
    Ok(())
}

#[tokio::test]
async fn child_stdin_is_the_null_device() -> TestResult {
    init_tracing();
    // `cat` would echo the wrapper's stdin, or block on a terminal, if it
    // were passed through.
    let (_, _, result) = supervise(handlers().build(), vec!["cat".to_string()]).await;
    let report = result?;

    assert_eq!(report.exit_code, Some(0));
    assert_eq!(report.stdout, "");
    assert_eq!(report.output, "");
    Ok(())
}

#[tokio::test]
async fn timestamps_reach_the_log_file() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let log = dir.path().join("stamped.log");

    let (_, _, result) = supervise(
        handlers()
            .timestamp(true)
            .log(&log.to_string_lossy())
            .build(),
        sh("printf 'alpha\\nbeta\\n'; echo gamma >&2"),
    )
    .await;
    let report = result?;

    assert_eq!(report.stdout, "alpha\nbeta\n");
    assert_eq!(report.stderr, "gamma\n");

    let line = Regex::new(&format!("^{TIMESTAMP_RE}(alpha|beta|gamma)$"))?;
    let contents = std::fs::read_to_string(&log)?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    for l in &lines {
        assert!(line.is_match(l), "unexpected log line {l:?}");
    }
    assert_eq!(contents, report.output);
    Ok(())
}
