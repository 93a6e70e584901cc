// tests/report_json.rs

use std::error::Error;
use std::time::Duration;

use chrono::Local;
use serde_json::Value;

use herald::exec::ExitState;
use herald::report::{Report, hostname};

type TestResult = Result<(), Box<dyn Error>>;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn command_is_requoted_for_the_shell() {
    let report = Report::new(&args(&["echo", "a b", "it's"]), "", String::new());
    assert_eq!(report.command, r#"echo 'a b' 'it'\''s'"#);
    assert_eq!(report.command_args, args(&["echo", "a b", "it's"]));
}

#[test]
fn started_report_omits_unresolved_fields() -> TestResult {
    let mut report = Report::new(&args(&["true"]), "", "host-a".into());
    report.pid = Some(4242);
    report.start_at = Some(Local::now());

    let json: Value = serde_json::from_slice(&report.to_json()?)?;
    let obj = json.as_object().ok_or("report is an object")?;

    for absent in ["tag", "exitCode", "endAt", "userTime", "systemTime"] {
        assert!(!obj.contains_key(absent), "{absent} should be omitted");
    }
    for present in [
        "command", "commandArgs", "output", "stdout", "stderr", "signaled", "result",
        "hostname", "pid", "startAt",
    ] {
        assert!(obj.contains_key(present), "{present} should be present");
    }
    assert_eq!(obj["pid"], 4242);
    assert_eq!(obj["output"], "");
    Ok(())
}

#[test]
fn finished_report_uses_camel_case_names() -> TestResult {
    let mut report = Report::new(&args(&["sh", "-c", "exit 3"]), "nightly", "host-a".into());
    report.record_exit(ExitState { code: 3, signaled: false });
    report.user_time = Some(0.25);
    report.system_time = Some(0.125);
    report.start_at = Some(Local::now());
    report.end_at = report.start_at;

    let json: Value = serde_json::from_slice(&report.to_json()?)?;
    assert_eq!(json["tag"], "nightly");
    assert_eq!(json["exitCode"], 3);
    assert_eq!(json["signaled"], false);
    assert_eq!(json["result"], "command exited with code: 3");
    assert_eq!(json["userTime"], 0.25);
    assert_eq!(json["systemTime"], 0.125);
    assert!(json["endAt"].is_string());
    Ok(())
}

#[test]
fn json_round_trip_preserves_every_field() -> TestResult {
    let mut report = Report::new(&args(&["job", "--flag"]), "tag-1", "host-b".into());
    report.pid = Some(7);
    report.start_at = Some(Local::now());
    report.end_at = Some(Local::now());
    report.stdout = "out\n".into();
    report.stderr = "err\n".into();
    report.output = "out\nerr\n".into();
    report.record_exit(ExitState { code: 143, signaled: true });
    report.user_time = Some(0.001_234);
    report.system_time = Some(1.5);

    let decoded = Report::from_json(&report.to_json()?)?;
    assert_eq!(decoded, report);
    assert_eq!(decoded.result, "command died with signal: 15");
    Ok(())
}

#[test]
fn launch_failure_report_carries_the_reason() {
    let mut report = Report::new(&args(&["missing"]), "", String::new());
    report.record_launch_failure("No such file or directory (os error 2)");

    assert_eq!(report.exit_code, Some(-1));
    assert!(!report.signaled);
    assert_eq!(
        report.result,
        "failed to execute the command: No such file or directory (os error 2)"
    );
}

#[cfg(unix)]
#[test]
fn hostname_is_reported() {
    assert!(!hostname().is_empty());
}

#[test]
fn cpu_times_round_trip_exactly() -> TestResult {
    let mut report = Report::new(&args(&["busy"]), "", "host-c".into());
    report.user_time = Some(Duration::from_micros(1_003_691).as_secs_f64());
    report.system_time = Some(Duration::from_micros(2_718_281).as_secs_f64());

    let decoded = Report::from_json(&report.to_json()?)?;
    assert_eq!(decoded.user_time, report.user_time);
    assert_eq!(decoded.system_time, report.system_time);
    Ok(())
}

#[test]
fn every_microsecond_value_survives_json() -> TestResult {
    for micros in (0..3_000_000u64).step_by(13) {
        let mut report = Report::default();
        report.user_time = Some(Duration::from_micros(micros).as_secs_f64());
        let decoded = Report::from_json(&report.to_json()?)?;
        assert_eq!(decoded.user_time, report.user_time, "{micros}us");
    }
    Ok(())
}
