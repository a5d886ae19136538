use serde_json::Value;
use std::ffi::OsStr;
use std::process::{Command, Output};

fn run_strata<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_strata");
    Command::new(bin)
        .args(args)
        .output()
        .expect("strata command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not valid JSON: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn neutral_run_settles_at_the_start_layer() {
    let output = run_strata(["run", "2", "3", "--decide", "neutral"]);
    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Settled at: Layer3"), "stdout:\n{stdout}");
    assert!(stdout.contains("Via fallback: no"), "stdout:\n{stdout}");
}

#[test]
fn error_run_exits_nonzero() {
    let output = run_strata(["run", "2", "3", "--decide", "error"]);
    assert_failure(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("assertion failed at Layer3"),
        "stdout:\n{stdout}"
    );
}

#[test]
fn json_output_reports_the_settlement() {
    let output = run_strata(["run", "2", "3", "--decide", "neutral", "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);

    assert_eq!(payload["result"], "settled");
    assert_eq!(payload["startLayer"], 3);
    assert_eq!(payload["settlement"]["layer"], "l3");
    assert_eq!(payload["settlement"]["viaFallback"], false);
    assert_eq!(payload["error"], Value::Null);
    assert_eq!(payload["operations"].as_array().unwrap().len(), 1);
    assert!(payload["warnings"].as_array().unwrap().is_empty());
}

#[test]
fn json_output_records_the_top_rim_fallback() {
    let output = run_strata(["run", "--decide", "up", "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);

    assert_eq!(payload["result"], "settled");
    assert_eq!(payload["settlement"]["layer"], "l0");
    assert_eq!(payload["settlement"]["viaFallback"], true);
    let warnings = payload["warnings"].as_array().unwrap();
    assert!(!warnings.is_empty());
    assert_eq!(warnings[0]["severity"], "warning");
}

#[test]
fn json_failure_still_prints_a_payload() {
    let output = run_strata(["run", "--decide", "error", "--json"]);
    assert_failure(&output);
    let payload = parse_json_stdout(&output);

    assert_eq!(payload["result"], "failed");
    assert_eq!(payload["settlement"], Value::Null);
    assert_eq!(payload["error"], "assertion failed at Layer3");
    assert!(payload["operations"].as_array().unwrap().is_empty());
}

#[test]
fn seeded_runs_are_reproducible_across_processes() {
    let first = run_strata(["run", "--seed", "99", "--json"]);
    let second = run_strata(["run", "--seed", "99", "--json"]);
    assert_eq!(first.stdout, second.stdout);
    assert_eq!(first.status.code(), second.status.code());
}

#[test]
fn out_of_range_start_layer_is_rejected() {
    let output = run_strata(["run", "--start-layer", "9"]);
    assert_failure(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("out of range"), "stderr:\n{stderr}");
}

#[test]
fn unknown_direction_is_rejected() {
    let output = run_strata(["run", "--decide", "sideways"]);
    assert_failure(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unknown lattice direction"),
        "stderr:\n{stderr}"
    );
}
