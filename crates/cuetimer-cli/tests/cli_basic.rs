//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway config file and
//! verify its outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(config: &Path, args: &[&str], stdin: Option<&str>) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cuetimer"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    {
        let mut pipe = child.stdin.take().expect("stdin is piped");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("write stdin");
        }
    }

    let output = child.wait_with_output().expect("CLI did not exit");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is JSON"))
        .collect()
}

#[test]
fn test_config_show_defaults() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&dir.path().join("config.toml"), &["config", "show"], None);
    assert_eq!(code, 0, "config show failed");

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["timer"]["main_minutes"], 1);
    assert_eq!(parsed["timer"]["main_seconds"], 30);
    assert_eq!(parsed["timer"]["get_ready_seconds"], 5);
    assert_eq!(parsed["cues"]["complete_repeats"], 1);
}

#[test]
fn test_config_edit_clamps_and_persists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let (stdout, _, code) = run_cli(&path, &["config", "edit", "2", "75", "-1", "10"], None);
    assert_eq!(code, 0, "config edit failed");

    let committed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(committed["main_duration_secs"], 179);
    assert_eq!(committed["get_ready_offset_secs"], 10);

    let (stdout, _, _) = run_cli(&path, &["config", "show"], None);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["timer"]["main_minutes"], 2);
    assert_eq!(parsed["timer"]["main_seconds"], 59);
    assert_eq!(parsed["timer"]["get_ready_minutes"], 0);
}

#[test]
fn test_config_reset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    run_cli(&path, &["config", "edit", "5", "0", "0", "30"], None);
    let (stdout, _, code) = run_cli(&path, &["config", "reset"], None);
    assert_eq!(code, 0);
    assert!(stdout.contains("config reset to defaults"));

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("main_minutes = 1"));
}

#[test]
fn test_simulate_emits_cues_in_order() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(
        &dir.path().join("config.toml"),
        &["simulate", "--main", "0:04", "--get-ready", "2"],
        None,
    );
    assert_eq!(code, 0, "simulate failed");

    let events = json_lines(&stdout);
    assert_eq!(events.first().unwrap()["type"], "TimerStarted");
    assert_eq!(events.last().unwrap()["type"], "TimerCompleted");

    let cues: Vec<_> = events
        .iter()
        .filter(|e| e["type"] == "CueEmitted")
        .map(|e| (e["kind"].as_str().unwrap().to_string(), e["remaining_secs"].as_u64().unwrap()))
        .collect();
    assert_eq!(cues, vec![("get-ready".to_string(), 2), ("complete".to_string(), 0)]);
}

#[test]
fn test_simulate_zero_length_reports_complete_cue() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&dir.path().join("config.toml"), &["simulate", "--main", "0"], None);
    assert_eq!(code, 0, "simulate failed");

    let types: Vec<_> = json_lines(&stdout)
        .iter()
        .map(|e| e["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(types, vec!["TimerStarted", "CueEmitted", "TimerCompleted"]);
    assert_eq!(json_lines(&stdout)[1]["kind"], "complete");
}

#[test]
fn test_simulate_uses_stored_durations() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[timer]\nmain_minutes = 0\nmain_seconds = 3\nget_ready_seconds = 1\n\n[cues]\ncomplete_repeats = 3\n",
    )
    .unwrap();
    let (stdout, _, code) = run_cli(&path, &["simulate"], None);
    assert_eq!(code, 0, "simulate failed");

    let events = json_lines(&stdout);
    assert_eq!(events[0]["duration_secs"], 3);
    let get_ready = events
        .iter()
        .find(|e| e["type"] == "CueEmitted" && e["kind"] == "get-ready")
        .expect("get-ready cue");
    assert_eq!(get_ready["remaining_secs"], 1);
}

#[test]
fn test_simulate_rejects_bad_duration() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir.path().join("config.toml"), &["simulate", "--main", "soon"], None);
    assert_ne!(code, 0);
    assert!(stderr.contains("not a duration"));
}

#[test]
fn test_run_zero_length_completes_immediately() {
    let dir = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(
        &dir.path().join("config.toml"),
        &["run", "--main", "0"],
        Some("p\nq\n"),
    );
    assert_eq!(code, 0, "run failed: {stderr}");
    assert!(stdout.contains("complete"));
    assert!(stderr.contains("[complete]"));
}
