//! CLI integration tests for banker-cli
//!
//! Runs the built binary against matrix files in a temp directory.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;

const MAX: &str = "7 5 3\n3 2 2\n9 0 2\n2 2 2\n4 3 3\n";
const ALLOCATION: &str = "0 1 0\n2 0 0\n3 0 2\n2 1 1\n0 0 2\n";

/// Temp directory holding max.txt, allocation.txt and a config path
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("max.txt"), MAX).unwrap();
        std::fs::write(dir.path().join("allocation.txt"), ALLOCATION).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn base_args(&self) -> Vec<String> {
        vec![
            "--config".into(),
            self.path("config.toml").display().to_string(),
            "--max".into(),
            self.path("max.txt").display().to_string(),
            "--allocation".into(),
            self.path("allocation.txt").display().to_string(),
        ]
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_banker"));
        cmd.args(self.base_args())
            .args(args)
            .current_dir(self.dir.path())
            .env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> std::process::Output {
        self.command(args)
            .output()
            .expect("Failed to execute command")
    }
}

/// Helper to run the CLI with arguments only
fn run_banker(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_banker"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

// ==================== Help & Version Tests ====================

#[test]
fn test_cli_help() {
    let output = run_banker(&["--help"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("banker"));
    assert!(stdout.contains("status"));
    assert!(stdout.contains("check"));
    assert!(stdout.contains("enumerate"));
    assert!(stdout.contains("request"));
    assert!(stdout.contains("interactive"));
}

#[test]
fn test_cli_version() {
    let output = run_banker(&["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("banker"));
}

#[test]
fn test_cli_request_help() {
    let output = run_banker(&["request", "--help"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("PID"));
    assert!(stdout.contains("UNITS"));
}

// ==================== State Command Tests ====================

#[test]
fn test_status() {
    let fixture = Fixture::new();
    let output = fixture.run(&["status"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("processes: 5"));
    assert!(stdout.contains("resources: 3"));
    assert!(stdout.contains("Available"));
}

#[test]
fn test_status_json() {
    let fixture = Fixture::new();
    let output = fixture.run(&["--json", "status"]);
    assert!(output.status.success());
    let value = json(&output);
    assert_eq!(value["processes"], 5);
    assert_eq!(value["state"]["available"], serde_json::json!([3, 3, 2]));
    assert_eq!(value["state"]["need"][0], serde_json::json!([7, 4, 3]));
}

#[test]
fn test_check() {
    let fixture = Fixture::new();
    let output = fixture.run(&["check"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Safe sequence exists: P1 -> P3 -> P4 -> P0 -> P2"));
}

#[test]
fn test_check_unsafe_total() {
    // Available = [1, 3, 2]: P1, P3 and P4 finish, then P0 and P2 stall
    let fixture = Fixture::new();
    let output = fixture.run(&["--total", "8,5,7", "--json", "check"]);
    assert!(output.status.success());
    let value = json(&output);
    assert_eq!(value["safe"], false);
}

#[test]
fn test_enumerate() {
    let fixture = Fixture::new();
    let output = fixture.run(&["enumerate"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("The number of all safe sequences is 16"));
    assert!(stdout.contains("P1 -> P3 -> P0 -> P2 -> P4"));
    assert!(stdout.contains("P3 -> P4 -> P1 -> P2 -> P0"));
}

#[test]
fn test_enumerate_limit_json() {
    let fixture = Fixture::new();
    let output = fixture.run(&["--json", "enumerate", "--limit", "3"]);
    assert!(output.status.success());
    let value = json(&output);
    assert_eq!(value["count"], 16);
    assert_eq!(value["sequences"].as_array().unwrap().len(), 3);
}

#[test]
fn test_enumerate_limit_from_config() {
    let fixture = Fixture::new();
    std::fs::write(fixture.path("config.toml"), "enumerate_limit = 2\n").unwrap();

    let output = fixture.run(&["enumerate"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("... 14 more"));
}

// ==================== Request Tests ====================

#[test]
fn test_request_granted() {
    let fixture = Fixture::new();
    let output = fixture.run(&["--json", "request", "1", "1", "0", "2"]);
    assert!(output.status.success());
    let value = json(&output);
    assert_eq!(value["outcome"], "granted");
    assert_eq!(value["state"]["available"], serde_json::json!([2, 3, 0]));
}

#[test]
fn test_request_rejections() {
    let fixture = Fixture::new();

    let value = json(&fixture.run(&["--json", "request", "1", "2", "0", "0"]));
    assert_eq!(value["outcome"], "rejected_exceeds_need");

    let value = json(&fixture.run(&["--json", "request", "0", "0", "4", "0"]));
    assert_eq!(value["outcome"], "rejected_exceeds_available");

    let value = json(&fixture.run(&["--json", "request", "4", "3", "3", "0"]));
    assert_eq!(value["outcome"], "rejected_unsafe");

    let value = json(&fixture.run(&["--json", "request", "7", "0", "0", "0"]));
    assert_eq!(value["outcome"], "rejected_invalid_id");

    let value = json(&fixture.run(&["--json", "request", "1", "1", "0"]));
    assert_eq!(value["outcome"], "rejected_malformed");
    assert_eq!(value["state"]["available"], serde_json::json!([3, 3, 2]));
}

#[test]
fn test_request_completes_process() {
    let fixture = Fixture::new();
    let output = fixture.run(&["request", "3", "0", "1", "1"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("P3 is completed and released [2, 2, 2]"));
}

// ==================== Interactive Tests ====================

#[test]
fn test_interactive_session() {
    let fixture = Fixture::new();
    let mut child = fixture
        .command(&["interactive"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"1 1 1 0 2\n1 0 0 2 0\n3\n0\n")
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("Banker Algorithm Simulation"));
    assert!(stdout.contains("Safe, allocated [1, 0, 2] to P1"));
    assert!(stdout.contains("Rejected"));
    assert!(stdout.contains("The number of all safe sequences is 8"));
}

// ==================== Error Tests ====================

#[test]
fn test_missing_matrix_file() {
    let fixture = Fixture::new();
    let output = fixture.run(&["--max", "absent.txt", "status"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error"));
}

#[test]
fn test_malformed_matrix_json_error() {
    let fixture = Fixture::new();
    std::fs::write(fixture.path("bad.txt"), "1 2 x\n").unwrap();
    let output = fixture.run(&["--json", "--allocation", "bad.txt", "status"]);
    assert_eq!(output.status.code(), Some(1));
    let value = json(&output);
    assert_eq!(value["success"], false);
    assert!(value["error"].as_str().unwrap().contains("line 1"));
}

#[test]
fn test_allocation_over_total() {
    let fixture = Fixture::new();
    let output = fixture.run(&["--total", "6,5,7", "status"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid state"));
}

// ==================== Config Tests ====================

#[test]
fn test_config_show_defaults() {
    let fixture = Fixture::new();
    let output = fixture.run(&["--json", "config", "--show"]);
    assert!(output.status.success());
    let value = json(&output);
    assert_eq!(value["total"], serde_json::json!([10, 5, 7]));
}

#[test]
fn test_config_set_total() {
    let fixture = Fixture::new();
    let output = fixture.run(&["config", "--set-total", "6,4"]);
    assert!(output.status.success());

    let saved = std::fs::read_to_string(fixture.path("config.toml")).unwrap();
    let value: toml::Value = toml::from_str(&saved).unwrap();
    assert_eq!(value["total"], toml::Value::Array(vec![6.into(), 4.into()]));

    // The saved total is picked up by later runs
    let output = fixture.run(&["--json", "config", "--show"]);
    assert_eq!(json(&output)["total"], serde_json::json!([6, 4]));
}
