/*
[INPUT]:  devflow binary run against the in-memory demo backend
[OUTPUT]: Process-level checks of the one-shot subcommands
[POS]:    Integration test layer - CLI surface
[UPDATE]: When subcommands or their output change
*/

use std::process::{Command, Output};

fn devflow(args: &[&str]) -> Output {
    let binary_path = env!("CARGO_BIN_EXE_devflow");
    let config_path = format!("{}/demos/memory.yaml", env!("CARGO_MANIFEST_DIR"));

    Command::new(binary_path)
        .arg("--config")
        .arg(config_path)
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .expect("failed to start devflow binary")
}

fn assert_success(output: &Output) -> String {
    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStdout: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn list_prints_demo_tasks_newest_first() {
    let stdout = assert_success(&devflow(&["list"]));

    let plan = stdout.find("Plan the week").expect("newest task listed");
    let backups = stdout.find("Set up backups").expect("oldest task listed");
    assert!(plan < backups);
}

#[test]
fn list_filter_hides_other_statuses() {
    let stdout = assert_success(&devflow(&["list", "--filter", "completed"]));

    assert!(stdout.contains("Set up backups"));
    assert!(!stdout.contains("Plan the week"));
}

#[test]
fn stats_summarise_the_demo_board() {
    let stdout = assert_success(&devflow(&["stats"]));

    assert!(stdout.contains("Total:      5"));
    assert!(stdout.contains("Completion: 40%"));
}

#[test]
fn add_reports_the_created_task() {
    let stdout = assert_success(&devflow(&[
        "add",
        "--title",
        "Write report",
        "--priority",
        "high",
        "--tag",
        "work",
    ]));

    assert!(stdout.contains("Created"));
    assert!(stdout.contains("Write report"));
}

#[test]
fn unknown_task_id_fails() {
    let output = devflow(&["toggle", "does-not-exist"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no task with id"));
}

#[test]
fn blank_title_is_rejected() {
    let output = devflow(&["add", "--title", "   "]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("title must not be empty"));
}

#[test]
fn missing_config_file_is_an_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_devflow"))
        .args(["--config", "/nonexistent/devflow.yaml", "list"])
        .output()
        .expect("failed to start devflow binary");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}
