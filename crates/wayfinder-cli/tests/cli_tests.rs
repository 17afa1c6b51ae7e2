use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory holding a config file
/// that points at an address nothing listens on.
fn create_cli_test_environment() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    std::fs::write(
        temp_dir.path().join("config.json"),
        r#"{"base_url": "http://127.0.0.1:9", "timeout_secs": 2, "max_retries": 0}"#,
    )
    .expect("Failed to write config");
    temp_dir
}

/// Helper function to create a Command with --no-color flag, a config file
/// and a dummy API key
fn wayfinder_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("wayfinder").expect("Failed to find wayfinder binary");
    cmd.arg("--no-color")
        .arg("--config-file")
        .arg(temp_dir.path().join("config.json"))
        .env("WAYFINDER_API_KEY", "test-key")
        .env_remove("GEMINI_API_KEY");
    cmd
}

#[test]
fn test_cli_help() {
    Command::cargo_bin("wayfinder")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("session"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_cli_missing_api_key() {
    let temp_dir = create_cli_test_environment();

    wayfinder_cmd(&temp_dir)
        .env_remove("WAYFINDER_API_KEY")
        .args(["plan", "Learn to bake bread"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to initialize assistant"))
        .stderr(predicate::str::contains("API key"));
}

#[test]
fn test_cli_empty_goal_is_rejected() {
    let temp_dir = create_cli_test_environment();

    wayfinder_cmd(&temp_dir)
        .args(["plan", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("description"));
}

#[test]
fn test_cli_unreachable_model_reports_generic_error() {
    let temp_dir = create_cli_test_environment();

    wayfinder_cmd(&temp_dir)
        .args(["plan", "Learn to bake bread"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Something went wrong"));
}

#[test]
fn test_cli_bad_config_file() {
    let temp_dir = create_cli_test_environment();
    std::fs::write(temp_dir.path().join("config.json"), "{ nope").unwrap();

    wayfinder_cmd(&temp_dir)
        .args(["plan", "Learn to bake bread"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Serialization error"));
}

#[test]
fn test_cli_invalid_language() {
    let temp_dir = create_cli_test_environment();

    wayfinder_cmd(&temp_dir)
        .args(["--language", "klingon", "plan", "Learn to bake bread"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid language"));
}

#[test]
fn test_cli_expand_requires_strategy() {
    let temp_dir = create_cli_test_environment();

    wayfinder_cmd(&temp_dir)
        .args(["plan", "Learn to bake bread", "--expand", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--strategy"));
}

#[test]
fn test_cli_session_commands() {
    let temp_dir = create_cli_test_environment();

    wayfinder_cmd(&temp_dir)
        .arg("session")
        .write_stdin("show\nlang zh\ndance\nselect 1\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Describe your goal"))
        .stdout(predicate::str::contains("Language set to Simplified Chinese"))
        .stdout(predicate::str::contains("Unknown command `dance`"))
        .stdout(predicate::str::contains("No strategy matches '1'"));
}

#[test]
fn test_cli_session_sets_goal_context() {
    let temp_dir = create_cli_test_environment();

    wayfinder_cmd(&temp_dir)
        .arg("session")
        .write_stdin("target one loaf a week\nenv small kitchen, no mixer\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("- **Target**: one loaf a week"))
        .stdout(predicate::str::contains("- **Environment**: small kitchen, no mixer"));
}

#[test]
fn test_cli_session_ends_at_end_of_input() {
    let temp_dir = create_cli_test_environment();

    wayfinder_cmd(&temp_dir)
        .write_stdin("help\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("## Commands"));
}
