use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs::write;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("transcoder-preset").expect("Binary exists");
    cmd.env("RUST_LOG", "off");
    cmd
}

#[test]
fn help_lists_subcommands() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("apply").and(predicate::str::contains("preset")));
}

#[test]
fn unknown_container_is_rejected_by_argument_parsing() {
    bin()
        .args(["preset", "--name", "sd_300", "--container", "avi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("avi"));
}

#[test]
fn present_without_container_fails_before_contacting_service() {
    bin()
        .args(["preset", "--name", "sd_300"])
        .env_remove("AWS_ACCESS_KEY_ID")
        .assert()
        .failure()
        .stdout(
            predicate::str::contains("\"failed\":true")
                .and(predicate::str::contains("Missing required argument: container")),
        );
}

#[test]
fn apply_with_missing_task_file_reports_failure_json() {
    bin()
        .args(["apply", "--config", "/nonexistent/task.yaml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed to read config file"));
}

/// End to end against a local stand-in for the service: deleting a preset
/// that does not exist succeeds without changes.
#[tokio::test(flavor = "multi_thread")]
async fn absent_ghost_reports_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2012-09-25/presets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Presets": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let task = NamedTempFile::new().expect("temp task file");
    write(
        task.path(),
        format!(
            "preset:\n  name: ghost\n  state: absent\nconnection:\n  region: us-east-1\n  endpoint: \"{}\"\n",
            server.uri()
        ),
    )
    .unwrap();

    let output = bin()
        .args(["apply", "--config"])
        .arg(task.path())
        .env("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE")
        .env("AWS_SECRET_ACCESS_KEY", "secret")
        .output()
        .expect("binary runs");

    assert!(output.status.success(), "stdout: {}", String::from_utf8_lossy(&output.stdout));
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON result");
    assert_eq!(result["name"], "ghost");
    assert_eq!(result["changed"], false);
    assert_eq!(result["msg"], "Preset not found");
}
