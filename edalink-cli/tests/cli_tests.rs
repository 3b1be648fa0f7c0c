//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/// Build command for the edalink-cli binary with a clean connector environment.
fn edalink_cli() -> Command {
    let mut cmd = cargo_bin_cmd!("edalink-cli");
    cmd.env_remove("EDALINK_MODE")
        .env_remove("EDALINK_API_TOKEN")
        .env_remove("EDALINK_BASE_URL")
        .env_remove("EDALINK_SEED")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = edalink_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("PCB"));
}

#[test]
fn test_cli_version() {
    let mut cmd = edalink_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_projects_json_envelope() {
    let mut cmd = edalink_cli();

    cmd.args(["projects", "--format", "json"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"success\": true"))
        .stdout(predicate::str::contains("Smart Sensor Hub"));
}

#[test]
fn test_cli_projects_status_filter() {
    let mut cmd = edalink_cli();

    cmd.args(["projects", "--status", "draft"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Motor Controller"))
        .stdout(predicate::str::contains("Smart Sensor Hub").not());
}

#[test]
fn test_cli_invalid_status_rejected() {
    let mut cmd = edalink_cli();

    cmd.args(["projects", "--status", "shipped"]);
    cmd.assert().failure();
}

#[test]
fn test_cli_board_not_found() {
    let mut cmd = edalink_cli();

    cmd.args(["board", "BRD999", "--format", "json"]);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("NOT_FOUND"))
        .stdout(predicate::str::contains("\"success\": false"));
}

#[test]
fn test_cli_components_bottom_layer() {
    let mut cmd = edalink_cli();

    cmd.args(["components", "BRD001", "--layer", "bottom"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("C2"))
        .stdout(predicate::str::contains("(1 of 1)"));
}

#[test]
fn test_cli_drc_reports_violations() {
    let mut cmd = edalink_cli();

    cmd.args(["drc", "BRD001"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("Clearance"));
}

#[test]
fn test_cli_route_completes_board() {
    let mut cmd = edalink_cli();

    cmd.args(["route", "BRD001", "--seed", "3"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("100% complete"));
}

#[test]
fn test_cli_health_fail_on_errors() {
    let mut cmd = edalink_cli();

    cmd.args(["health", "BRD001", "--seed", "1", "--fail-on-errors"]);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("Recommendations"));
}

#[test]
fn test_cli_export_grouped_bom() {
    let mut cmd = edalink_cli();

    cmd.args(["export", "BRD001", "--group-by-value", "--units", "inch", "--seed", "9"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("RS-274X, inch"))
        .stdout(predicate::str::contains("C1, C2"));
}

#[test]
fn test_cli_live_mode_requires_token() {
    let mut cmd = edalink_cli();

    cmd.args(["projects", "--mode", "live", "--format", "json"]);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("AUTH_REQUIRED"));
}

#[test]
fn test_cli_status_reports_live_stub() {
    let mut cmd = edalink_cli();

    cmd.args(["status", "--mode", "live"]).env("EDALINK_API_TOKEN", "secret");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Healthy:     false"))
        .stdout(predicate::str::contains("Initialized: true"));
}

#[test]
fn test_cli_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "mode": "mock", "seedDemoData": false }}"#).unwrap();

    let mut cmd = edalink_cli();
    cmd.args(["projects", "--config"]).arg(file.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(0 of 0)"));
}

#[test]
fn test_cli_malformed_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();

    let mut cmd = edalink_cli();
    cmd.args(["status", "--config"]).arg(file.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}
