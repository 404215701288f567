//! CLI output integration tests.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use modelfleet::testkit::config::config_toml;
use predicates::prelude::*;

fn modelfleet() -> Command {
    let mut cmd = cargo_bin_cmd!("modelfleet");
    cmd.env_remove("MODELFLEET_API_URL")
        .env_remove("MODELFLEET_WS_URL")
        .env_remove("MODELFLEET_ORDER_PATH");
    cmd
}

fn write_config(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, body).expect("write config");
    path
}

#[test]
fn test_help() {
    modelfleet()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("hosts"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("move"));
}

#[test]
fn test_version() {
    modelfleet()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("modelfleet"));
}

#[test]
fn test_config_validate_reports_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let order = dir.path().join("order.json");
    let path = write_config(
        &dir,
        &config_toml("http://127.0.0.1:9", &order.display().to_string()),
    );

    modelfleet()
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"))
        .stdout(predicate::str::contains("http://127.0.0.1:9"));
}

#[test]
fn test_config_validate_rejects_bad_scheme() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[source]\napi_url = \"ftp://fleet.local\"\n");

    modelfleet()
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("api_url"));
}

#[test]
fn test_config_validate_rejects_unparsable_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[refresh\nconnected_interval_secs = ");

    modelfleet()
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn test_config_show_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[refresh]\nconnected_interval_secs = 45\n");

    modelfleet()
        .args(["--json", "config", "show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"command\":\"config.show\""))
        .stdout(predicate::str::contains("\"connected_interval_secs\":45"));
}

#[test]
fn test_check_passes_on_valid_config() {
    let dir = tempfile::tempdir().unwrap();
    let order = dir.path().join("order.json");
    let path = write_config(
        &dir,
        &config_toml("http://127.0.0.1:9", &order.display().to_string()),
    );

    modelfleet()
        .args(["--json", "check", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"healthy\":true"))
        .stdout(predicate::str::contains("order_store"));
}

#[test]
fn test_unknown_direction_is_a_usage_error() {
    modelfleet()
        .args(["move", "host", "h1", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sideways"));
}
