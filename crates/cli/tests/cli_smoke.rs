//! CLI smoke tests for isoenv.
//!
//! These tests verify that all CLI commands run without panicking and
//! return appropriate exit codes.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the isoenv binary with no user configuration.
fn isoenv_cmd(temp: &TempDir) -> Command {
  let mut cmd = cargo_bin_cmd!("isoenv");
  cmd
    .env("ISOENV_CONFIG_FILE", temp.path().join("missing.ini"))
    .env_remove("ISOENV_PYTHON")
    .env_remove("ISOENV_SYSTEM_SITE_PACKAGES")
    .env_remove("ISOENV_NO_SITE_PACKAGES")
    .env_remove("RUST_LOG");
  cmd
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  let temp = TempDir::new().unwrap();
  isoenv_cmd(&temp)
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  let temp = TempDir::new().unwrap();
  isoenv_cmd(&temp)
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("isoenv"));
}

#[test]
fn subcommand_help_works() {
  let temp = TempDir::new().unwrap();
  for cmd in &["create", "relocate", "info"] {
    isoenv_cmd(&temp)
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

#[test]
fn site_packages_flags_conflict() {
  let temp = TempDir::new().unwrap();
  isoenv_cmd(&temp)
    .args(["create", "env", "--system-site-packages", "--no-site-packages"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("cannot be used with"));
}

// =============================================================================
// Info
// =============================================================================

#[test]
fn info_shows_platform_and_settings() {
  let temp = TempDir::new().unwrap();
  isoenv_cmd(&temp)
    .arg("info")
    .assert()
    .success()
    .stdout(predicate::str::contains("Platform"))
    .stdout(predicate::str::contains("system_site_packages"));
}

#[test]
fn info_json_is_valid() {
  let temp = TempDir::new().unwrap();
  let output = isoenv_cmd(&temp).args(["info", "--format", "json"]).output().unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["settings"]["system_site_packages"], false);
  assert_eq!(json["settings"]["clear"], false);
}

#[test]
fn info_reflects_inverted_env_flag() {
  let temp = TempDir::new().unwrap();
  let config = temp.path().join("isoenv.ini");
  std::fs::write(&config, "[isoenv]\nsystem-site-packages = true\n").unwrap();

  let output = isoenv_cmd(&temp)
    .env("ISOENV_CONFIG_FILE", &config)
    .env("ISOENV_NO_SITE_PACKAGES", "yes")
    .args(["info", "--format", "json"])
    .output()
    .unwrap();

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["settings"]["system_site_packages"], false);
}

#[test]
fn info_reads_config_file() {
  let temp = TempDir::new().unwrap();
  let config = temp.path().join("isoenv.ini");
  std::fs::write(&config, "[isoenv]\nprompt = work\nclear = on\n").unwrap();

  let output = isoenv_cmd(&temp)
    .env("ISOENV_CONFIG_FILE", &config)
    .args(["info", "--format", "json"])
    .output()
    .unwrap();

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["settings"]["prompt"], "work");
  assert_eq!(json["settings"]["clear"], true);
}

#[test]
fn malformed_config_file_fails() {
  let temp = TempDir::new().unwrap();
  let config = temp.path().join("isoenv.ini");
  std::fs::write(&config, "[isoenv\nprompt = work\n").unwrap();

  isoenv_cmd(&temp)
    .env("ISOENV_CONFIG_FILE", &config)
    .arg("info")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load config file"));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn create_with_missing_interpreter_fails() {
  let temp = TempDir::new().unwrap();
  let missing = temp.path().join("nowhere").join("python");

  isoenv_cmd(&temp)
    .arg("create")
    .arg(temp.path().join("env"))
    .arg("--python")
    .arg(&missing)
    .assert()
    .failure()
    .stderr(predicate::str::contains("interpreter not found"));

  assert!(!temp.path().join("env").exists());
}

#[test]
fn relocate_requires_an_environment() {
  let temp = TempDir::new().unwrap();

  isoenv_cmd(&temp)
    .arg("relocate")
    .arg(temp.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("is not an environment"));
}
