//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding a fake interpreter and
/// the environments created from it.
pub struct TestEnv {
  pub temp: TempDir,
  pub python: PathBuf,
}

impl TestEnv {
  /// Create a temp directory with an interpreter reporting `version`.
  #[cfg(unix)]
  pub fn with_python(version: &str) -> Self {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let bin = temp.path().join("base").join("bin");
    std::fs::create_dir_all(&bin).unwrap();

    let python = bin.join(format!("python{version}"));
    std::fs::write(&python, format!("#!/bin/sh\nprintf '%s' '{version}'\n")).unwrap();
    std::fs::set_permissions(&python, std::fs::Permissions::from_mode(0o755)).unwrap();

    Self { temp, python }
  }

  /// Root of the environment created by a test.
  pub fn env_path(&self) -> PathBuf {
    let p = self.temp.path().join("env");
    dunce::simplified(&p).to_path_buf()
  }

  /// Read a file relative to the environment root.
  pub fn read(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.env_path().join(relative_path))
      .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative_path, e))
  }

  /// Get a Command for the isoenv binary isolated from user configuration.
  pub fn isoenv_cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("isoenv");
    cmd
      .env("ISOENV_CONFIG_FILE", self.temp.path().join("isoenv.ini"))
      .env_remove("ISOENV_PYTHON")
      .env_remove("ISOENV_SYSTEM_SITE_PACKAGES")
      .env_remove("ISOENV_NO_SITE_PACKAGES")
      .env_remove("ISOENV_RELOCATABLE")
      .env_remove("RUST_LOG");
    cmd
  }

  /// `isoenv create <env> --python <fake>` with extra arguments.
  pub fn create(&self, args: &[&str]) -> assert_cmd::assert::Assert {
    self
      .isoenv_cmd()
      .arg("create")
      .arg(self.env_path())
      .arg("--python")
      .arg(&self.python)
      .args(args)
      .assert()
  }
}
