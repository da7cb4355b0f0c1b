//! Create command integration tests.

#![cfg(unix)]

use std::path::PathBuf;

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn create_installs_interpreter_and_aliases() {
  let env = TestEnv::with_python("3.11");

  env
    .create(&[])
    .success()
    .stdout(predicate::str::contains("Created environment"))
    .stdout(predicate::str::contains("3.11"));

  let bin = env.env_path().join("bin");
  assert_eq!(std::fs::read_link(bin.join("python")).unwrap(), env.python);
  assert_eq!(std::fs::read_link(bin.join("python3")).unwrap(), PathBuf::from("python"));
  assert_eq!(std::fs::read_link(bin.join("python3.11")).unwrap(), PathBuf::from("python"));
  assert!(env.env_path().join("lib/python3.11/site-packages").is_dir());
  assert!(env.env_path().join("include/python3.11").is_dir());
}

#[test]
fn create_writes_marker_and_activation_files() {
  let env = TestEnv::with_python("3.12");

  env.create(&["--prompt", "work"]).success();

  let marker = env.read("pyvenv.cfg");
  assert!(marker.contains("version = 3.12"));
  assert!(marker.contains("include-system-site-packages = false"));
  assert!(marker.contains("prompt = work"));

  assert!(env.read("bin/activate").contains("(work) "));
  assert!(env.env_path().join("bin/activate.fish").is_file());
  assert!(env.env_path().join("bin/Activate.ps1").is_file());
  assert!(env.read("bin/activate_this.py").contains("\"site-packages\""));
}

#[test]
fn explicit_flag_beats_environment() {
  let env = TestEnv::with_python("3.11");

  env
    .isoenv_cmd()
    .env("ISOENV_NO_SITE_PACKAGES", "1")
    .arg("create")
    .arg(env.env_path())
    .arg("--python")
    .arg(&env.python)
    .arg("--system-site-packages")
    .assert()
    .success();

  assert!(env.read("pyvenv.cfg").contains("include-system-site-packages = true"));
}

#[test]
fn environment_selects_interpreter() {
  let env = TestEnv::with_python("3.10");

  env
    .isoenv_cmd()
    .env("ISOENV_PYTHON", &env.python)
    .arg("create")
    .arg(env.env_path())
    .assert()
    .success();

  assert!(env.read("pyvenv.cfg").contains("version = 3.10"));
}

#[test]
fn version_request_uses_extra_search_dir() {
  let env = TestEnv::with_python("3.9");
  let search_dir = env.python.parent().unwrap().to_path_buf();

  env
    .isoenv_cmd()
    .arg("create")
    .arg(env.env_path())
    .args(["--python", "3.9", "--extra-search-dir"])
    .arg(&search_dir)
    .assert()
    .success();

  assert_eq!(
    std::fs::read_link(env.env_path().join("bin/python")).unwrap(),
    env.python
  );
}

#[test]
fn clear_removes_installed_packages() {
  let env = TestEnv::with_python("3.11");
  env.create(&[]).success();
  let installed = env.env_path().join("lib/python3.11/site-packages/pkg.py");
  std::fs::write(&installed, "").unwrap();

  env.create(&[]).success();
  assert!(installed.exists());

  env.create(&["--clear"]).success();
  assert!(!installed.exists());
}

#[test]
fn non_executable_interpreter_fails() {
  let env = TestEnv::with_python("3.11");
  let plain = env.temp.path().join("python-plain");
  std::fs::write(&plain, "").unwrap();

  env
    .isoenv_cmd()
    .arg("create")
    .arg(env.env_path())
    .arg("--python")
    .arg(&plain)
    .assert()
    .failure()
    .stderr(predicate::str::contains("not executable"));
}

#[test]
fn create_prints_activation_command_for_current_shell() {
  let env = TestEnv::with_python("3.11");
  let activate = env.env_path().join("bin").join("activate.fish");

  env
    .isoenv_cmd()
    .env("SHELL", "/usr/bin/fish")
    .arg("create")
    .arg(env.env_path())
    .arg("--python")
    .arg(&env.python)
    .assert()
    .success()
    .stdout(predicate::str::contains(format!("source '{}'", activate.display())));
}
