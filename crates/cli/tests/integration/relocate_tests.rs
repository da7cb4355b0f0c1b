//! Relocate command integration tests.

#![cfg(unix)]

use predicates::prelude::*;

use super::common::TestEnv;

fn write_tool(env: &TestEnv) {
  let shebang = format!("#!{}", env.env_path().join("bin/python").display());
  std::fs::write(
    env.env_path().join("bin/tool"),
    format!("{shebang}\nfrom __future__ import annotations\nimport tool\n"),
  )
  .unwrap();
}

#[test]
fn relocate_patches_scripts() {
  let env = TestEnv::with_python("3.11");
  env.create(&[]).success();
  write_tool(&env);

  env
    .isoenv_cmd()
    .arg("relocate")
    .arg(env.env_path())
    .assert()
    .success()
    .stdout(predicate::str::contains("Scripts patched: 1"));

  let tool = env.read("bin/tool");
  let lines: Vec<&str> = tool.lines().collect();
  assert_eq!(lines[0], "#!/usr/bin/env python3.11");
  assert_eq!(lines[1], "from __future__ import annotations");
  assert_eq!(lines[2], "");
  assert!(lines[3].contains("activate_this.py"));
  assert_eq!(lines[5], "import tool");
}

#[test]
fn relocate_twice_is_a_no_op() {
  let env = TestEnv::with_python("3.11");
  env.create(&[]).success();
  write_tool(&env);

  env.isoenv_cmd().arg("relocate").arg(env.env_path()).assert().success();
  let once = env.read("bin/tool");

  env
    .isoenv_cmd()
    .arg("relocate")
    .arg(env.env_path())
    .assert()
    .success()
    .stdout(predicate::str::contains("already relocatable"));
  assert_eq!(env.read("bin/tool"), once);
}

#[test]
fn create_relocatable_rewrites_path_files() {
  let env = TestEnv::with_python("3.11");
  env.create(&[]).success();
  let src = env.env_path().join("src");
  std::fs::create_dir_all(&src).unwrap();
  std::fs::write(
    env.env_path().join("lib/python3.11/site-packages/project.pth"),
    format!("{}\n", src.display()),
  )
  .unwrap();

  env.create(&["--relocatable"]).success();

  assert_eq!(env.read("lib/python3.11/site-packages/project.pth"), "../../../src\n");
}
