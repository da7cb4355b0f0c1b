//! End-to-end provisioning tests.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};

use isoenv_lib::interpreter::PythonVersion;
use isoenv_lib::platform::relpath::relative_path;
use isoenv_lib::provision::{InstallOptions, make_relocatable, provision, recorded_version};

use super::common::Sandbox;

mod planning {
  use super::*;

  #[test]
  fn version_request_finds_sandbox_interpreter() {
    let sandbox = Sandbox::new("3.11");

    let plan = sandbox.plan("3.11");

    assert_eq!(plan.interpreter.path(), sandbox.python);
    assert_eq!(plan.interpreter.version, PythonVersion::new(3, 11));
    assert_eq!(plan.executables().count(), 3);
  }
}

mod provisioning {
  use super::*;

  #[test]
  fn three_entry_points_run_the_base_interpreter() {
    let sandbox = Sandbox::new("3.11");
    let plan = sandbox.plan("3.11");

    let report = provision(&plan, &InstallOptions::default()).unwrap();

    let names: Vec<_> = report
      .executables
      .iter()
      .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
      .collect();
    assert_eq!(names, ["python", "python3", "python3.11"]);
    for exe in &report.executables {
      assert_eq!(fs::canonicalize(exe).unwrap(), fs::canonicalize(&sandbox.python).unwrap());
    }
  }

  #[test]
  fn marker_records_version() {
    let sandbox = Sandbox::new("3.12");
    let plan = sandbox.plan("3.12");

    provision(&plan, &InstallOptions::default()).unwrap();

    assert_eq!(recorded_version(&sandbox.env_root()).unwrap(), PythonVersion::new(3, 12));
  }

  #[test]
  fn lib64_points_at_lib() {
    let sandbox = Sandbox::new("3.11");
    let plan = sandbox.plan("3.11");

    provision(&plan, &InstallOptions::default()).unwrap();

    let lib64 = sandbox.env_root().join("lib64");
    assert_eq!(fs::read_link(&lib64).unwrap(), PathBuf::from("lib"));
    assert!(lib64.join("python3.11").join("site-packages").is_dir());
  }
}

mod relocation {
  use super::*;

  fn script(root: &Path, body: &str) -> PathBuf {
    let path = root.join("bin").join("tool");
    let shebang = format!("#!{}", root.join("bin").join("python3.11").display());
    fs::write(&path, format!("{shebang}\n{body}")).unwrap();
    path
  }

  #[test]
  fn moved_environment_keeps_relative_paths() {
    let sandbox = Sandbox::new("3.11");
    let plan = sandbox.plan("3.11");
    provision(&plan, &InstallOptions::default()).unwrap();
    script(&sandbox.env_root(), "import tool\n");
    let src = sandbox.env_root().join("src");
    fs::create_dir_all(&src).unwrap();
    let pth = plan.layout.site_packages.join("dev.pth");
    fs::write(&pth, format!("{}\n", src.display())).unwrap();

    let report = make_relocatable(&plan.layout, plan.interpreter.version).unwrap();
    assert_eq!(report.patched.len(), 1);
    assert_eq!(report.links, vec![pth.clone()]);

    let moved = sandbox.temp.path().join("moved");
    fs::rename(sandbox.env_root(), &moved).unwrap();

    let moved_pth = moved.join("lib/python3.11/site-packages/dev.pth");
    let entry = fs::read_to_string(&moved_pth).unwrap();
    let resolved = moved_pth.parent().unwrap().join(entry.trim());
    assert_eq!(
      relative_path(&moved.join("src"), &resolved).unwrap(),
      PathBuf::from(".")
    );
    let tool = fs::read_to_string(moved.join("bin/tool")).unwrap();
    assert!(tool.starts_with("#!/usr/bin/env python3.11\n"));
  }

  #[test]
  fn helper_stays_valid_after_move() {
    let sandbox = Sandbox::new("3.11");
    let plan = sandbox.plan("3.11");
    let report = provision(&plan, &InstallOptions::default()).unwrap();

    let before = fs::read_to_string(&report.helper).unwrap();
    let moved = sandbox.temp.path().join("moved");
    fs::rename(sandbox.env_root(), &moved).unwrap();
    let after = fs::read_to_string(moved.join("bin").join("activate_this.py")).unwrap();

    assert_eq!(before, after);
    assert!(!after.contains(&sandbox.env_root().display().to_string()));
  }
}
