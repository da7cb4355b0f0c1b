//! Shared helpers for library integration tests.

use std::path::PathBuf;

use isoenv_lib::interpreter::{CommandProbe, InterpreterResolver};
use isoenv_lib::layout::{LayoutPlanner, ProvisionPlan};
use isoenv_lib::platform::Platform;
use isoenv_lib::platform::arch::Arch;
use isoenv_lib::platform::os::Os;
use tempfile::TempDir;

pub const LINUX: Platform = Platform {
  arch: Arch::X86_64,
  os: Os::Linux,
};

/// Temp directory holding a fake interpreter under `base/bin`.
pub struct Sandbox {
  pub temp: TempDir,
  pub python: PathBuf,
}

impl Sandbox {
  #[cfg(unix)]
  pub fn new(version: &str) -> Self {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let bin = temp.path().join("base").join("bin");
    std::fs::create_dir_all(&bin).unwrap();

    let python = bin.join(format!("python{version}"));
    std::fs::write(&python, format!("#!/bin/sh\nprintf '%s' '{version}'\n")).unwrap();
    std::fs::set_permissions(&python, std::fs::Permissions::from_mode(0o755)).unwrap();

    Self { temp, python }
  }

  pub fn env_root(&self) -> PathBuf {
    self.temp.path().join("env")
  }

  /// Plan an environment for `requested`, searching only the sandbox.
  pub fn plan(&self, requested: &str) -> ProvisionPlan {
    let search_dir = self.python.parent().unwrap().to_path_buf();
    let resolver = InterpreterResolver::from_env(&[search_dir]);
    LayoutPlanner::new(&resolver, &CommandProbe, LINUX)
      .plan(&self.env_root(), requested)
      .unwrap()
  }
}
