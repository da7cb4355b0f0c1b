//! Test utilities for isoenv-lib.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::interpreter::ExecutableCheck;

/// In-memory [`ExecutableCheck`] that records every path it was asked about.
#[derive(Debug, Default)]
pub struct FakeFs {
  existing: BTreeSet<PathBuf>,
  executable: BTreeSet<PathBuf>,
  exists_calls: RefCell<Vec<PathBuf>>,
  executable_calls: RefCell<Vec<PathBuf>>,
}

impl FakeFs {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a file that exists but cannot be executed.
  pub fn file(mut self, path: impl AsRef<Path>) -> Self {
    self.existing.insert(path.as_ref().to_path_buf());
    self
  }

  /// Add an executable file.
  pub fn executable(mut self, path: impl AsRef<Path>) -> Self {
    self.existing.insert(path.as_ref().to_path_buf());
    self.executable.insert(path.as_ref().to_path_buf());
    self
  }

  pub fn exists_calls(&self) -> Vec<PathBuf> {
    self.exists_calls.borrow().clone()
  }

  pub fn executable_calls(&self) -> Vec<PathBuf> {
    self.executable_calls.borrow().clone()
  }
}

impl ExecutableCheck for FakeFs {
  fn exists(&self, path: &Path) -> bool {
    self.exists_calls.borrow_mut().push(path.to_path_buf());
    self.existing.contains(path)
  }

  fn is_executable(&self, path: &Path) -> bool {
    self.executable_calls.borrow_mut().push(path.to_path_buf());
    self.executable.contains(path)
  }
}

/// Write a shell script that answers the version probe with `version`.
#[cfg(unix)]
pub fn fake_interpreter(dir: &Path, version: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join(format!("python{version}"));
  std::fs::write(&path, format!("#!/bin/sh\nprintf '%s' '{version}'\n")).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}
