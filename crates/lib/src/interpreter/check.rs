use std::path::Path;

/// Strategy deciding whether a candidate interpreter can be used.
pub trait ExecutableCheck {
  /// Whether anything exists at `path`.
  fn exists(&self, path: &Path) -> bool;

  /// Whether `path` is a regular file the current user may execute.
  fn is_executable(&self, path: &Path) -> bool;
}

impl<T: ExecutableCheck + ?Sized> ExecutableCheck for &T {
  fn exists(&self, path: &Path) -> bool {
    (**self).exists(path)
  }

  fn is_executable(&self, path: &Path) -> bool {
    (**self).is_executable(path)
  }
}

/// Checks against the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCheck;

impl ExecutableCheck for FsCheck {
  fn exists(&self, path: &Path) -> bool {
    path.exists()
  }

  fn is_executable(&self, path: &Path) -> bool {
    match std::fs::metadata(path) {
      Ok(metadata) => metadata.is_file() && has_exec_access(path),
      Err(_) => false,
    }
  }
}

#[cfg(unix)]
fn has_exec_access(path: &Path) -> bool {
  use rustix::fs::{Access, access};

  access(path, Access::EXEC_OK).is_ok()
}

#[cfg(windows)]
fn has_exec_access(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "exe" | "bat" | "cmd" | "com"))
    .unwrap_or(false)
}
