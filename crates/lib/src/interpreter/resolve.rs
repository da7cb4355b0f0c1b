use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ExecutableCheck, FsCheck, InterpreterError, InterpreterSpec};

/// Interpreter used when none is requested.
pub fn default_interpreter_name() -> &'static str {
  if cfg!(windows) { "python" } else { "python3" }
}

/// Resolves interpreter names and paths to validated executables.
#[derive(Debug, Clone)]
pub struct InterpreterResolver<C = FsCheck> {
  check: C,
  search_dirs: Vec<PathBuf>,
}

impl InterpreterResolver<FsCheck> {
  /// Resolver over the real filesystem.
  ///
  /// Bare names are looked up in `extra_dirs` first, then in every directory
  /// of `PATH`.
  pub fn from_env(extra_dirs: &[PathBuf]) -> Self {
    let mut search_dirs = extra_dirs.to_vec();
    if let Some(path) = std::env::var_os("PATH") {
      search_dirs.extend(std::env::split_paths(&path));
    }
    Self::new(FsCheck, search_dirs)
  }
}

impl<C: ExecutableCheck> InterpreterResolver<C> {
  pub fn new(check: C, search_dirs: Vec<PathBuf>) -> Self {
    Self { check, search_dirs }
  }

  pub fn search_dirs(&self) -> &[PathBuf] {
    &self.search_dirs
  }

  /// Resolve `requested` to an executable interpreter.
  ///
  /// - Absolute paths must exist and be executable, and are returned unchanged.
  /// - Relative paths with a directory part are made absolute first.
  /// - Bare names are searched across the search directories. A version such
  ///   as `3.11` is looked up as `python3.11`.
  ///
  /// # Errors
  ///
  /// [`InterpreterError::NotFound`] and [`InterpreterError::NotExecutable`]
  /// name the path that failed; [`InterpreterError::NotOnSearchPath`] is
  /// returned when no search directory holds a usable candidate.
  pub fn resolve(&self, requested: &str) -> Result<InterpreterSpec, InterpreterError> {
    let path = Path::new(requested);

    if path.is_absolute() {
      return self.validate(requested, path.to_path_buf());
    }

    if path.components().count() > 1 {
      let absolute = std::path::absolute(path).map_err(|source| InterpreterError::Absolute {
        path: path.to_path_buf(),
        source,
      })?;
      return self.validate(requested, absolute);
    }

    self.search(requested)
  }

  fn validate(&self, requested: &str, path: PathBuf) -> Result<InterpreterSpec, InterpreterError> {
    debug!(path = %path.display(), "validating interpreter");

    if !self.check.exists(&path) {
      return Err(InterpreterError::NotFound { path });
    }
    if !self.check.is_executable(&path) {
      return Err(InterpreterError::NotExecutable { path });
    }

    Ok(InterpreterSpec {
      requested: requested.to_string(),
      path,
    })
  }

  fn search(&self, name: &str) -> Result<InterpreterSpec, InterpreterError> {
    let candidates = candidate_names(name);

    for dir in &self.search_dirs {
      for candidate in &candidates {
        let path = dir.join(candidate);
        if self.check.exists(&path) && self.check.is_executable(&path) {
          let path = std::path::absolute(&path).unwrap_or(path);
          debug!(name, path = %path.display(), "found interpreter on search path");
          return Ok(InterpreterSpec {
            requested: name.to_string(),
            path,
          });
        }
      }
    }

    Err(InterpreterError::NotOnSearchPath { name: name.to_string() })
  }
}

/// File names tried for a bare interpreter name, in order.
fn candidate_names(name: &str) -> Vec<String> {
  let base = if is_version(name) {
    format!("python{name}")
  } else {
    name.to_string()
  };

  let mut names = vec![base.clone()];
  if cfg!(windows) && !base.to_ascii_lowercase().ends_with(".exe") {
    names.push(format!("{base}.exe"));
  }
  names
}

fn is_version(name: &str) -> bool {
  name.starts_with(|c: char| c.is_ascii_digit()) && name.chars().all(|c| c.is_ascii_digit() || c == '.')
}
