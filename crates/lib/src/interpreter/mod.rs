//! Locating and validating the base interpreter of an environment.
//!
//! Resolution and version probing are split into two strategies so tests can
//! substitute the filesystem checks and the interpreter call:
//! - [`ExecutableCheck`] decides whether a path exists and may be executed
//! - [`VersionProbe`] asks a resolved interpreter for its version

mod check;
mod resolve;
mod version;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use check::{ExecutableCheck, FsCheck};
pub use resolve::{InterpreterResolver, default_interpreter_name};
pub use version::{CommandProbe, PythonVersion, VersionProbe};

/// Errors that can occur while resolving an interpreter.
///
/// Every variant is fatal for the current run.
#[derive(Debug, Error)]
pub enum InterpreterError {
  #[error("interpreter not found: {} does not exist", path.display())]
  NotFound { path: PathBuf },

  #[error("interpreter is not executable: {}", path.display())]
  NotExecutable { path: PathBuf },

  #[error("interpreter {name:?} not found in any search directory")]
  NotOnSearchPath { name: String },

  #[error("failed to make {} absolute: {source}", path.display())]
  Absolute { path: PathBuf, source: std::io::Error },

  #[error("failed to query the version of {}: {reason}", path.display())]
  VersionProbe { path: PathBuf, reason: String },
}

/// A validated interpreter request.
///
/// Only produced by [`InterpreterResolver::resolve`], so holding one means the
/// path existed and was executable when it was checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterSpec {
  /// Name or path as given by the user
  pub requested: String,
  /// Absolute path of the executable that was found
  pub path: PathBuf,
}

/// A resolved interpreter together with its version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
  pub spec: InterpreterSpec,
  pub version: PythonVersion,
}

impl Interpreter {
  pub fn path(&self) -> &Path {
    &self.spec.path
  }

  /// Directory holding the interpreter, recorded as `home` in `pyvenv.cfg`.
  pub fn home(&self) -> &Path {
    self.spec.path.parent().unwrap_or_else(|| Path::new(""))
  }
}
