use std::fmt;
use std::path::Path;
use std::process::Command;
use std::str::FromStr;

use tracing::debug;

use super::InterpreterError;

/// Program run by [`CommandProbe`]; prints `major.minor` without a newline.
const VERSION_PROGRAM: &str = "import sys; sys.stdout.write('%d.%d' % sys.version_info[:2])";

/// Major and minor version of an interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PythonVersion {
  pub major: u32,
  pub minor: u32,
}

impl PythonVersion {
  pub fn new(major: u32, minor: u32) -> Self {
    Self { major, minor }
  }
}

impl fmt::Display for PythonVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.major, self.minor)
  }
}

impl FromStr for PythonVersion {
  type Err = String;

  /// Parses `3.11` or `3.11.4`; anything after the minor version is ignored.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let mut parts = s.trim().split('.');
    let mut next = |what: &str| -> Result<u32, String> {
      parts
        .next()
        .and_then(|part| part.parse().ok())
        .ok_or_else(|| format!("invalid {what} version in {s:?}"))
    };
    let major = next("major")?;
    let minor = next("minor")?;
    Ok(Self { major, minor })
  }
}

/// Strategy asking an interpreter for its version.
pub trait VersionProbe {
  fn probe(&self, interpreter: &Path) -> Result<PythonVersion, InterpreterError>;
}

/// Runs the interpreter with a one-line program that prints its version.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandProbe;

impl VersionProbe for CommandProbe {
  fn probe(&self, interpreter: &Path) -> Result<PythonVersion, InterpreterError> {
    let failed = |reason: String| InterpreterError::VersionProbe {
      path: interpreter.to_path_buf(),
      reason,
    };

    debug!(interpreter = %interpreter.display(), "probing interpreter version");

    let output = Command::new(interpreter)
      .arg("-c")
      .arg(VERSION_PROGRAM)
      .output()
      .map_err(|e| failed(e.to_string()))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(failed(format!("exited with {}: {}", output.status, stderr.trim())));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout.parse().map_err(failed)
  }
}
