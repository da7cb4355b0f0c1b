//! Shell detection and activation script flavours

use std::env;
use std::path::{Path, PathBuf};

/// Supported shell types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
  Bash,
  Zsh,
  Fish,
  PowerShell,
  Sh,
}

impl Shell {
  /// Shells that get their own activation script in every environment.
  ///
  /// Bash and zsh source the POSIX `activate` script written for `Sh`.
  pub const ACTIVATION_FLAVOURS: [Shell; 3] = [Shell::Sh, Shell::Fish, Shell::PowerShell];

  /// Detect the current shell from environment
  ///
  /// Checks `$SHELL` on Unix, falls back to reasonable defaults.
  pub fn detect() -> Self {
    if let Ok(shell) = env::var("SHELL") {
      let shell_name = PathBuf::from(&shell)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();

      return Self::from_name(&shell_name).unwrap_or_else(|| {
        if shell_name.contains("zsh") {
          Shell::Zsh
        } else if shell_name.contains("bash") {
          Shell::Bash
        } else if shell_name.contains("fish") {
          Shell::Fish
        } else {
          Shell::Sh
        }
      });
    }

    #[cfg(target_os = "windows")]
    return Shell::PowerShell;

    #[cfg(not(target_os = "windows"))]
    Shell::Sh
  }

  /// Parse a shell from its executable name
  pub fn from_name(name: &str) -> Option<Self> {
    match name.to_lowercase().as_str() {
      "zsh" => Some(Shell::Zsh),
      "bash" => Some(Shell::Bash),
      "fish" => Some(Shell::Fish),
      "sh" => Some(Shell::Sh),
      "pwsh" | "powershell" => Some(Shell::PowerShell),
      _ => None,
    }
  }

  /// Get the shell name as a string
  pub fn as_str(&self) -> &'static str {
    match self {
      Shell::Bash => "bash",
      Shell::Zsh => "zsh",
      Shell::Fish => "fish",
      Shell::PowerShell => "powershell",
      Shell::Sh => "sh",
    }
  }

  /// File name of the activation script this shell sources
  pub fn activate_script_name(&self) -> &'static str {
    match self {
      Shell::Bash | Shell::Zsh | Shell::Sh => "activate",
      Shell::Fish => "activate.fish",
      Shell::PowerShell => "Activate.ps1",
    }
  }

  /// Command the user types to run `script` in the current shell
  pub fn source_command(&self, script: &Path) -> String {
    let script = script.display().to_string();
    match self {
      Shell::PowerShell => format!("& '{}'", script.replace('\'', "''")),
      Shell::Fish => format!("source '{}'", script.replace('\\', "\\\\").replace('\'', "\\'")),
      Shell::Bash | Shell::Zsh => format!("source '{}'", script.replace('\'', r"'\''")),
      Shell::Sh => format!(". '{}'", script.replace('\'', r"'\''")),
    }
  }

  /// Command activating the environment whose scripts live in `bin_dir`
  pub fn activation_command(&self, bin_dir: &Path) -> String {
    self.source_command(&bin_dir.join(self.activate_script_name()))
  }
}

impl std::fmt::Display for Shell {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
