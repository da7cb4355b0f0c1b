//! Materializing a [`ProvisionPlan`] on disk.
//!
//! Provisioning creates the directory tree, installs the interpreter entry
//! points and writes:
//! - `pyvenv.cfg` marking the root as an environment
//! - one activation script per shell flavour
//! - `activate_this.py`, the in-process activation helper
//!
//! [`make_relocatable`] rewrites an existing environment so it keeps working
//! after being moved.

mod relocate;
mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{ACTIVATE_THIS, ENV_MARKER};
use crate::interpreter::PythonVersion;
use crate::layout::{Layout, ProvisionPlan};
use crate::platform::relpath::{PathError, relative_path};
use crate::platform::shell::Shell;

pub use relocate::{RelocationReport, make_relocatable};
pub use templates::{ACTIVATE_FISH, ACTIVATE_PS1, ACTIVATE_SH, ACTIVATE_THIS_PY};

/// Errors that can occur while provisioning or relocating an environment.
#[derive(Debug, Error)]
pub enum ProvisionError {
  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to remove {}: {source}", path.display())]
  Remove { path: PathBuf, source: std::io::Error },

  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },

  #[error("failed to link {} to {}: {source}", link.display(), target.display())]
  Link {
    link: PathBuf,
    target: PathBuf,
    source: std::io::Error,
  },

  #[error("{} is not an environment: {ENV_MARKER} is missing", root.display())]
  NotAnEnvironment { root: PathBuf },

  #[error(transparent)]
  Path(#[from] PathError),
}

/// Options applied when materializing a plan.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
  /// Give the environment access to the base interpreter's packages
  pub system_site_packages: bool,
  /// Remove the library directory of an existing environment first
  pub clear: bool,
  /// Prompt prefix, defaults to the name of the root directory
  pub prompt: Option<String>,
}

/// Files written by [`provision`].
#[derive(Debug)]
pub struct ProvisionReport {
  pub root: PathBuf,
  pub executables: Vec<PathBuf>,
  pub activation_scripts: Vec<PathBuf>,
  pub helper: PathBuf,
  pub marker: PathBuf,
}

/// Create the environment described by `plan`.
///
/// Re-running on an existing environment replaces the entry points and the
/// generated files and leaves installed packages alone unless `clear` is set.
///
/// # Errors
///
/// Returns an error if a directory, link or file cannot be created, or if the
/// location of site-packages cannot be expressed relative to the scripts.
pub fn provision(plan: &ProvisionPlan, options: &InstallOptions) -> Result<ProvisionReport, ProvisionError> {
  let layout = &plan.layout;

  if options.clear && layout.lib_dir.exists() {
    info!(path = %layout.lib_dir.display(), "deleting library directory");
    fs::remove_dir_all(&layout.lib_dir).map_err(|source| ProvisionError::Remove {
      path: layout.lib_dir.clone(),
      source,
    })?;
  }

  for dir in [
    &layout.root,
    &layout.lib_dir,
    &layout.site_packages,
    &layout.include_dir,
    &layout.bin_dir,
  ] {
    debug!(path = %dir.display(), "creating directory");
    fs::create_dir_all(dir).map_err(|source| ProvisionError::CreateDir {
      path: dir.clone(),
      source,
    })?;
  }

  if let Some(link) = &layout.lib64_link {
    link_lib64(link)?;
  }

  install_executables(plan)?;

  let prompt = options.prompt.clone().unwrap_or_else(|| default_prompt(layout));

  let marker = layout.root.join(ENV_MARKER);
  write_file(&marker, &marker_contents(plan, options))?;

  let mut activation_scripts = Vec::new();
  for shell in Shell::ACTIVATION_FLAVOURS {
    let path = layout.bin_dir.join(shell.activate_script_name());
    let (template, quoting) = activation_template(shell);
    write_file(&path, &render(template, quoting, layout, &prompt, &[]))?;
    activation_scripts.push(path);
  }

  let site_packages = relative_path(&layout.bin_dir, &layout.site_packages)?;
  let parts: Vec<String> = site_packages
    .components()
    .map(|component| component.as_os_str().to_string_lossy().into_owned())
    .collect();
  let helper = layout.bin_dir.join(ACTIVATE_THIS);
  write_file(&helper, &render(ACTIVATE_THIS_PY, Quoting::Python, layout, &prompt, &parts))?;

  info!(
    root = %layout.root.display(),
    version = %plan.interpreter.version,
    "environment created"
  );

  Ok(ProvisionReport {
    root: layout.root.clone(),
    executables: plan.executables().map(Path::to_path_buf).collect(),
    activation_scripts,
    helper,
    marker,
  })
}

/// Read the interpreter version recorded in an environment's marker file.
///
/// # Errors
///
/// Returns [`ProvisionError::NotAnEnvironment`] when the marker is missing or
/// carries no parseable `version`.
pub fn recorded_version(root: &Path) -> Result<PythonVersion, ProvisionError> {
  let marker = root.join(ENV_MARKER);
  let contents = fs::read_to_string(&marker).map_err(|_| ProvisionError::NotAnEnvironment {
    root: root.to_path_buf(),
  })?;

  contents
    .lines()
    .filter_map(|line| line.split_once('='))
    .find(|(key, _)| key.trim() == "version")
    .and_then(|(_, value)| value.trim().parse().ok())
    .ok_or_else(|| ProvisionError::NotAnEnvironment {
      root: root.to_path_buf(),
    })
}

/// String literal syntax the placeholders of a template are substituted into.
///
/// Every placeholder sits inside a double-quoted string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quoting {
  Sh,
  Fish,
  PowerShell,
  Python,
}

impl Quoting {
  fn escape(self, value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
      match (self, c) {
        (Quoting::Sh, '\\' | '"' | '$' | '`') | (Quoting::Fish, '\\' | '"' | '$') => {
          out.push('\\');
          out.push(c);
        }
        (Quoting::PowerShell, '`' | '"' | '$') => {
          out.push('`');
          out.push(c);
        }
        (Quoting::Python, '\\' | '"') => {
          out.push('\\');
          out.push(c);
        }
        (Quoting::Python, '\n') => out.push_str("\\n"),
        (Quoting::Python, '\r') => out.push_str("\\r"),
        _ => out.push(c),
      }
    }
    out
  }
}

fn activation_template(shell: Shell) -> (&'static str, Quoting) {
  match shell {
    Shell::Fish => (ACTIVATE_FISH, Quoting::Fish),
    Shell::PowerShell => (ACTIVATE_PS1, Quoting::PowerShell),
    Shell::Bash | Shell::Zsh | Shell::Sh => (ACTIVATE_SH, Quoting::Sh),
  }
}

fn default_prompt(layout: &Layout) -> String {
  layout
    .root
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_default()
}

fn render(template: &str, quoting: Quoting, layout: &Layout, prompt: &str, site_packages: &[String]) -> String {
  let bin_name = layout
    .bin_dir
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_default();

  let parts: Vec<String> = site_packages
    .iter()
    .map(|part| format!("\"{}\"", Quoting::Python.escape(part)))
    .collect();

  template
    .replace("__VIRTUAL_ENV__", &quoting.escape(&layout.root.to_string_lossy()))
    .replace("__BIN_NAME__", &quoting.escape(&bin_name))
    .replace("__PROMPT__", &quoting.escape(prompt))
    .replace("__SITE_PACKAGES__", &format!("[{}]", parts.join(", ")))
}

fn marker_contents(plan: &ProvisionPlan, options: &InstallOptions) -> String {
  let mut contents = format!(
    "home = {}\ninclude-system-site-packages = {}\nversion = {}\n",
    plan.interpreter.home().display(),
    options.system_site_packages,
    plan.interpreter.version,
  );
  if let Some(prompt) = &options.prompt {
    contents.push_str(&format!("prompt = {prompt}\n"));
  }
  contents
}

fn write_file(path: &Path, contents: &str) -> Result<(), ProvisionError> {
  debug!(path = %path.display(), "writing file");
  fs::write(path, contents).map_err(|source| ProvisionError::WriteFile {
    path: path.to_path_buf(),
    source,
  })
}

/// Remove whatever occupies `path`, including dangling symlinks.
fn remove_existing(path: &Path) -> Result<(), ProvisionError> {
  if fs::symlink_metadata(path).is_ok() {
    fs::remove_file(path).map_err(|source| ProvisionError::Remove {
      path: path.to_path_buf(),
      source,
    })?;
  }
  Ok(())
}

#[cfg(unix)]
fn link_lib64(link: &Path) -> Result<(), ProvisionError> {
  if fs::symlink_metadata(link).is_ok() {
    return Ok(());
  }
  debug!(path = %link.display(), "linking lib64 to lib");
  std::os::unix::fs::symlink("lib", link).map_err(|source| ProvisionError::Link {
    link: link.to_path_buf(),
    target: PathBuf::from("lib"),
    source,
  })
}

#[cfg(not(unix))]
fn link_lib64(_link: &Path) -> Result<(), ProvisionError> {
  Ok(())
}

/// Unix: `python` links to the base interpreter, aliases link to `python`.
#[cfg(unix)]
fn install_executables(plan: &ProvisionPlan) -> Result<(), ProvisionError> {
  use std::os::unix::fs::symlink;

  let base = plan.interpreter.path();
  remove_existing(&plan.primary)?;
  info!(link = %plan.primary.display(), target = %base.display(), "linking interpreter");
  symlink(base, &plan.primary).map_err(|source| ProvisionError::Link {
    link: plan.primary.clone(),
    target: base.to_path_buf(),
    source,
  })?;

  let target = plan.primary.file_name().map(PathBuf::from).unwrap_or_default();
  for alias in &plan.aliases {
    remove_existing(alias)?;
    debug!(link = %alias.display(), target = %target.display(), "linking alias");
    symlink(&target, alias).map_err(|source| ProvisionError::Link {
      link: alias.clone(),
      target: target.clone(),
      source,
    })?;
  }
  Ok(())
}

/// Windows: every entry point is a copy of the base interpreter.
#[cfg(not(unix))]
fn install_executables(plan: &ProvisionPlan) -> Result<(), ProvisionError> {
  let base = plan.interpreter.path();
  for path in plan.executables() {
    remove_existing(path)?;
    info!(path = %path.display(), source = %base.display(), "copying interpreter");
    fs::copy(base, path).map_err(|source| ProvisionError::Link {
      link: path.to_path_buf(),
      target: base.to_path_buf(),
      source,
    })?;
  }
  Ok(())
}
