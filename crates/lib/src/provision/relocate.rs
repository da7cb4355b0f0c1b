use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{ProvisionError, write_file};
use crate::consts::ACTIVATE_THIS;
use crate::interpreter::PythonVersion;
use crate::layout::Layout;
use crate::platform::relpath::{real_path, relative_path};
use crate::platform::shell::Shell;
use crate::script::insert_activation;

/// Files touched by [`make_relocatable`].
#[derive(Debug, Default)]
pub struct RelocationReport {
  /// Scripts whose shebang was rewritten and activation inserted
  pub patched: Vec<PathBuf>,
  /// `.pth` and `.egg-link` files rewritten with relative paths
  pub links: Vec<PathBuf>,
}

impl RelocationReport {
  pub fn is_empty(&self) -> bool {
    self.patched.is_empty() && self.links.is_empty()
  }
}

/// Make the environment described by `layout` independent of its location.
///
/// - scripts in the bin directory that run the environment's own interpreter
///   get a `#!/usr/bin/env pythonX.Y` shebang and an activation statement
/// - absolute entries in `.pth` files and `.egg-link` files are rewritten
///   relative to the file holding them
///
/// Activation shell scripts keep their absolute path. Running this twice is a
/// no-op the second time.
///
/// # Errors
///
/// Returns an error if a file cannot be read or written, or if a path has no
/// relative form.
pub fn make_relocatable(layout: &Layout, version: PythonVersion) -> Result<RelocationReport, ProvisionError> {
  let mut report = RelocationReport::default();
  let shebang = format!("#!/usr/bin/env python{version}");
  let bin_dir = real_path(&layout.bin_dir)?;

  for path in sorted_entries(&layout.bin_dir)? {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
      continue;
    };
    if name == ACTIVATE_THIS {
      continue;
    }
    if Shell::ACTIVATION_FLAVOURS
      .iter()
      .any(|shell| shell.activate_script_name() == name)
    {
      warn!(path = %path.display(), "activation script cannot be made relative, it keeps its absolute path");
      continue;
    }
    if is_link_or_dir(&path) {
      continue;
    }

    // binaries are not scripts
    let Ok(contents) = fs::read_to_string(&path) else {
      debug!(path = %path.display(), "skipping non-text file");
      continue;
    };
    let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();
    let Some(first) = lines.first() else {
      continue;
    };

    if first.trim() == shebang {
      debug!(path = %path.display(), "script already relative");
      continue;
    }
    if !runs_environment_python(first, &bin_dir)? {
      debug!(path = %path.display(), "script does not use this environment's interpreter");
      continue;
    }

    info!(path = %path.display(), "making script relative");
    lines[0] = shebang.clone();
    write_file(&path, &join_lines(&insert_activation(&lines)))?;
    report.patched.push(path);
  }

  if layout.site_packages.is_dir() {
    for path in sorted_entries(&layout.site_packages)? {
      let rewritten = match path.extension().and_then(|ext| ext.to_str()) {
        Some("pth") => fixup_pth(&path)?,
        Some("egg-link") => fixup_egg_link(&path)?,
        _ => false,
      };
      if rewritten {
        report.links.push(path);
      }
    }
  }

  Ok(report)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, ProvisionError> {
  let read_err = |source| ProvisionError::Read {
    path: dir.to_path_buf(),
    source,
  };
  let mut entries = fs::read_dir(dir)
    .map_err(read_err)?
    .map(|entry| entry.map(|entry| entry.path()))
    .collect::<Result<Vec<_>, _>>()
    .map_err(read_err)?;
  entries.sort();
  Ok(entries)
}

fn is_link_or_dir(path: &Path) -> bool {
  fs::symlink_metadata(path)
    .map(|meta| meta.file_type().is_symlink() || meta.is_dir())
    .unwrap_or(true)
}

/// Whether a shebang line runs an interpreter from `bin_dir`.
fn runs_environment_python(line: &str, bin_dir: &Path) -> Result<bool, ProvisionError> {
  let Some(command) = line.strip_prefix("#!") else {
    return Ok(false);
  };
  let Some(program) = command.split_whitespace().next().map(Path::new) else {
    return Ok(false);
  };

  let is_python = program
    .file_name()
    .and_then(|name| name.to_str())
    .is_some_and(|name| name.starts_with("python"));
  let Some(parent) = program.parent().filter(|parent| parent.is_absolute()) else {
    return Ok(false);
  };

  Ok(is_python && real_path(parent)? == bin_dir)
}

fn fixup_pth(path: &Path) -> Result<bool, ProvisionError> {
  let contents = read(path)?;
  let dir = path.parent().unwrap_or(Path::new("."));

  let mut changed = false;
  let mut lines = Vec::new();
  for line in contents.lines() {
    let trimmed = line.trim();
    if trimmed.starts_with("import") || !Path::new(trimmed).is_absolute() {
      lines.push(line.to_string());
      continue;
    }
    let relative = relative_path(dir, Path::new(trimmed))?;
    debug!(path = %path.display(), from = trimmed, to = %relative.display(), "rewriting path entry");
    lines.push(relative.to_string_lossy().into_owned());
    changed = true;
  }

  if changed {
    info!(path = %path.display(), "making path file relative");
    write_file(path, &join_lines(&lines))?;
  }
  Ok(changed)
}

fn fixup_egg_link(path: &Path) -> Result<bool, ProvisionError> {
  let contents = read(path)?;
  let dir = path.parent().unwrap_or(Path::new("."));

  let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();
  let Some(first) = lines.first_mut() else {
    return Ok(false);
  };
  let target = Path::new(first.trim());
  if !target.is_absolute() {
    return Ok(false);
  }

  *first = relative_path(dir, target)?.to_string_lossy().into_owned();
  info!(path = %path.display(), "making egg link relative");
  write_file(path, &join_lines(&lines))?;
  Ok(true)
}

fn read(path: &Path) -> Result<String, ProvisionError> {
  fs::read_to_string(path).map_err(|source| ProvisionError::Read {
    path: path.to_path_buf(),
    source,
  })
}

fn join_lines(lines: &[String]) -> String {
  let mut out = lines.join("\n");
  out.push('\n');
  out
}
