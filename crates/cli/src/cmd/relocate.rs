//! Implementation of the `isoenv relocate` command.

use std::path::Path;

use anyhow::{Context, Result};

use isoenv_lib::layout::Layout;
use isoenv_lib::platform::Platform;
use isoenv_lib::provision::{make_relocatable, recorded_version};

use crate::output::{print_info, print_stat, print_success, print_warning};

/// Execute the relocate command.
///
/// The interpreter version is read back from the environment's marker file.
///
/// # Errors
///
/// Returns an error if `dest` is not an environment or a file cannot be
/// rewritten.
pub fn cmd_relocate(dest: &Path) -> Result<()> {
  let platform = Platform::current().context("Unsupported platform")?;
  let version = recorded_version(dest)?;
  let layout = Layout::new(dest, version, platform);

  let report = make_relocatable(&layout, version).context("Failed to make environment relocatable")?;

  if report.is_empty() {
    print_info("Nothing to do, environment is already relocatable");
    return Ok(());
  }

  print_success(&format!("Made {} relocatable", layout.root.display()));
  print_stat("Scripts patched", &report.patched.len().to_string());
  print_stat("Path files rewritten", &report.links.len().to_string());
  print_warning("Activation scripts keep their absolute path and must be regenerated after a move");
  Ok(())
}
