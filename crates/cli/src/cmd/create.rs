//! Implementation of the `isoenv create` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use isoenv_lib::config::{Overrides, Settings, Value, dest};
use isoenv_lib::interpreter::{CommandProbe, InterpreterResolver, default_interpreter_name};
use isoenv_lib::layout::LayoutPlanner;
use isoenv_lib::platform::Platform;
use isoenv_lib::platform::shell::Shell;
use isoenv_lib::provision::{InstallOptions, make_relocatable, provision};

use crate::output::{print_stat, print_success, print_warning};

#[derive(Debug, Args)]
pub struct CreateArgs {
  /// Root directory of the new environment
  pub dest: PathBuf,

  /// Interpreter to use: a name on PATH, a version like 3.11, or a path
  #[arg(short, long)]
  pub python: Option<String>,

  /// Give the environment access to the global site-packages
  #[arg(long, conflicts_with = "no_site_packages")]
  pub system_site_packages: bool,

  /// Do not give the environment access to the global site-packages
  #[arg(long)]
  pub no_site_packages: bool,

  /// Delete the library directory of an existing environment first
  #[arg(long)]
  pub clear: bool,

  /// Make the environment relocatable after creating it
  #[arg(long)]
  pub relocatable: bool,

  /// Prompt prefix shown while the environment is active
  #[arg(long)]
  pub prompt: Option<String>,

  /// Extra directory searched for the interpreter (repeatable)
  #[arg(long)]
  pub extra_search_dir: Vec<PathBuf>,
}

impl CreateArgs {
  /// Options given explicitly on the command line.
  ///
  /// Flags that were not passed are left out so lower priority sources apply.
  pub fn overrides(&self) -> Overrides {
    let mut overrides = Overrides::new();

    if let Some(python) = &self.python {
      overrides.set(dest::PYTHON, Value::Text(python.clone()));
    }
    if self.system_site_packages {
      overrides.set(dest::SYSTEM_SITE_PACKAGES, Value::Bool(true));
    }
    if self.no_site_packages {
      overrides.set(dest::SYSTEM_SITE_PACKAGES, Value::Bool(false));
    }
    if self.clear {
      overrides.set(dest::CLEAR, Value::Bool(true));
    }
    if self.relocatable {
      overrides.set(dest::RELOCATABLE, Value::Bool(true));
    }
    if let Some(prompt) = &self.prompt {
      overrides.set(dest::PROMPT, Value::Text(prompt.clone()));
    }
    if !self.extra_search_dir.is_empty() {
      let dirs = self
        .extra_search_dir
        .iter()
        .map(|dir| dir.to_string_lossy().into_owned())
        .collect();
      overrides.set(dest::EXTRA_SEARCH_DIR, Value::List(dirs));
    }

    overrides
  }
}

/// Execute the create command.
///
/// # Errors
///
/// Returns an error if the interpreter cannot be resolved or probed, or if
/// the environment cannot be written.
pub fn cmd_create(dest: &Path, settings: &Settings) -> Result<()> {
  let requested = settings
    .python
    .clone()
    .unwrap_or_else(|| default_interpreter_name().to_string());

  debug!(?settings, "creating environment");

  let platform = Platform::current().context("Unsupported platform")?;
  let resolver = InterpreterResolver::from_env(&settings.extra_search_dirs);
  debug!(search_dirs = ?resolver.search_dirs(), "interpreter search path");
  let planner = LayoutPlanner::new(&resolver, &CommandProbe, platform);

  let plan = planner
    .plan(dest, &requested)
    .with_context(|| format!("Failed to resolve interpreter {requested:?}"))?;

  let options = InstallOptions {
    system_site_packages: settings.system_site_packages,
    clear: settings.clear,
    prompt: settings.prompt.clone(),
  };
  let report = provision(&plan, &options).context("Failed to create environment")?;

  if settings.relocatable {
    make_relocatable(&plan.layout, plan.interpreter.version).context("Failed to make environment relocatable")?;
  }

  print_success(&format!("Created environment at {}", report.root.display()));
  print_stat("Interpreter", &plan.interpreter.path().display().to_string());
  print_stat("Version", &plan.interpreter.version.to_string());
  print_stat("Scripts", &plan.layout.bin_dir.display().to_string());
  print_stat("Site packages", &plan.layout.site_packages.display().to_string());
  if settings.relocatable {
    print_stat("Relocatable", "yes");
    print_warning("Activation scripts keep their absolute path and must be regenerated after a move");
  }

  let shell = Shell::detect();
  debug!(%shell, "detected shell");
  print_stat("Activate with", &shell.activation_command(&plan.layout.bin_dir));

  Ok(())
}
