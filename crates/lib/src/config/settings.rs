use std::path::PathBuf;

use serde::Serialize;

use super::merge::{ConfigMerger, ConfigSnapshot, Defaults};
use super::option::{ConfigOption, OptionKind, Value};
use super::source::{ConfigFile, EnvSource};

/// Destination keys of the provisioning options.
pub mod dest {
  pub const PYTHON: &str = "python";
  pub const SYSTEM_SITE_PACKAGES: &str = "system_site_packages";
  pub const CLEAR: &str = "clear";
  pub const RELOCATABLE: &str = "relocatable";
  pub const PROMPT: &str = "prompt";
  pub const EXTRA_SEARCH_DIR: &str = "extra_search_dir";
  pub const VERBOSE: &str = "verbose";
  pub const QUIET: &str = "quiet";
}

/// Options understood by `isoenv create`, in declaration order.
pub fn provision_options() -> Vec<ConfigOption> {
  vec![
    ConfigOption::new("python", dest::PYTHON, OptionKind::Text),
    ConfigOption::new("system-site-packages", dest::SYSTEM_SITE_PACKAGES, OptionKind::Flag),
    ConfigOption::new("no-site-packages", dest::SYSTEM_SITE_PACKAGES, OptionKind::InvertedFlag),
    ConfigOption::new("clear", dest::CLEAR, OptionKind::Flag),
    ConfigOption::new("relocatable", dest::RELOCATABLE, OptionKind::Flag),
    ConfigOption::new("prompt", dest::PROMPT, OptionKind::Text),
    ConfigOption::new("extra-search-dir", dest::EXTRA_SEARCH_DIR, OptionKind::List),
    ConfigOption::new("verbose", dest::VERBOSE, OptionKind::Count),
    ConfigOption::new("quiet", dest::QUIET, OptionKind::Count),
  ]
}

/// Defaults used when no source sets an option.
pub fn declared_defaults() -> Defaults {
  Defaults::from([
    (dest::SYSTEM_SITE_PACKAGES.to_string(), Value::Bool(false)),
    (dest::CLEAR.to_string(), Value::Bool(false)),
    (dest::RELOCATABLE.to_string(), Value::Bool(false)),
    (dest::EXTRA_SEARCH_DIR.to_string(), Value::List(Vec::new())),
    (dest::VERBOSE.to_string(), Value::Count(0)),
    (dest::QUIET.to_string(), Value::Count(0)),
  ])
}

/// Merger over the environment and the config file, in that priority order.
pub fn provision_merger(env: EnvSource, file: ConfigFile) -> ConfigMerger {
  ConfigMerger::new(provision_options(), declared_defaults())
    .with_source(env)
    .with_source(file)
}

/// Typed view of a merged snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
  pub python: Option<String>,
  pub system_site_packages: bool,
  pub clear: bool,
  pub relocatable: bool,
  pub prompt: Option<String>,
  pub extra_search_dirs: Vec<PathBuf>,
  /// `verbose - quiet`
  pub verbosity: i32,
}

impl Settings {
  pub fn from_snapshot(snapshot: &ConfigSnapshot) -> Self {
    let verbosity = i64::from(snapshot.count(dest::VERBOSE)) - i64::from(snapshot.count(dest::QUIET));

    Self {
      python: snapshot.text(dest::PYTHON).map(String::from),
      system_site_packages: snapshot.flag(dest::SYSTEM_SITE_PACKAGES),
      clear: snapshot.flag(dest::CLEAR),
      relocatable: snapshot.flag(dest::RELOCATABLE),
      prompt: snapshot.text(dest::PROMPT).map(String::from),
      extra_search_dirs: snapshot
        .list(dest::EXTRA_SEARCH_DIR)
        .iter()
        .map(PathBuf::from)
        .collect(),
      verbosity: i32::try_from(verbosity).unwrap_or(if verbosity < 0 { i32::MIN } else { i32::MAX }),
    }
  }
}
