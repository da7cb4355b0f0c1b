use std::collections::BTreeMap;
use std::path::Path;

use ini::{Ini, ParseOption};
use tracing::debug;

use super::ConfigError;
use super::option::env_key;

/// A named, read-only source of raw option values.
pub trait ConfigSource {
  /// Name used in log messages.
  fn name(&self) -> &str;

  /// Raw value for the option with surface name `option_name`, if set.
  fn lookup(&self, option_name: &str) -> Option<String>;
}

/// Snapshot of the `ISOENV_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
  prefix: String,
  vars: BTreeMap<String, String>,
}

impl EnvSource {
  /// Capture every variable starting with `prefix` from the process environment.
  ///
  /// Variables that are not valid Unicode are skipped.
  pub fn from_env(prefix: &str) -> Self {
    let vars = std::env::vars_os().filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
    Self::from_vars(prefix, vars)
  }

  /// Build a source from explicit key/value pairs.
  pub fn from_vars<I, K, V>(prefix: &str, vars: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    let vars = vars
      .into_iter()
      .map(|(key, value)| (key.into(), value.into()))
      .filter(|(key, _): &(String, String)| key.starts_with(prefix))
      .collect();
    Self {
      prefix: prefix.to_string(),
      vars,
    }
  }
}

impl ConfigSource for EnvSource {
  fn name(&self) -> &str {
    "environment"
  }

  fn lookup(&self, option_name: &str) -> Option<String> {
    let key = format!("{}{}", self.prefix, env_key(option_name));
    self.vars.get(&key).cloned()
  }
}

/// One section of an INI config file.
///
/// Keys may be written as `no-site-packages`, `no_site_packages` or
/// `--no-site-packages`; they are normalized before lookup.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
  origin: String,
  values: BTreeMap<String, String>,
}

impl ConfigFile {
  /// Load `section` from the file at `path`.
  ///
  /// A missing file yields an empty source.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::Parse`] if the file exists but is not valid INI.
  pub fn load(path: &Path, section: &str) -> Result<Self, ConfigError> {
    let origin = path.display().to_string();

    if !path.is_file() {
      debug!(path = %origin, "no config file");
      return Ok(Self {
        origin,
        values: BTreeMap::new(),
      });
    }

    let ini = Ini::load_from_file_opt(path, parse_option()).map_err(|e| ConfigError::Parse {
      origin: origin.clone(),
      message: e.to_string(),
    })?;
    debug!(path = %origin, section, "loaded config file");
    Ok(Self::from_ini(origin, &ini, section))
  }

  /// Parse `section` from INI text.
  pub fn parse(content: &str, section: &str) -> Result<Self, ConfigError> {
    let origin = "<string>".to_string();
    let ini = Ini::load_from_str_opt(content, parse_option()).map_err(|e| ConfigError::Parse {
      origin: origin.clone(),
      message: e.to_string(),
    })?;
    Ok(Self::from_ini(origin, &ini, section))
  }

  fn from_ini(origin: String, ini: &Ini, section: &str) -> Self {
    let values = ini
      .section(Some(section))
      .map(|props| {
        props
          .iter()
          .map(|(key, value)| (normalize_key(key), value.to_string()))
          .collect()
      })
      .unwrap_or_default();
    Self { origin, values }
  }

}

impl ConfigSource for ConfigFile {
  fn name(&self) -> &str {
    &self.origin
  }

  fn lookup(&self, option_name: &str) -> Option<String> {
    self.values.get(&normalize_key(option_name)).cloned()
  }
}

/// Backslashes are kept literally so Windows paths survive.
fn parse_option() -> ParseOption {
  ParseOption {
    enabled_escape: false,
    ..ParseOption::default()
  }
}

fn normalize_key(key: &str) -> String {
  key.trim().trim_start_matches("--").to_lowercase().replace('_', "-")
}
