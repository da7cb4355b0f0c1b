use crate::consts::{APP_NAME, CONFIG_FILE_ENV};
use std::path::PathBuf;

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("USERPROFILE").map(PathBuf::from)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME").map(PathBuf::from)
}

/// Returns the directory for configuration files for the application
#[cfg(windows)]
pub fn config_dir() -> Option<PathBuf> {
  std::env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join(APP_NAME))
}

/// Returns the directory for configuration files for the application
#[cfg(not(windows))]
pub fn config_dir() -> Option<PathBuf> {
  let config_home = std::env::var_os("XDG_CONFIG_HOME")
    .map(PathBuf::from)
    .or_else(|| home_dir().map(|home| home.join(".config")))?;
  Some(config_home.join(APP_NAME))
}

/// Returns the config file to read.
///
/// `ISOENV_CONFIG_FILE` wins over `<config_dir>/isoenv.ini`.
pub fn config_file() -> Option<PathBuf> {
  if let Some(path) = std::env::var_os(CONFIG_FILE_ENV) {
    return Some(PathBuf::from(path));
  }
  config_dir().map(|dir| dir.join(format!("{APP_NAME}.ini")))
}
