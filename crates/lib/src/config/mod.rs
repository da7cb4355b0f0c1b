//! Option merging across the command line, environment and config file.
//!
//! Every option is looked up in an ordered list of named sources. Priority,
//! highest first:
//!
//! 1. explicit values from the command line ([`Overrides`])
//! 2. `ISOENV_*` environment variables ([`EnvSource`])
//! 3. the `[isoenv]` section of the config file ([`ConfigFile`])
//! 4. declared defaults
//!
//! Options declared as inverted flags (`--no-site-packages`) store the
//! negation of their surface value, whichever source provides it.

mod merge;
mod option;
mod settings;
mod source;

use thiserror::Error;

pub use merge::{ConfigMerger, ConfigSnapshot, Defaults, Overrides};
pub use option::{ConfigOption, OptionKind, Value, parse_bool};
pub use settings::{Settings, declared_defaults, dest, provision_merger, provision_options};
pub use source::{ConfigFile, ConfigSource, EnvSource};

/// Errors that can occur while loading configuration.
///
/// Merging itself never fails: unusable values are logged and skipped.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to parse config file {origin}: {message}")]
  Parse { origin: String, message: String },
}
