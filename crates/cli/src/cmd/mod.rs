mod create;
mod info;
mod relocate;

use anyhow::{Context, Result};

use isoenv_lib::config::{ConfigFile, ConfigMerger, EnvSource, provision_merger};
use isoenv_lib::consts::{CONFIG_SECTION, ENV_PREFIX};
use isoenv_lib::platform::paths::config_file;

pub use create::{CreateArgs, cmd_create};
pub use info::cmd_info;
pub use relocate::cmd_relocate;

/// Build the merger over `ISOENV_*` variables and the user's config file.
pub fn load_merger() -> Result<ConfigMerger> {
  let file = match config_file() {
    Some(path) => ConfigFile::load(&path, CONFIG_SECTION)
      .with_context(|| format!("Failed to load config file {}", path.display()))?,
    None => ConfigFile::default(),
  };

  Ok(provision_merger(EnvSource::from_env(ENV_PREFIX), file))
}
