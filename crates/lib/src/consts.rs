/// Application name, used for per-user directories and the config file name.
pub const APP_NAME: &str = "isoenv";

/// Prefix of every environment variable that sets an option.
pub const ENV_PREFIX: &str = "ISOENV_";

/// Environment variable naming an explicit config file.
pub const CONFIG_FILE_ENV: &str = "ISOENV_CONFIG_FILE";

/// Section of the config file read by default.
pub const CONFIG_SECTION: &str = "isoenv";

/// File name of the in-process activation helper written next to the scripts.
pub const ACTIVATE_THIS: &str = "activate_this.py";

/// Marker file at the root of every provisioned environment.
pub const ENV_MARKER: &str = "pyvenv.cfg";
