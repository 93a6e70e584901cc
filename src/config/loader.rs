// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Environment variable consulted when `--config` is not given.
pub const CONFIG_ENV: &str = "HERALD_CONFIG";

/// Read and deserialize a config file without checking its values.
///
/// Unknown keys are already rejected here. Use [`load_and_validate`] to get a
/// [`ConfigFile`] the supervisor can use.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    trace!(?path, bytes = text.len(), "read config file");
    Ok(toml::from_str(&text)?)
}

/// Read, deserialize and validate a config file.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    ConfigFile::try_from(load_from_path(path)?)
}

/// Pick the config file to load: the CLI flag wins, then `HERALD_CONFIG`.
///
/// Empty values count as unset. `None` means run without a config file.
pub fn resolve_config_path(cli: Option<&str>, env: Option<&str>) -> Option<PathBuf> {
    cli.filter(|p| !p.is_empty())
        .or(env.filter(|p| !p.is_empty()))
        .map(PathBuf::from)
}
