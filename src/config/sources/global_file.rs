//! Global config file: `$XDG_CONFIG_HOME/treeview/config.toml`

use crate::config::xdg;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::PathBuf;

pub fn path() -> Option<PathBuf> {
    xdg::config_home().map(|home| home.join("treeview").join("config.toml"))
}

/// Add the global file if the config home resolves; a missing file is fine.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match path() {
        Some(path) => Ok(builder.add_source(File::from(path).required(false))),
        None => Ok(builder),
    }
}
