//! Repository config file: `<repo>/.treeview.toml`

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::Path;

pub const FILE_NAME: &str = ".treeview.toml";

/// Add the repository's own file; optional.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    repo_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = repo_root.join(FILE_NAME);
    Ok(builder.add_source(File::from(path).required(false)))
}
