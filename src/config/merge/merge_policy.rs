//! Built-in defaults every layered load starts from.

use crate::config::TreeviewConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with the default value of every scalar key.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = TreeviewConfig::default();
    Config::builder()
        .set_default("repo.name", defaults.repo.name)?
        .set_default("repo.default_branch", defaults.repo.default_branch)?
        .set_default("repo.enable_subtree", defaults.repo.enable_subtree)?
        .set_default("repo.max_subtree_commits", defaults.repo.max_subtree_commits as i64)?
        .set_default("repo.enable_blame", defaults.repo.enable_blame)?
        .set_default("repo.enable_stats", defaults.repo.enable_stats)?
        .set_default("render.max_blob_size", defaults.render.max_blob_size as i64)?
        .set_default("render.line_numbers", defaults.render.line_numbers)?
        .set_default("links.virtual_root", defaults.links.virtual_root)?
        .set_default("logging.enabled", defaults.logging.enabled)?
        .set_default("logging.level", defaults.logging.level)?
        .set_default("logging.format", defaults.logging.format.as_str())?
        .set_default("logging.output", defaults.logging.output.as_str())?
        .set_default("logging.color", defaults.logging.color)
}
