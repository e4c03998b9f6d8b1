//! MergeService: orchestrates sources, applies merge policy, deserializes to TreeviewConfig.

use crate::config::sources::{environment, global_file, repo_file};
use crate::config::TreeviewConfig;
use config::{ConfigError, File};
use std::path::Path;
use tracing::debug;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config for a repository and standard sources.
    /// Precedence: defaults (lowest) -> global file -> repository file -> environment (highest).
    pub fn load(repo_root: &Path) -> Result<TreeviewConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = repo_file::add_to_builder(builder, repo_root)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        let merged: TreeviewConfig = config.try_deserialize()?;
        debug!(repo = %repo_root.display(), name = %merged.repo.name, "Loaded layered configuration");
        Ok(merged)
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<TreeviewConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
