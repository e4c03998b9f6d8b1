//! Entry point for loading `TreeviewConfig`.

use super::merge::service::MergeService;
use super::TreeviewConfig;
use config::ConfigError;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Layered load for the repository at `repo_root`.
    pub fn load(repo_root: &Path) -> Result<TreeviewConfig, ConfigError> {
        MergeService::load(repo_root)
    }

    /// Defaults, then `path` alone, then the environment.
    pub fn load_from_file(path: &Path) -> Result<TreeviewConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// `explicit` replaces the global and repository files when given.
    pub fn load_for(repo_root: &Path, explicit: Option<&Path>) -> Result<TreeviewConfig, ConfigError> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => Self::load(repo_root),
        }
    }
}
