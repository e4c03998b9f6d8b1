//! Configuration
//!
//! Layered configuration for the tree view, merged by the `config` crate from
//! built-in defaults, the global file, the repository file and the
//! environment (`TREEVIEW__SECTION__KEY`).

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeviewConfig {
    #[serde(default)]
    pub repo: RepoConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub links: LinksConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Per-repository switches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Repository name as it appears in URLs; empty uses the directory name
    #[serde(default)]
    pub name: String,

    #[serde(default = "default_branch")]
    pub default_branch: String,

    #[serde(default)]
    pub enable_subtree: bool,

    /// Commits inspected for subtree trailers; 0 walks the whole history
    #[serde(default)]
    pub max_subtree_commits: usize,

    #[serde(default)]
    pub enable_blame: bool,

    #[serde(default)]
    pub enable_stats: bool,

    /// Program that highlights blob text; receives the file name as its argument
    #[serde(default)]
    pub source_filter: Option<PathBuf>,

    /// Submodule URL template with `{path}` and `{id}` placeholders
    #[serde(default)]
    pub module_link: Option<String>,
}

fn default_branch() -> String {
    "master".to_string()
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            default_branch: default_branch(),
            enable_subtree: false,
            max_subtree_commits: 0,
            enable_blame: false,
            enable_stats: false,
            source_filter: None,
            module_link: None,
        }
    }
}

/// Content rendering limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Largest blob displayed, in KiB; 0 disables the limit
    #[serde(default)]
    pub max_blob_size: u64,

    #[serde(default = "default_true")]
    pub line_numbers: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_blob_size: 0,
            line_numbers: default_true(),
        }
    }
}

/// URL layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_virtual_root")]
    pub virtual_root: String,
}

fn default_virtual_root() -> String {
    "/".to_string()
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            virtual_root: default_virtual_root(),
        }
    }
}
