//! Rendering
//!
//! HTML output for the tree view: directory listings with compressed
//! breadcrumbs, and blob content as numbered text or a hex dump.

pub mod breadcrumb;
pub mod content;
pub mod filter;
pub mod html;
pub mod layout;
pub mod links;
pub mod listing;

use crate::config::TreeviewConfig;
use crate::store::ObjectStore;
use links::LinkBuilder;
use std::path::PathBuf;

/// Per-repository rendering switches
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub repo_name: String,
    /// Display ceiling in KiB; 0 disables the check
    pub max_blob_size_kb: u64,
    pub line_numbers: bool,
    pub enable_blame: bool,
    pub enable_stats: bool,
    pub enable_subtree: bool,
    /// `None` walks the whole history
    pub max_subtree_commits: Option<usize>,
    pub source_filter: Option<PathBuf>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            repo_name: String::new(),
            max_blob_size_kb: 0,
            line_numbers: true,
            enable_blame: false,
            enable_stats: false,
            enable_subtree: false,
            max_subtree_commits: None,
            source_filter: None,
        }
    }
}

impl ViewSettings {
    pub fn from_config(config: &TreeviewConfig) -> Self {
        Self {
            repo_name: config.repo.name.clone(),
            max_blob_size_kb: config.render.max_blob_size,
            line_numbers: config.render.line_numbers,
            enable_blame: config.repo.enable_blame,
            enable_stats: config.repo.enable_stats,
            enable_subtree: config.repo.enable_subtree,
            max_subtree_commits: match config.repo.max_subtree_commits {
                0 => None,
                n => Some(n),
            },
            source_filter: config.repo.source_filter.clone(),
        }
    }
}

/// Everything a renderer needs to resolve objects and build links for one request
pub struct RenderContext<'a> {
    pub store: &'a dyn ObjectStore,
    pub links: &'a dyn LinkBuilder,
    pub settings: &'a ViewSettings,
    pub head: &'a str,
    pub rev: &'a str,
}
