//! CLI Tooling
//!
//! Command-line interface for rendering tree views of a repository and
//! inspecting its subtree annotations.

use crate::config::{ConfigLoader, TreeviewConfig};
use crate::error::ApiError;
use crate::logging::{LogFormat, LogOutput, LoggingConfig};
use crate::render::layout::{DocumentLayout, FragmentLayout, PageLayout};
use crate::render::links::UrlLinks;
use crate::render::ViewSettings;
use crate::store::{GitCliStore, MemoryStore, Repository};
use crate::subtree::SubtreeIndex;
use crate::tree::{TreeRequest, TreeView};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Treeview CLI - browse a repository's trees and files as HTML
#[derive(Parser, Debug)]
#[command(name = "treeview")]
#[command(about = "Render repository tree views and file contents as HTML")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Repository directory
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Import the directory as a single in-memory commit instead of reading git objects
    #[arg(long)]
    pub snapshot: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Log output destination
    #[arg(long, value_enum)]
    pub log_output: Option<LogOutput>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Render the tree view of a path as HTML
    Tree {
        /// Revision to show (defaults to the head)
        #[arg(long)]
        rev: Option<String>,
        /// Branch the view is anchored on (defaults to the configured default branch)
        #[arg(long)]
        head: Option<String>,
        /// Emit only the fragment, without a surrounding document
        #[arg(long)]
        fragment: bool,
        /// Path below the repository root
        path: Option<String>,
    },
    /// List directories imported by subtree merges
    Subtrees {
        /// Revision to scan from (defaults to the default branch)
        #[arg(long)]
        rev: Option<String>,
        /// Maximum commits to inspect (0 scans the whole history)
        #[arg(long)]
        limit: Option<usize>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

impl Cli {
    /// Logging config with command-line overrides applied.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.format = format;
        }
        if let Some(output) = self.log_output {
            config.output = output;
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

/// Loaded configuration plus the opened repository backend
pub struct CliContext {
    config: TreeviewConfig,
    settings: ViewSettings,
    links: UrlLinks,
    backend: Box<dyn Repository>,
}

impl CliContext {
    /// Load configuration for `repo_root` and open it as a git repository.
    pub fn new(repo_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = load_config(&repo_root, config_path.as_deref())?;
        let store = GitCliStore::open(&repo_root).map_err(|e| {
            ApiError::ConfigError(format!(
                "Not a git repository {}: {}",
                repo_root.display(),
                e
            ))
        })?;
        let config = with_repo_name(config, store.path());
        Self::with_backend(config, Box::new(store))
    }

    /// Load configuration for `root` and import the directory as one commit.
    pub fn snapshot(root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = load_config(&root, config_path.as_deref())?;
        let (store, commit) = MemoryStore::from_directory(&root, "Snapshot")?;
        let mut store = store;
        let branch = config.repo.default_branch.clone();
        store.set_ref(branch, &commit);
        let root = dunce::canonicalize(&root).unwrap_or(root);
        let config = with_repo_name(config, &root);
        Self::with_backend(config, Box::new(store))
    }

    /// Build a context over an already opened backend.
    pub fn with_backend(config: TreeviewConfig, backend: Box<dyn Repository>) -> Result<Self, ApiError> {
        let settings = ViewSettings::from_config(&config);
        let links = UrlLinks::new(
            &config.links.virtual_root,
            &config.repo.name,
            &config.repo.default_branch,
            config.repo.module_link.clone(),
        )?;
        Ok(CliContext {
            config,
            settings,
            links,
            backend,
        })
    }

    pub fn config(&self) -> &TreeviewConfig {
        &self.config
    }

    fn view(&self) -> TreeView<'_> {
        TreeView::new(
            self.backend.objects(),
            self.backend.history(),
            &self.links,
            &self.settings,
        )
    }

    /// Execute a command and return its output as text.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let mut buf = Vec::new();
        self.execute_to(command, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Execute a command, streaming its output into `out`.
    ///
    /// A failed `tree` command has already written its error page to `out`
    /// when this returns the error.
    pub fn execute_to(&self, command: &Commands, out: &mut dyn Write) -> Result<(), ApiError> {
        match command {
            Commands::Tree {
                rev,
                head,
                fragment,
                path,
            } => {
                let head = head.as_deref().unwrap_or(&self.config.repo.default_branch);
                let request = TreeRequest {
                    head,
                    rev: rev.as_deref(),
                    path: path.as_deref(),
                };
                let mut layout: Box<dyn PageLayout> = if *fragment {
                    Box::new(FragmentLayout)
                } else {
                    Box::new(DocumentLayout::new(self.settings.repo_name.clone()))
                };
                let outcome = self.view().print_tree(out, layout.as_mut(), &request)?;
                info!(path = %outcome.path, rows = outcome.rows, "Tree command complete");
                Ok(())
            }
            Commands::Subtrees { rev, limit, format } => {
                let rev = rev.as_deref().unwrap_or(&self.config.repo.default_branch);
                let limit = limit.or(self.settings.max_subtree_commits);
                let index = self.view().subtrees(rev, limit)?;
                let text = match format.as_str() {
                    "json" => format_subtrees_json(&index)?,
                    "text" => format_subtrees_text(&index, rev),
                    other => {
                        return Err(ApiError::ConfigError(format!(
                            "Invalid format: {} (must be 'text' or 'json')",
                            other
                        )))
                    }
                };
                writeln!(out, "{}", text)?;
                Ok(())
            }
        }
    }
}

fn load_config(root: &Path, config_path: Option<&Path>) -> Result<TreeviewConfig, ApiError> {
    Ok(ConfigLoader::load_for(root, config_path)?)
}

/// Fill in the repository name from its directory when the config leaves it empty.
fn with_repo_name(mut config: TreeviewConfig, root: &Path) -> TreeviewConfig {
    if config.repo.name.is_empty() {
        if let Some(name) = root.file_name() {
            config.repo.name = name.to_string_lossy().trim_end_matches(".git").to_string();
        }
    }
    config
}

/// Format a section heading with bold/underline.
fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn format_subtrees_text(index: &SubtreeIndex, rev: &str) -> String {
    let mut out = format!("{}\n\n", format_section_heading(&format!("Subtrees at {}", rev)));
    if index.is_empty() {
        out.push_str("No subtree merges found.");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Directory", "Split"]);
    for (dir, split) in index.iter() {
        table.add_row(vec![dir, split.unwrap_or("-")]);
    }
    out.push_str(&table.to_string());
    out
}

fn format_subtrees_json(index: &SubtreeIndex) -> Result<String, ApiError> {
    serde_json::to_string_pretty(index)
        .map_err(|e| ApiError::InternalError(format!("Failed to encode subtrees: {}", e)))
}
