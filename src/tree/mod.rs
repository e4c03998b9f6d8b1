//! Tree view
//!
//! Entry point for one tree-view request: resolve the revision, collect
//! subtree annotations if enabled, then walk to the requested path and
//! render either a directory listing or a file's content.

pub mod path;
pub mod resolver;
pub mod walk;

use crate::error::{ApiError, StorageError};
use crate::render::content::ContentOutcome;
use crate::render::html::Html;
use crate::render::layout::PageLayout;
use crate::render::links::LinkBuilder;
use crate::render::{RenderContext, ViewSettings};
use crate::store::{AncestryWalker, ObjectStore};
use crate::subtree::{collect_subtrees, SubtreeIndex};
use crate::types::ContentRef;
use path::normalize_request_path;
use resolver::{resolve_path, WalkState};
use std::io::Write;
use tracing::{debug, info, warn};

/// One tree-view request
#[derive(Debug, Clone, Copy)]
pub struct TreeRequest<'a> {
    /// Branch the view is anchored on
    pub head: &'a str,
    /// Revision to show; defaults to `head`
    pub rev: Option<&'a str>,
    /// Path below the root tree; `None` or empty lists the root
    pub path: Option<&'a str>,
}

/// What a successful request rendered
#[derive(Debug, Clone)]
pub struct TreeOutcome {
    pub state: WalkState,
    pub path: String,
    pub rows: usize,
    pub bad_rows: usize,
    pub content: Option<ContentOutcome>,
    pub subtrees: Option<SubtreeIndex>,
}

/// Collaborators shared by tree-view requests against one repository
pub struct TreeView<'a> {
    pub store: &'a dyn ObjectStore,
    pub history: &'a dyn AncestryWalker,
    pub links: &'a dyn LinkBuilder,
    pub settings: &'a ViewSettings,
}

impl<'a> TreeView<'a> {
    pub fn new(
        store: &'a dyn ObjectStore,
        history: &'a dyn AncestryWalker,
        links: &'a dyn LinkBuilder,
        settings: &'a ViewSettings,
    ) -> Self {
        TreeView {
            store,
            history,
            links,
            settings,
        }
    }

    /// Render the tree view for `request` into `out`.
    ///
    /// Failures that carry a status are rendered through
    /// `layout.error_page` before being returned; output errors are not.
    pub fn print_tree(
        &self,
        out: &mut dyn Write,
        layout: &mut dyn PageLayout,
        request: &TreeRequest<'_>,
    ) -> Result<TreeOutcome, ApiError> {
        let mut html = Html::new(out);
        match self.render(&mut html, layout, request) {
            Ok(outcome) => {
                info!(
                    path = %outcome.path,
                    state = ?outcome.state,
                    rows = outcome.rows,
                    "Rendered tree view"
                );
                Ok(outcome)
            }
            Err(e) => {
                if let Some(status) = e.status_code() {
                    warn!(status, error = %e, "Tree view failed");
                    layout.error_page(&mut html, status, e.title(), &e.message())?;
                }
                Err(e)
            }
        }
    }

    /// Resolve a revision to its commit, mapping failures to request errors.
    pub fn resolve_commit(&self, rev: &str) -> Result<ContentRef, ApiError> {
        self.store.resolve_revision(rev).map_err(|e| match e {
            StorageError::InvalidRevision(_) | StorageError::NotFound(_) => {
                ApiError::NotFound(format!("Invalid revision name: {}", rev))
            }
            StorageError::WrongKind { .. } => {
                ApiError::NotFound(format!("Invalid commit reference: {}", rev))
            }
            other => ApiError::from(other),
        })
    }

    /// Subtree annotations reachable from `rev`.
    pub fn subtrees(&self, rev: &str, max_commits: Option<usize>) -> Result<SubtreeIndex, ApiError> {
        let commit = self.resolve_commit(rev)?;
        Ok(collect_subtrees(self.history, &commit, max_commits))
    }

    fn render(
        &self,
        html: &mut Html<'_>,
        layout: &mut dyn PageLayout,
        request: &TreeRequest<'_>,
    ) -> Result<TreeOutcome, ApiError> {
        let rev = request.rev.unwrap_or(request.head);
        let commit = self.resolve_commit(rev)?;
        let root = self
            .store
            .commit_tree(&commit)
            .map_err(|_| ApiError::NotFound(format!("Invalid commit reference: {}", rev)))?;
        debug!(rev, commit = %commit, tree = %root, "Resolved revision");

        let subtrees = if self.settings.enable_subtree {
            Some(collect_subtrees(
                self.history,
                &commit,
                self.settings.max_subtree_commits,
            ))
        } else {
            None
        };

        let target = normalize_request_path(request.path.unwrap_or(""));
        let ctx = RenderContext {
            store: self.store,
            links: self.links,
            settings: self.settings,
            head: request.head,
            rev,
        };
        let resolution = resolve_path(html, layout, &ctx, subtrees.as_ref(), &root, &target)?;

        Ok(TreeOutcome {
            state: resolution.state,
            path: target,
            rows: resolution.rows,
            bad_rows: resolution.bad_rows,
            content: resolution.content,
            subtrees,
        })
    }
}
