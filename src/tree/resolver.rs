//! Path resolution state machine
//!
//! Descends from a commit's root tree toward the requested path. A matched
//! directory is listed one level deep; a matched file is handed to the
//! content renderer. The walk state moves out of `Searching` at most once.

use crate::error::{ApiError, StorageError};
use crate::render::content::{print_object, ContentOutcome};
use crate::render::html::Html;
use crate::render::layout::PageLayout;
use crate::render::listing::{write_entry_row, write_listing_head, write_listing_tail, RowOutcome};
use crate::render::RenderContext;
use crate::subtree::SubtreeIndex;
use crate::tree::path::{join_path, PathCursor};
use crate::tree::walk::{walk_tree, Descend, TreeVisitor};
use crate::types::{ContentRef, TreeEntry};
use serde::Serialize;
use tracing::debug;

/// Resolver state for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkState {
    Searching,
    FoundDirectory,
    FoundBlob,
}

/// Result of a completed resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub state: WalkState,
    /// Listing rows emitted, including error rows
    pub rows: usize,
    pub bad_rows: usize,
    pub content: Option<ContentOutcome>,
}

/// Row counters for a listing in progress
#[derive(Debug, Default, Clone, Copy)]
struct RowTally {
    rows: usize,
    bad_rows: usize,
}

impl RowTally {
    fn record(&mut self, outcome: RowOutcome) {
        self.rows += 1;
        if outcome != RowOutcome::Rendered {
            self.bad_rows += 1;
        }
    }
}

/// Visitor carrying the resolver's state through the traversal
pub struct PathWalk<'r, 'o> {
    html: &'r mut Html<'o>,
    layout: &'r mut dyn PageLayout,
    ctx: &'r RenderContext<'r>,
    subtrees: Option<&'r SubtreeIndex>,
    target: &'r str,
    state: WalkState,
    listing_open: bool,
    tally: RowTally,
    content: Option<ContentOutcome>,
}

impl<'r, 'o> PathWalk<'r, 'o> {
    pub fn new(
        html: &'r mut Html<'o>,
        layout: &'r mut dyn PageLayout,
        ctx: &'r RenderContext<'r>,
        subtrees: Option<&'r SubtreeIndex>,
        target: &'r str,
    ) -> Self {
        PathWalk {
            html,
            layout,
            ctx,
            subtrees,
            target,
            state: WalkState::Searching,
            listing_open: false,
            tally: RowTally::default(),
            content: None,
        }
    }

    /// Close whatever the terminal state opened, or fail if nothing matched.
    pub fn finish(self) -> Result<Resolution, ApiError> {
        match self.state {
            WalkState::Searching => {
                debug!(target = self.target, "Path not found");
                return Err(ApiError::NotFound("Path not found".to_string()));
            }
            WalkState::FoundDirectory => {
                // A directory matched but its tree never reached `enter`.
                if !self.listing_open {
                    return Err(ApiError::InternalError(format!(
                        "Error reading tree {}",
                        self.target
                    )));
                }
                write_listing_tail(self.html)?;
                self.layout.end(self.html)?;
            }
            WalkState::FoundBlob => self.layout.end(self.html)?,
        }
        Ok(Resolution {
            state: self.state,
            rows: self.tally.rows,
            bad_rows: self.tally.bad_rows,
            content: self.content,
        })
    }
}

impl TreeVisitor for PathWalk<'_, '_> {
    fn visit(&mut self, base: &str, entry: &TreeEntry) -> Result<Descend, ApiError> {
        match self.state {
            WalkState::FoundDirectory => {
                let outcome = write_entry_row(self.html, self.ctx, self.subtrees, self.target, entry)?;
                self.tally.record(outcome);
                Ok(Descend::Skip)
            }
            WalkState::FoundBlob => Ok(Descend::Skip),
            WalkState::Searching => {
                let path = join_path(base, &entry.name);
                if path != self.target {
                    return Ok(Descend::Recurse);
                }
                if entry.mode.is_dir() {
                    debug!(path = %path, "Matched directory");
                    self.state = WalkState::FoundDirectory;
                    Ok(Descend::Recurse)
                } else {
                    debug!(path = %path, "Matched file");
                    self.state = WalkState::FoundBlob;
                    let outcome =
                        print_object(self.html, self.layout, self.ctx, &entry.id, &path)?;
                    self.content = Some(outcome);
                    Ok(Descend::Skip)
                }
            }
        }
    }

    fn enter(&mut self, path: &str, entries: &[TreeEntry]) -> Result<(), ApiError> {
        if self.state == WalkState::FoundDirectory && !self.listing_open && path == self.target {
            debug!(path, entries = entries.len(), "Listing directory");
            self.layout.begin(self.html, path)?;
            write_listing_head(self.html)?;
            self.listing_open = true;
        }
        Ok(())
    }
}

/// List the root tree of a commit.
pub fn list_root(
    html: &mut Html<'_>,
    layout: &mut dyn PageLayout,
    ctx: &RenderContext<'_>,
    subtrees: Option<&SubtreeIndex>,
    root: &ContentRef,
) -> Result<Resolution, ApiError> {
    let entries = ctx.store.read_tree(root).map_err(|e| match e {
        StorageError::Unreadable { .. } | StorageError::IoError(_) | StorageError::Backend(_) => {
            ApiError::from(e)
        }
        _ => ApiError::NotFound(format!("Not a tree object: {}", root)),
    })?;
    debug!(tree = %root, entries = entries.len(), "Listing root tree");

    layout.begin(html, &ctx.settings.repo_name)?;
    write_listing_head(html)?;
    let mut tally = RowTally::default();
    for entry in &entries {
        tally.record(write_entry_row(html, ctx, subtrees, "", entry)?);
    }
    write_listing_tail(html)?;
    layout.end(html)?;

    Ok(Resolution {
        state: WalkState::FoundDirectory,
        rows: tally.rows,
        bad_rows: tally.bad_rows,
        content: None,
    })
}

/// Resolve `target` below `root` and render what it names.
///
/// `target` must already be normalized; an empty target lists the root.
pub fn resolve_path(
    html: &mut Html<'_>,
    layout: &mut dyn PageLayout,
    ctx: &RenderContext<'_>,
    subtrees: Option<&SubtreeIndex>,
    root: &ContentRef,
    target: &str,
) -> Result<Resolution, ApiError> {
    if target.is_empty() {
        return list_root(html, layout, ctx, subtrees, root);
    }
    let mut walk = PathWalk::new(html, layout, ctx, subtrees, target);
    walk_tree(ctx.store, root, PathCursor::new(target), &mut walk)?;
    walk.finish()
}
