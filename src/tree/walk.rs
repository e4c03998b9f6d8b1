//! Pathspec-limited depth-first traversal over store trees.
//!
//! An entry is offered to the visitor only when its accumulated path is the
//! target, an ancestor of it, or below it. The visitor decides per entry
//! whether a directory is descended into.

use crate::error::ApiError;
use crate::store::ObjectStore;
use crate::tree::path::PathCursor;
use crate::types::{ContentRef, TreeEntry};

/// Visitor decision for a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descend {
    Recurse,
    Skip,
}

/// Per-entry callbacks driven by [`walk_tree`]
pub trait TreeVisitor {
    /// Called for each admitted entry; `base` is the parent's path.
    fn visit(&mut self, base: &str, entry: &TreeEntry) -> Result<Descend, ApiError>;

    /// Called once a directory's entries have been read, before they are visited.
    fn enter(&mut self, _path: &str, _entries: &[TreeEntry]) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Walk `tree` along `cursor`, offering matching entries to `visitor`.
pub fn walk_tree(
    store: &dyn ObjectStore,
    tree: &ContentRef,
    cursor: PathCursor<'_>,
    visitor: &mut dyn TreeVisitor,
) -> Result<(), ApiError> {
    let entries = store.read_tree(tree)?;
    let mut base = String::new();
    walk_entries(store, &entries, &mut base, cursor, visitor)
}

fn walk_entries(
    store: &dyn ObjectStore,
    entries: &[TreeEntry],
    base: &mut String,
    cursor: PathCursor<'_>,
    visitor: &mut dyn TreeVisitor,
) -> Result<(), ApiError> {
    for entry in entries {
        let next = if cursor.is_exhausted() {
            cursor
        } else {
            match cursor.descend(&entry.name) {
                Some(next) => next,
                None => continue,
            }
        };

        if visitor.visit(base, entry)? == Descend::Skip || !entry.mode.is_dir() {
            continue;
        }

        let children = store.read_tree(&entry.id)?;
        let restore = base.len();
        if !base.is_empty() {
            base.push('/');
        }
        base.push_str(&entry.name);
        let result = visitor
            .enter(base, &children)
            .and_then(|()| walk_entries(store, &children, base, next, visitor));
        base.truncate(restore);
        result?;
    }
    Ok(())
}
