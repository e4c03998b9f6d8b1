//! Object Store
//!
//! Read-only access to a content-addressed object store: trees, blobs and
//! commits, plus a newest-first walk over commit ancestry. The renderer
//! never writes through these interfaces.

pub mod git;
pub mod memory;

use crate::error::StorageError;
use crate::types::{ContentRef, ObjectInfo, TreeEntry};

pub use git::GitCliStore;
pub use memory::MemoryStore;

/// Object resolution interface
pub trait ObjectStore {
    /// Resolve type and size without reading content.
    fn object_info(&self, id: &ContentRef) -> Result<ObjectInfo, StorageError>;

    /// Read the raw bytes of an object.
    fn read_object(&self, id: &ContentRef) -> Result<Vec<u8>, StorageError>;

    /// Read the entries of a tree object, in store order.
    fn read_tree(&self, id: &ContentRef) -> Result<Vec<TreeEntry>, StorageError>;

    /// Resolve a revision name (ref name or hex id) to a commit id.
    fn resolve_revision(&self, rev: &str) -> Result<ContentRef, StorageError>;

    /// Root tree of a commit.
    fn commit_tree(&self, commit: &ContentRef) -> Result<ContentRef, StorageError>;
}

/// One visited commit: its id and its raw buffer (headers, blank line, message)
#[derive(Debug, Clone)]
pub struct CommitRecord {
    pub id: ContentRef,
    pub raw: Vec<u8>,
}

/// Lazy, newest-first sequence of commits
pub type Ancestry<'a> = Box<dyn Iterator<Item = Result<CommitRecord, StorageError>> + 'a>;

/// Commit ancestry interface
pub trait AncestryWalker {
    /// Walk commits reachable from `start`, newest first.
    ///
    /// Consumers bound the walk with `Iterator::take`; implementations must
    /// not read commits ahead of demand.
    fn walk_ancestry<'a>(&'a self, start: &ContentRef) -> Result<Ancestry<'a>, StorageError>;
}

/// A backend serving both objects and history
pub trait Repository: ObjectStore + AncestryWalker {
    fn objects(&self) -> &dyn ObjectStore;

    fn history(&self) -> &dyn AncestryWalker;
}

impl<T: ObjectStore + AncestryWalker> Repository for T {
    fn objects(&self) -> &dyn ObjectStore {
        self
    }

    fn history(&self) -> &dyn AncestryWalker {
        self
    }
}

/// Build a raw commit buffer in git's layout.
pub fn format_commit_buffer(
    tree: &ContentRef,
    parents: &[ContentRef],
    message: &str,
) -> Vec<u8> {
    let mut raw = format!("tree {}\n", tree);
    for parent in parents {
        raw.push_str(&format!("parent {}\n", parent));
    }
    raw.push('\n');
    raw.push_str(message);
    raw.into_bytes()
}

/// Parse the `tree` and `parent` headers of a raw commit buffer.
pub fn parse_commit_headers(raw: &[u8]) -> Option<(ContentRef, Vec<ContentRef>)> {
    let text = String::from_utf8_lossy(raw);
    let mut tree = None;
    let mut parents = Vec::new();
    for line in text.lines() {
        if line.is_empty() {
            break;
        }
        if let Some(hex) = line.strip_prefix("tree ") {
            tree = ContentRef::from_hex(hex).ok();
        } else if let Some(hex) = line.strip_prefix("parent ") {
            if let Ok(id) = ContentRef::from_hex(hex) {
                parents.push(id);
            }
        }
    }
    tree.map(|tree| (tree, parents))
}
