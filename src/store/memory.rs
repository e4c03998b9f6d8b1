//! In-memory object store
//!
//! Content-addressed storage held entirely in memory. Identifiers are blake3
//! digests of a kind-prefixed serialization, so equal content always yields
//! the same ContentRef. Used for tests and for rendering a plain directory
//! snapshot without a git repository.

use crate::error::StorageError;
use crate::store::{
    format_commit_buffer, parse_commit_headers, Ancestry, AncestryWalker, CommitRecord,
    ObjectStore,
};
use crate::types::{ContentRef, FileMode, ObjectInfo, ObjectKind, TreeEntry};
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
struct StoredObject {
    kind: ObjectKind,
    size: u64,
    /// `None` once content has been dropped; metadata stays resolvable
    data: Option<Vec<u8>>,
    entries: Option<Vec<TreeEntry>>,
    /// Commit insertion order, used for newest-first ancestry
    seq: u64,
}

/// In-memory object store and ancestry walker
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: HashMap<ContentRef, StoredObject>,
    refs: HashMap<String, ContentRef>,
    next_seq: u64,
}

fn compute_id(kind: ObjectKind, payload: &[u8]) -> ContentRef {
    let mut hasher = blake3::Hasher::new();
    hasher.update(kind.as_str().as_bytes());
    hasher.update(format!(" {}\0", payload.len()).as_bytes());
    hasher.update(payload);
    ContentRef::from_bytes(hasher.finalize().as_bytes().to_vec())
}

fn serialize_tree(entries: &[TreeEntry]) -> Vec<u8> {
    let mut payload = Vec::new();
    for entry in entries {
        payload.extend_from_slice(format!("{:o} {}\0", entry.mode.0, entry.name).as_bytes());
        payload.extend_from_slice(entry.id.as_bytes());
    }
    payload
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, kind: ObjectKind, payload: Vec<u8>, entries: Option<Vec<TreeEntry>>) -> ContentRef {
        let id = compute_id(kind, &payload);
        let seq = self.next_seq;
        if !self.objects.contains_key(&id) {
            self.next_seq += 1;
            self.objects.insert(
                id.clone(),
                StoredObject {
                    kind,
                    size: payload.len() as u64,
                    data: Some(payload),
                    entries,
                    seq,
                },
            );
        }
        id
    }

    /// Store file content.
    pub fn put_blob(&mut self, content: impl Into<Vec<u8>>) -> ContentRef {
        self.insert(ObjectKind::Blob, content.into(), None)
    }

    /// Store a tree. Entries are sorted by name; duplicate names keep the last.
    pub fn put_tree(&mut self, entries: Vec<TreeEntry>) -> ContentRef {
        let mut by_name: Vec<TreeEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            by_name.retain(|existing| existing.name != entry.name);
            by_name.push(entry);
        }
        by_name.sort_by(|a, b| a.name.cmp(&b.name));
        let payload = serialize_tree(&by_name);
        self.insert(ObjectKind::Tree, payload, Some(by_name))
    }

    /// Store a commit pointing at `tree`.
    pub fn put_commit(&mut self, tree: &ContentRef, parents: &[ContentRef], message: &str) -> ContentRef {
        let raw = format_commit_buffer(tree, parents, message);
        self.insert(ObjectKind::Commit, raw, None)
    }

    /// Point a named ref at a commit.
    pub fn set_ref(&mut self, name: impl Into<String>, commit: &ContentRef) {
        self.refs.insert(name.into(), commit.clone());
    }

    /// Forget an object's bytes while keeping its metadata resolvable.
    pub fn drop_content(&mut self, id: &ContentRef) -> bool {
        match self.objects.get_mut(id) {
            Some(object) => {
                object.data = None;
                object.entries = None;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn get(&self, id: &ContentRef) -> Result<&StoredObject, StorageError> {
        self.objects
            .get(id)
            .ok_or_else(|| StorageError::NotFound(id.clone()))
    }

    /// Import a directory snapshot as a single commit.
    ///
    /// Symlinks are stored as blobs holding their target; the executable bit
    /// is preserved on unix. `.git` directories are skipped.
    pub fn from_directory(root: &Path, message: &str) -> Result<(Self, ContentRef), StorageError> {
        let mut store = MemoryStore::new();
        let mut pending: HashMap<PathBuf, Vec<TreeEntry>> = HashMap::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .contents_first(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git");

        for entry in walker {
            let entry = entry.map_err(|e| StorageError::Backend(format!("walk failed: {}", e)))?;
            if entry.depth() == 0 {
                continue;
            }
            let path = entry.path().to_path_buf();
            let name = entry.file_name().to_string_lossy().to_string();
            let file_type = entry.file_type();

            let tree_entry = if file_type.is_dir() {
                let children = pending.remove(&path).unwrap_or_default();
                TreeEntry::new(name, FileMode::DIRECTORY, store.put_tree(children))
            } else if file_type.is_symlink() {
                let target = std::fs::read_link(&path)?;
                let id = store.put_blob(target.to_string_lossy().as_bytes().to_vec());
                TreeEntry::new(name, FileMode::SYMLINK, id)
            } else {
                let content = std::fs::read(&path)?;
                let mode = if is_executable(&entry) {
                    FileMode::EXECUTABLE
                } else {
                    FileMode::REGULAR
                };
                TreeEntry::new(name, mode, store.put_blob(content))
            };

            let parent = path
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StorageError::InvalidPath(path.display().to_string()))?;
            pending.entry(parent).or_default().push(tree_entry);
        }

        let root_entries = pending.remove(root).unwrap_or_default();
        let tree = store.put_tree(root_entries);
        let commit = store.put_commit(&tree, &[], message);
        store.set_ref("HEAD", &commit);
        debug!(objects = store.len(), root = %root.display(), "Imported directory snapshot");
        Ok((store, commit))
    }
}

#[cfg(unix)]
fn is_executable(entry: &walkdir::DirEntry) -> bool {
    use std::os::unix::fs::PermissionsExt;
    entry
        .metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_entry: &walkdir::DirEntry) -> bool {
    false
}

impl ObjectStore for MemoryStore {
    fn object_info(&self, id: &ContentRef) -> Result<ObjectInfo, StorageError> {
        let object = self.get(id)?;
        Ok(ObjectInfo {
            kind: object.kind,
            size: object.size,
        })
    }

    fn read_object(&self, id: &ContentRef) -> Result<Vec<u8>, StorageError> {
        let object = self.get(id)?;
        object.data.clone().ok_or_else(|| StorageError::Unreadable {
            id: id.clone(),
            reason: "content dropped".to_string(),
        })
    }

    fn read_tree(&self, id: &ContentRef) -> Result<Vec<TreeEntry>, StorageError> {
        let object = self.get(id)?;
        if object.kind != ObjectKind::Tree {
            return Err(StorageError::WrongKind {
                id: id.clone(),
                expected: "tree",
                actual: object.kind.as_str(),
            });
        }
        object.entries.clone().ok_or_else(|| StorageError::Unreadable {
            id: id.clone(),
            reason: "content dropped".to_string(),
        })
    }

    fn resolve_revision(&self, rev: &str) -> Result<ContentRef, StorageError> {
        let by_ref = self
            .refs
            .get(rev)
            .or_else(|| self.refs.get(&format!("refs/heads/{}", rev)))
            .cloned();
        let id = match by_ref {
            Some(id) => id,
            None => ContentRef::from_hex(rev)
                .ok()
                .filter(|id| self.objects.contains_key(id))
                .ok_or_else(|| StorageError::InvalidRevision(rev.to_string()))?,
        };
        let object = self.get(&id)?;
        if object.kind != ObjectKind::Commit {
            return Err(StorageError::WrongKind {
                id,
                expected: "commit",
                actual: object.kind.as_str(),
            });
        }
        Ok(id)
    }

    fn commit_tree(&self, commit: &ContentRef) -> Result<ContentRef, StorageError> {
        let raw = self.read_object(commit)?;
        parse_commit_headers(&raw)
            .map(|(tree, _)| tree)
            .ok_or_else(|| StorageError::Unreadable {
                id: commit.clone(),
                reason: "missing tree header".to_string(),
            })
    }
}

/// Newest-first walk over commits in the memory store
struct MemoryAncestry<'a> {
    store: &'a MemoryStore,
    queue: BinaryHeap<(u64, ContentRef)>,
    seen: HashSet<ContentRef>,
}

impl<'a> Iterator for MemoryAncestry<'a> {
    type Item = Result<CommitRecord, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, id) = self.queue.pop()?;
        let raw = match self.store.read_object(&id) {
            Ok(raw) => raw,
            Err(e) => return Some(Err(e)),
        };
        if let Some((_, parents)) = parse_commit_headers(&raw) {
            for parent in parents {
                if !self.seen.insert(parent.clone()) {
                    continue;
                }
                if let Ok(object) = self.store.get(&parent) {
                    self.queue.push((object.seq, parent));
                }
            }
        }
        Some(Ok(CommitRecord { id, raw }))
    }
}

impl AncestryWalker for MemoryStore {
    fn walk_ancestry<'a>(&'a self, start: &ContentRef) -> Result<Ancestry<'a>, StorageError> {
        let object = self.get(start)?;
        let mut queue = BinaryHeap::new();
        queue.push((object.seq, start.clone()));
        let mut seen = HashSet::new();
        seen.insert(start.clone());
        Ok(Box::new(MemoryAncestry {
            store: self,
            queue,
            seen,
        }))
    }
}
