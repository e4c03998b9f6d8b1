//! Core types for tree resolution and rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ContentRef: content-derived identifier of a stored object (tree, blob, or commit)
///
/// Length depends on the backing store (20 bytes for SHA-1 git ids,
/// 32 bytes for blake3 ids minted by the in-memory store).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentRef(Vec<u8>);

impl ContentRef {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        ContentRef(bytes.into())
    }

    /// Parse a hex-encoded identifier.
    pub fn from_hex(text: &str) -> Result<Self, hex::FromHexError> {
        hex::decode(text.trim()).map(ContentRef)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Abbreviated form used in link labels.
    pub fn short(&self) -> String {
        let full = self.to_hex();
        full[..full.len().min(7)].to_string()
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentRef({})", self.to_hex())
    }
}

/// Kind of a stored object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Tree,
    Blob,
    Commit,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Tree => "tree",
            ObjectKind::Blob => "blob",
            ObjectKind::Commit => "commit",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "tree" => Some(ObjectKind::Tree),
            "blob" => Some(ObjectKind::Blob),
            "commit" => Some(ObjectKind::Commit),
            _ => None,
        }
    }
}

/// Object metadata resolved without reading content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectInfo {
    pub kind: ObjectKind,
    pub size: u64,
}

/// Classification of a tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
    Submodule,
}

const S_IFMT: u32 = 0o170000;
const S_IFDIR: u32 = 0o040000;
const S_IFLNK: u32 = 0o120000;
const S_IFGITLINK: u32 = 0o160000;

/// Raw git-style file mode of a tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileMode(pub u32);

impl FileMode {
    pub const DIRECTORY: FileMode = FileMode(0o040000);
    pub const REGULAR: FileMode = FileMode(0o100644);
    pub const EXECUTABLE: FileMode = FileMode(0o100755);
    pub const SYMLINK: FileMode = FileMode(0o120000);
    pub const SUBMODULE: FileMode = FileMode(0o160000);

    /// Parse an octal mode as printed by `git ls-tree`.
    pub fn from_octal(text: &str) -> Option<Self> {
        u32::from_str_radix(text, 8).ok().map(FileMode)
    }

    pub fn kind(&self) -> EntryKind {
        match self.0 & S_IFMT {
            S_IFDIR => EntryKind::Directory,
            S_IFLNK => EntryKind::Symlink,
            S_IFGITLINK => EntryKind::Submodule,
            _ => EntryKind::File,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind() == EntryKind::Directory
    }

    /// `ls -l` style rendering, e.g. `-rw-r--r--`.
    pub fn glyph(&self) -> String {
        let mut out = String::with_capacity(10);
        out.push(match self.kind() {
            EntryKind::Directory => 'd',
            EntryKind::Symlink => 'l',
            EntryKind::Submodule => 'm',
            EntryKind::File => '-',
        });
        let bits = self.0;
        for shift in [6u32, 3, 0] {
            let triple = (bits >> shift) & 0o7;
            out.push(if triple & 0o4 != 0 { 'r' } else { '-' });
            out.push(if triple & 0o2 != 0 { 'w' } else { '-' });
            out.push(if triple & 0o1 != 0 { 'x' } else { '-' });
        }
        out
    }
}

/// TreeEntry: one named child of a tree
///
/// Size is not carried here; it is resolved lazily through the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub mode: FileMode,
    pub id: ContentRef,
}

impl TreeEntry {
    pub fn new(name: impl Into<String>, mode: FileMode, id: ContentRef) -> Self {
        TreeEntry {
            name: name.into(),
            mode,
            id,
        }
    }

    pub fn kind(&self) -> EntryKind {
        self.mode.kind()
    }
}
