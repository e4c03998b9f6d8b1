//! Subtree Annotations
//!
//! Mines commit history for `git subtree` merge trailers and records which
//! directories were imported from another project, keyed by normalized path.

use crate::store::{AncestryWalker, CommitRecord};
use crate::types::ContentRef;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

const SUBTREE_DIR_KEY: &str = "git-subtree-dir:";
const SUBTREE_SPLIT_KEY: &str = "git-subtree-split:";

/// Normalized directory path -> optional split label
///
/// Each key is write-once: the first insertion wins and later ones are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubtreeIndex {
    dirs: BTreeMap<String, Option<String>>,
}

/// Strip surrounding whitespace, all trailing slashes and one leading slash.
pub fn normalize_dir(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let stripped = trimmed.strip_prefix('/').unwrap_or(trimmed);
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

impl SubtreeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert if absent; returns whether the entry was added.
    pub fn insert(&mut self, dir: &str, split: Option<&str>) -> bool {
        let Some(key) = normalize_dir(dir) else {
            return false;
        };
        if self.dirs.contains_key(&key) {
            return false;
        }
        let label = split
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self.dirs.insert(key, label);
        true
    }

    /// Look up a directory. `None` if it is not a known subtree; `Some(label)` otherwise.
    pub fn get(&self, path: &str) -> Option<Option<&str>> {
        let key = normalize_dir(path)?;
        self.dirs.get(&key).map(|label| label.as_deref())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.dirs.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

/// Message body: text after the first blank line, with extra blank lines skipped.
pub fn commit_message_body(raw: &[u8]) -> Option<&[u8]> {
    let start = raw.windows(2).position(|w| w == b"\n\n")? + 2;
    let body = &raw[start..];
    let skip = body.iter().take_while(|b| **b == b'\n').count();
    Some(&body[skip..])
}

/// Trailers extracted from one commit message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtreeTrailers {
    pub dir: Option<String>,
    pub split: Option<String>,
}

/// Scan a raw commit buffer for subtree trailers. Later lines override earlier ones.
pub fn parse_subtree_trailers(raw: &[u8]) -> SubtreeTrailers {
    let mut trailers = SubtreeTrailers::default();
    let Some(body) = commit_message_body(raw) else {
        return trailers;
    };
    let body = String::from_utf8_lossy(body);
    for line in body.split('\n') {
        if let Some(value) = line.strip_prefix(SUBTREE_DIR_KEY) {
            trailers.dir = normalize_dir(value);
        } else if let Some(value) = line.strip_prefix(SUBTREE_SPLIT_KEY) {
            let value = value.trim();
            trailers.split = (!value.is_empty()).then(|| value.to_string());
        }
    }
    trailers
}

fn absorb_commit(index: &mut SubtreeIndex, commit: CommitRecord) {
    let trailers = parse_subtree_trailers(&commit.raw);
    drop(commit);
    if let Some(dir) = trailers.dir {
        if index.insert(&dir, trailers.split.as_deref()) {
            debug!(dir = %dir, split = ?trailers.split, "Recorded subtree directory");
        }
    }
}

/// Walk ancestry from `start`, newest first, and collect subtree directories.
///
/// `max_commits` of `None` or `Some(0)` walks the whole history. Failures are
/// logged and end the walk early; they never fail the request.
pub fn collect_subtrees(
    history: &dyn AncestryWalker,
    start: &ContentRef,
    max_commits: Option<usize>,
) -> SubtreeIndex {
    let mut index = SubtreeIndex::new();
    let limit = match max_commits {
        Some(0) | None => usize::MAX,
        Some(n) => n,
    };

    let ancestry = match history.walk_ancestry(start) {
        Ok(ancestry) => ancestry,
        Err(e) => {
            warn!(start = %start, error = %e, "Subtree scan skipped: ancestry unavailable");
            return index;
        }
    };

    let mut visited = 0usize;
    for commit in ancestry.take(limit) {
        visited += 1;
        match commit {
            Ok(commit) => absorb_commit(&mut index, commit),
            Err(e) => debug!(error = %e, "Skipping unreadable commit during subtree scan"),
        }
    }
    debug!(visited, subtrees = index.len(), "Subtree scan complete");
    index
}
