//! Git object store over the `git` plumbing commands
//!
//! Every call spawns a short-lived `git` process against the repository
//! directory. Nothing is cached between calls.

use crate::error::StorageError;
use crate::store::{parse_commit_headers, Ancestry, AncestryWalker, CommitRecord, ObjectStore};
use crate::types::{ContentRef, FileMode, ObjectInfo, ObjectKind, TreeEntry};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use tracing::debug;

/// Object store backed by a git repository on disk
#[derive(Debug, Clone)]
pub struct GitCliStore {
    repo: PathBuf,
}

impl GitCliStore {
    /// Open a repository (work tree or bare). Fails if `git` does not recognize it.
    pub fn open(repo: &Path) -> Result<Self, StorageError> {
        let repo = dunce::canonicalize(repo)?;
        let store = GitCliStore { repo };
        store.git(&["rev-parse", "--git-dir"])?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.repo
    }

    fn command(&self) -> Command {
        let mut command = Command::new("git");
        command.arg("-C").arg(&self.repo);
        command
    }

    fn git(&self, args: &[&str]) -> Result<Vec<u8>, StorageError> {
        let output = self
            .command()
            .args(args)
            .stdin(Stdio::null())
            .output()?;
        if !output.status.success() {
            return Err(StorageError::Backend(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(output.stdout)
    }

    fn rev_parse(&self, spec: &str) -> Option<ContentRef> {
        let output = self.git(&["rev-parse", "--verify", "--quiet", spec]).ok()?;
        ContentRef::from_hex(String::from_utf8_lossy(&output).trim()).ok()
    }

    /// Run a `cat-file` batch mode with a single id on stdin.
    fn cat_file_batch(&self, mode: &str, id: &ContentRef) -> Result<Vec<u8>, StorageError> {
        let mut child = self
            .command()
            .args(["cat-file", mode])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            writeln!(stdin, "{}", id)?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(StorageError::Backend(format!("git cat-file {} failed", mode)));
        }
        Ok(output.stdout)
    }
}

/// Parse a `cat-file --batch-check` header line: `<id> <type> <size>` or `<id> missing`.
fn parse_batch_header(id: &ContentRef, line: &str) -> Result<ObjectInfo, StorageError> {
    let mut fields = line.split_whitespace();
    let _ = fields.next();
    let kind = fields.next().unwrap_or("missing");
    if kind == "missing" || kind == "ambiguous" {
        return Err(StorageError::NotFound(id.clone()));
    }
    let kind = ObjectKind::parse(kind).ok_or_else(|| StorageError::WrongKind {
        id: id.clone(),
        expected: "tree, blob or commit",
        actual: "tag",
    })?;
    let size = fields
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| StorageError::Backend(format!("malformed cat-file header: {}", line)))?;
    Ok(ObjectInfo { kind, size })
}

/// Parse `git ls-tree -z` output: `<mode> SP <type> SP <id> TAB <name> NUL`.
fn parse_ls_tree(output: &[u8]) -> Result<Vec<TreeEntry>, StorageError> {
    let mut entries = Vec::new();
    for record in output.split(|b| *b == 0) {
        if record.is_empty() {
            continue;
        }
        let record = String::from_utf8_lossy(record);
        let (meta, name) = record
            .split_once('\t')
            .ok_or_else(|| StorageError::Backend(format!("malformed ls-tree record: {}", record)))?;
        let mut fields = meta.split(' ');
        let mode = fields.next().and_then(FileMode::from_octal);
        let _kind = fields.next();
        let id = fields.next().and_then(|hex| ContentRef::from_hex(hex).ok());
        match (mode, id) {
            (Some(mode), Some(id)) => entries.push(TreeEntry::new(name, mode, id)),
            _ => {
                return Err(StorageError::Backend(format!(
                    "malformed ls-tree record: {}",
                    record
                )))
            }
        }
    }
    Ok(entries)
}

impl ObjectStore for GitCliStore {
    fn object_info(&self, id: &ContentRef) -> Result<ObjectInfo, StorageError> {
        let output = self.cat_file_batch("--batch-check", id)?;
        let line = String::from_utf8_lossy(&output);
        parse_batch_header(id, line.trim_end())
    }

    fn read_object(&self, id: &ContentRef) -> Result<Vec<u8>, StorageError> {
        let output = self.cat_file_batch("--batch", id)?;
        let newline = output.iter().position(|b| *b == b'\n').ok_or_else(|| {
            StorageError::Unreadable {
                id: id.clone(),
                reason: "empty cat-file output".to_string(),
            }
        })?;
        let header = String::from_utf8_lossy(&output[..newline]);
        let info = parse_batch_header(id, &header)?;
        let start = newline + 1;
        let end = start + info.size as usize;
        if output.len() < end {
            return Err(StorageError::Unreadable {
                id: id.clone(),
                reason: format!("expected {} bytes, got {}", info.size, output.len() - start),
            });
        }
        Ok(output[start..end].to_vec())
    }

    fn read_tree(&self, id: &ContentRef) -> Result<Vec<TreeEntry>, StorageError> {
        let info = self.object_info(id)?;
        if info.kind != ObjectKind::Tree {
            return Err(StorageError::WrongKind {
                id: id.clone(),
                expected: "tree",
                actual: info.kind.as_str(),
            });
        }
        let output = self
            .git(&["ls-tree", "-z", &id.to_hex()])
            .map_err(|e| StorageError::Unreadable {
                id: id.clone(),
                reason: e.to_string(),
            })?;
        parse_ls_tree(&output)
    }

    fn resolve_revision(&self, rev: &str) -> Result<ContentRef, StorageError> {
        if rev.starts_with('-') {
            return Err(StorageError::InvalidRevision(rev.to_string()));
        }
        // Tags peel to their commit; anything else naming a non-commit is rejected by kind.
        if let Some(id) = self.rev_parse(&format!("{}^{{commit}}", rev)) {
            return Ok(id);
        }
        let id = self
            .rev_parse(rev)
            .ok_or_else(|| StorageError::InvalidRevision(rev.to_string()))?;
        let info = self.object_info(&id)?;
        Err(StorageError::WrongKind {
            id,
            expected: "commit",
            actual: info.kind.as_str(),
        })
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

/// Commit ids read from a running `git rev-list`, one line at a time
struct RevList {
    child: Child,
    ids: IdLines<BufReader<ChildStdout>>,
    finished: bool,
}

impl RevList {
    fn spawn(mut command: Command) -> Result<Self, StorageError> {
        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| StorageError::Backend("rev-list stdout missing".to_string()))?;
        Ok(RevList {
            child,
            ids: IdLines::new(BufReader::new(stdout)),
            finished: false,
        })
    }
}

impl Iterator for RevList {
    type Item = Result<ContentRef, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.ids.next() {
            Some(item) => Some(item),
            None => {
                self.finished = true;
                match self.child.wait() {
                    Ok(status) if status.success() => None,
                    Ok(status) => Some(Err(StorageError::Backend(format!(
                        "git rev-list exited with {}",
                        status
                    )))),
                    Err(e) => Some(Err(e.into())),
                }
            }
        }
    }
}

impl Drop for RevList {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Hex ids parsed lazily from newline-separated output
struct IdLines<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> IdLines<R> {
    fn new(reader: R) -> Self {
        IdLines {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> Iterator for IdLines<R> {
    type Item = Result<ContentRef, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            return Some(ContentRef::from_hex(line).map_err(|e| {
                StorageError::Backend(format!("malformed rev-list line {:?}: {}", line, e))
            }));
        }
    }
}

impl AncestryWalker for GitCliStore {
    /// Streams `git rev-list`; commits past what the caller takes are never listed or read.
    fn walk_ancestry<'a>(&'a self, start: &ContentRef) -> Result<Ancestry<'a>, StorageError> {
        let mut command = self.command();
        command.arg("rev-list").arg(start.to_hex());
        let ids = RevList::spawn(command)?;
        debug!(start = %start, "Streaming ancestry");
        Ok(Box::new(ids.map(move |id| {
            let id = id?;
            let raw = self.read_object(&id)?;
            Ok(CommitRecord { id, raw })
        })))
    }
}
