//! Repository path helpers and the descent cursor.

/// Remaining unmatched suffix of the requested path during descent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathCursor<'a> {
    remaining: &'a str,
}

impl<'a> PathCursor<'a> {
    /// Cursor over a normalized path; an empty path starts exhausted.
    pub fn new(path: &'a str) -> Self {
        PathCursor { remaining: path }
    }

    /// True once every segment has been matched.
    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Next unmatched segment.
    pub fn head(&self) -> Option<&'a str> {
        if self.remaining.is_empty() {
            return None;
        }
        self.remaining.split('/').next()
    }

    /// Cursor for the child named `segment`, if it is the next segment.
    pub fn descend(&self, segment: &str) -> Option<PathCursor<'a>> {
        let head = self.head()?;
        if head != segment {
            return None;
        }
        let rest = self.remaining[head.len()..].trim_start_matches('/');
        Some(PathCursor { remaining: rest })
    }
}

/// Normalize a requested path: no surrounding slashes, no empty segments.
pub fn normalize_request_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a parent path and a child name; an empty parent is the root.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), name)
    }
}

/// Collapse `.` and `..` segments. Returns `None` if the path climbs above the root.
pub fn normalize_path(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}

/// Resolve a symlink target relative to the link's own path.
pub fn resolve_link_target(link_path: &str, target: &str) -> Option<String> {
    normalize_path(&format!("{}/../{}", link_path, target))
}

/// Final segment of a path.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Extension of a file name: text after the last `.`, if any.
pub fn extension(name: &str) -> Option<&str> {
    name.rfind('.').map(|idx| &name[idx + 1..])
}
