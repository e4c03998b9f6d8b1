//! Breadcrumb compression for directory links.
//!
//! A directory whose tree holds exactly one child directory is rendered
//! together with that child as `a / b / c`, following the chain until it
//! branches, ends, or reaches a non-directory.

use crate::render::html::Html;
use crate::render::links::{write_link, LinkKind, ViewLink};
use crate::render::RenderContext;
use crate::types::{ContentRef, TreeEntry};
use std::io;

/// Paths of the emitted segments, outermost first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumb {
    pub segments: Vec<String>,
}

impl Breadcrumb {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path the deepest segment links to.
    pub fn deepest(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

/// Sole child of a tree, if the tree holds exactly one entry and it is a directory.
fn sole_child_dir(ctx: &RenderContext<'_>, tree: &ContentRef) -> Option<TreeEntry> {
    let entries = ctx.store.read_tree(tree).ok()?;
    match entries.as_slice() {
        [only] if only.mode.is_dir() => Some(only.clone()),
        _ => None,
    }
}

/// Emit the compressed link chain for a directory entry.
///
/// `fullpath` holds the entry's own path on entry and is restored to that
/// length before returning, on every path.
pub fn write_tree_link(
    html: &mut Html<'_>,
    ctx: &RenderContext<'_>,
    entry: &TreeEntry,
    fullpath: &mut String,
) -> io::Result<Breadcrumb> {
    let initial = fullpath.len();
    let result = write_chain(html, ctx, entry, fullpath);
    fullpath.truncate(initial);
    result
}

fn write_chain(
    html: &mut Html<'_>,
    ctx: &RenderContext<'_>,
    entry: &TreeEntry,
    fullpath: &mut String,
) -> io::Result<Breadcrumb> {
    let mut crumb = Breadcrumb::default();
    let mut name = entry.name.clone();
    let mut tree = entry.id.clone();

    loop {
        let link = ViewLink {
            kind: LinkKind::Tree,
            head: ctx.head,
            rev: ctx.rev,
            path: fullpath.as_str(),
        };
        write_link(html, ctx.links, &link, &name, Some("ls-dir"))?;
        crumb.segments.push(fullpath.clone());

        let Some(child) = sole_child_dir(ctx, &tree) else {
            break;
        };
        html.raw(" / ")?;
        fullpath.push('/');
        fullpath.push_str(&child.name);
        name = child.name;
        tree = child.id;
    }

    Ok(crumb)
}
