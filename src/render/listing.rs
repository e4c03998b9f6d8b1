//! Directory listing rows.

use crate::render::breadcrumb::write_tree_link;
use crate::render::html::Html;
use crate::render::links::{write_link, LinkKind, ViewLink};
use crate::render::RenderContext;
use crate::subtree::SubtreeIndex;
use crate::tree::path::{extension, join_path, resolve_link_target};
use crate::types::{EntryKind, TreeEntry};
use std::io;
use tracing::{debug, warn};

/// How a single listing row came out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Rendered,
    /// Size lookup failed; a one-cell error row was emitted instead
    BadObject,
    /// Row rendered, but the symlink target could not be read
    BrokenSymlink,
}

/// Filter toolbar and the listing table header.
pub fn write_listing_head(html: &mut Html<'_>) -> io::Result<()> {
    html.raw("<div class='tree-toolbar'>")?;
    html.raw("<input id='tree-filter' class='tree-filter' type='search' ")?;
    html.raw("placeholder='Filter files and folders' ")?;
    html.raw("autocomplete='off' aria-label='Filter files'/>")?;
    html.raw("<span id='tree-filter-count' class='tree-filter-count'></span>")?;
    html.raw("</div>")?;
    html.raw("<table summary='tree listing' class='list'>\n")?;
    html.raw("<tr class='nohover'>")?;
    html.raw("<th class='left'>Mode</th>")?;
    html.raw("<th class='left'>Name</th>")?;
    html.raw("<th class='right'>Size</th>")?;
    html.raw("<th/>")?;
    html.raw("</tr>\n")
}

pub fn write_listing_tail(html: &mut Html<'_>) -> io::Result<()> {
    html.raw("</table>\n")
}

/// Render one row for `entry`, a child of the directory at `parent_path`.
pub fn write_entry_row(
    html: &mut Html<'_>,
    ctx: &RenderContext<'_>,
    subtrees: Option<&SubtreeIndex>,
    parent_path: &str,
    entry: &TreeEntry,
) -> io::Result<RowOutcome> {
    let kind = entry.kind();
    let mut fullpath = join_path(parent_path, &entry.name);

    let size = if kind == EntryKind::Submodule {
        None
    } else {
        match ctx.store.object_info(&entry.id) {
            Ok(info) => Some(info.size),
            Err(e) => {
                debug!(path = %fullpath, error = %e, "Listing entry unresolvable");
                html.raw("<tr><td colspan='3'>Bad object: ")?;
                html.txt(&entry.name)?;
                html.fmt(format_args!(" {}</td></tr>", entry.id))?;
                return Ok(RowOutcome::BadObject);
            }
        }
    };

    let subtree = match (kind, subtrees) {
        (EntryKind::Directory, Some(index)) => index.get(&fullpath),
        _ => None,
    };

    html.raw("<tr")?;
    if subtree.is_some() {
        html.raw(" class='ls-subtree'")?;
    }
    html.raw(" data-name='")?;
    html.attr(&entry.name)?;
    html.raw("' data-path='")?;
    html.attr(&fullpath)?;
    html.raw("'><td class='ls-mode'>")?;
    html.raw(&entry.mode.glyph())?;
    html.raw("</td><td>")?;

    let mut outcome = RowOutcome::Rendered;
    match kind {
        EntryKind::Submodule => write_submodule_link(html, ctx, &fullpath, entry)?,
        EntryKind::Directory => {
            write_tree_link(html, ctx, entry, &mut fullpath)?;
            if let Some(split) = subtree {
                html.raw(" <span class='subtree-badge'")?;
                if let Some(split) = split {
                    html.raw(" title='")?;
                    html.attr(&format!("split {}", split))?;
                    html.raw("'")?;
                }
                html.raw(">subtree</span>")?;
            }
        }
        EntryKind::File | EntryKind::Symlink => {
            let class = match extension(&entry.name) {
                Some(ext) => format!("ls-blob {}", ext),
                None => "ls-blob".to_string(),
            };
            let link = ViewLink {
                kind: LinkKind::Tree,
                head: ctx.head,
                rev: ctx.rev,
                path: &fullpath,
            };
            write_link(html, ctx.links, &link, &entry.name, Some(&class))?;
            if kind == EntryKind::Symlink {
                html.raw(" -> ")?;
                outcome = write_symlink_target(html, ctx, &fullpath, entry, &class)?;
            }
        }
    }

    html.raw("</td><td class='ls-size'>")?;
    if let Some(size) = size {
        html.fmt(format_args!("{}", size))?;
    }
    html.raw("</td>")?;

    html.raw("<td>")?;
    write_actions(html, ctx, &fullpath, kind)?;
    html.raw("</td></tr>\n")?;
    Ok(outcome)
}

fn write_submodule_link(
    html: &mut Html<'_>,
    ctx: &RenderContext<'_>,
    fullpath: &str,
    entry: &TreeEntry,
) -> io::Result<()> {
    let url = ctx.links.submodule_url(fullpath, &entry.id);
    match &url {
        Some(url) => {
            html.raw("<a class='ls-mod' href='")?;
            html.attr(url)?;
            html.raw("'>")?;
        }
        None => html.raw("<span class='ls-mod'>")?,
    }
    html.txt(&entry.name)?;
    html.fmt(format_args!(" @ {}", entry.id.short()))?;
    match url {
        Some(_) => html.raw("</a>"),
        None => html.raw("</span>"),
    }
}

fn write_symlink_target(
    html: &mut Html<'_>,
    ctx: &RenderContext<'_>,
    fullpath: &str,
    entry: &TreeEntry,
    class: &str,
) -> io::Result<RowOutcome> {
    let target = match ctx.store.read_object(&entry.id) {
        Ok(buf) => buf,
        Err(e) => {
            warn!(path = %fullpath, error = %e, "Unable to read symlink target");
            html.fmt(format_args!("Error reading object: {}", entry.id))?;
            return Ok(RowOutcome::BrokenSymlink);
        }
    };
    let target = String::from_utf8_lossy(&target);
    match resolve_link_target(fullpath, &target) {
        Some(resolved) => {
            let link = ViewLink {
                kind: LinkKind::Tree,
                head: ctx.head,
                rev: ctx.rev,
                path: &resolved,
            };
            write_link(html, ctx.links, &link, &target, Some(class))?;
        }
        // Points above the repository root.
        None => html.txt(&target)?,
    }
    Ok(RowOutcome::Rendered)
}

fn write_actions(
    html: &mut Html<'_>,
    ctx: &RenderContext<'_>,
    fullpath: &str,
    kind: EntryKind,
) -> io::Result<()> {
    let log = ViewLink {
        kind: LinkKind::Log,
        head: ctx.head,
        rev: ctx.rev,
        path: fullpath,
    };
    write_link(html, ctx.links, &log, "log", Some("button"))?;
    if ctx.settings.enable_stats {
        let stats = ViewLink {
            kind: LinkKind::Stats,
            ..log
        };
        write_link(html, ctx.links, &stats, "stats", Some("button"))?;
    }
    if kind != EntryKind::Submodule {
        let plain = ViewLink {
            kind: LinkKind::Plain,
            ..log
        };
        write_link(html, ctx.links, &plain, "plain", Some("button"))?;
    }
    if kind != EntryKind::Directory && ctx.settings.enable_blame {
        let blame = ViewLink {
            kind: LinkKind::Blame,
            ..log
        };
        write_link(html, ctx.links, &blame, "blame", Some("button"))?;
    }
    Ok(())
}
