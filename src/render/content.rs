//! Blob content rendering: numbered text, filtered text, or hex dump.

use crate::error::ApiError;
use crate::render::filter::FilterProcess;
use crate::render::html::Html;
use crate::render::layout::PageLayout;
use crate::render::links::{write_link, LinkKind, ViewLink};
use crate::render::RenderContext;
use crate::tree::path::basename;
use crate::types::ContentRef;
use std::io;
use tracing::{debug, warn};

/// Bytes per hex dump row
pub const ROW_LEN: usize = 32;

/// How a blob ended up rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOutcome {
    Text { lines: usize, filtered: bool },
    Binary { rows: usize },
    SizeLimited { size_kb: u64 },
}

/// True if the buffer holds any control byte other than common whitespace.
pub fn is_binary(buf: &[u8]) -> bool {
    buf.iter().any(|&b| {
        (b < 0x20 && !matches!(b, b'\t' | b'\n' | 0x0b | 0x0c | b'\r')) || b == 0x7f
    })
}

/// Number of line anchors for a text buffer. A final newline does not start a new line.
pub fn line_count(buf: &[u8]) -> usize {
    match buf.split_last() {
        None => 0,
        Some((_, head)) => 1 + head.iter().filter(|b| **b == b'\n').count(),
    }
}

/// Render bytes as 32-byte rows of offset, hex and ASCII columns. Returns the row count.
pub fn write_hex_dump(html: &mut Html<'_>, buf: &[u8]) -> io::Result<usize> {
    html.raw("<table summary='blob content' class='bin-blob'>\n")?;
    html.raw("<tr><th>ofs</th><th>hex dump</th><th>ascii</th></tr>")?;
    let mut rows = 0;
    for (row, chunk) in buf.chunks(ROW_LEN).enumerate() {
        html.fmt(format_args!(
            "<tr><td class='right'>{:04x}</td><td class='hex'>",
            row * ROW_LEN
        ))?;
        for (idx, byte) in chunk.iter().enumerate() {
            let gap = if idx == 16 { "    " } else { " " };
            html.fmt(format_args!("{}{:02x}", gap, byte))?;
        }
        html.raw(" </td><td class='hex'>")?;
        let ascii: String = chunk
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
            .collect();
        html.txt(&ascii)?;
        html.raw("</td></tr>\n")?;
        rows += 1;
    }
    html.raw("</table>\n")?;
    Ok(rows)
}

/// Render text with optional line-number anchors, escaped or through the source filter.
pub fn write_text(
    html: &mut Html<'_>,
    ctx: &RenderContext<'_>,
    name: &str,
    buf: &[u8],
) -> io::Result<ContentOutcome> {
    // Spawn before any markup so a missing filter can fall back cleanly.
    let filter = match &ctx.settings.source_filter {
        Some(program) => match FilterProcess::spawn(program, name) {
            Ok(filter) => Some(filter),
            Err(e) => {
                warn!(program = %program.display(), error = %e, "Source filter unavailable, rendering plain text");
                None
            }
        },
        None => None,
    };

    let lines = line_count(buf);
    html.raw("<table summary='blob content' class='blob'>\n")?;
    if ctx.settings.line_numbers {
        html.raw("<tr><td class='linenumbers'><pre>")?;
        for n in 1..=lines {
            html.fmt(format_args!("<a id='n{0}' href='#n{0}'>{0}</a>\n", n))?;
        }
        html.raw("</pre></td>\n")?;
    } else {
        html.raw("<tr>\n")?;
    }

    html.raw("<td class='lines'><pre><code>")?;
    let filtered = filter.is_some();
    match filter {
        Some(filter) => {
            let program = filter.program().to_path_buf();
            match filter.pump(buf, html.writer()) {
                Ok(status) if !status.success() => {
                    warn!(program = %program.display(), %status, "Source filter exited unsuccessfully")
                }
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => return Err(e),
                Err(e) => warn!(program = %program.display(), error = %e, "Source filter failed"),
            }
        }
        None => html.txt_bytes(buf)?,
    }
    html.raw("</code></pre></td></tr></table>\n")?;
    Ok(ContentOutcome::Text { lines, filtered })
}

/// Resolve, classify and render a blob between layout begin and the caller's layout end.
///
/// Lookup and read failures are returned before anything is written.
pub fn print_object(
    html: &mut Html<'_>,
    layout: &mut dyn PageLayout,
    ctx: &RenderContext<'_>,
    id: &ContentRef,
    path: &str,
) -> Result<ContentOutcome, ApiError> {
    let info = ctx
        .store
        .object_info(id)
        .map_err(|_| ApiError::NotFound(format!("Bad object name: {}", id)))?;
    let buf = ctx
        .store
        .read_object(id)
        .map_err(|_| ApiError::InternalError(format!("Error reading object {}", id)))?;
    let binary = is_binary(&buf);
    debug!(path, size = info.size, binary, "Rendering blob");

    layout.begin(html, path)?;
    html.fmt(format_args!("blob: {} (", id))?;
    let plain = ViewLink {
        kind: LinkKind::Plain,
        head: ctx.head,
        rev: ctx.rev,
        path,
    };
    write_link(html, ctx.links, &plain, "plain", None)?;
    if ctx.settings.enable_blame && !binary {
        html.raw(") (")?;
        let blame = ViewLink {
            kind: LinkKind::Blame,
            ..plain
        };
        write_link(html, ctx.links, &blame, "blame", None)?;
    }
    html.raw(")\n")?;

    let size_kb = info.size / 1024;
    let limit = ctx.settings.max_blob_size_kb;
    if limit > 0 && size_kb > limit {
        html.fmt(format_args!(
            "<div class='error'>blob size ({}KB) exceeds display size limit ({}KB).</div>",
            size_kb, limit
        ))?;
        return Ok(ContentOutcome::SizeLimited { size_kb });
    }

    let outcome = if binary {
        ContentOutcome::Binary {
            rows: write_hex_dump(html, &buf)?,
        }
    } else {
        write_text(html, ctx, basename(path), &buf)?
    };
    Ok(outcome)
}
