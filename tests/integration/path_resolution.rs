use crate::integration::support::{fixture, links, listing_rows, render, render_document, settings};
use treeview::error::ApiError;
use treeview::render::content::ContentOutcome;
use treeview::render::layout::FragmentLayout;
use treeview::tree::resolver::WalkState;
use treeview::tree::{TreeRequest, TreeView};

#[test]
fn root_lists_top_level_entries_only() {
    let fx = fixture();
    let (out, result) = render(&fx.store, &settings(), None);
    let outcome = result.unwrap();
    assert_eq!(outcome.state, WalkState::FoundDirectory);
    assert_eq!(outcome.path, "");
    assert_eq!(outcome.rows, 8);
    assert_eq!(listing_rows(&out), 8);
    assert!(out.contains("data-path='README.md'"));
    assert!(!out.contains("data-path='src/main.rs'"));
    assert!(!out.contains("data-path='docs/a'"));
}

#[test]
fn slash_only_path_is_the_root() {
    let fx = fixture();
    let (root, _) = render(&fx.store, &settings(), None);
    let (slash, result) = render(&fx.store, &settings(), Some("/"));
    assert_eq!(result.unwrap().path, "");
    assert_eq!(root, slash);
}

#[test]
fn directory_lists_immediate_children() {
    let fx = fixture();
    let (out, result) = render(&fx.store, &settings(), Some("vendor"));
    let outcome = result.unwrap();
    assert_eq!(outcome.state, WalkState::FoundDirectory);
    assert_eq!(outcome.rows, 2);
    assert!(out.contains("data-path='vendor/NOTICE'"));
    assert!(out.contains("data-path='vendor/lib'"));
    assert!(!out.contains("data-path='vendor/lib/mod.rs'"));
    assert!(!out.contains("data-path='README.md'"));
    assert_eq!(out.matches("<table summary='tree listing' class='list'>").count(), 1);
    assert!(out.ends_with("</table>\n"));
}

#[test]
fn request_path_is_normalized() {
    let fx = fixture();
    let (plain, _) = render(&fx.store, &settings(), Some("docs/a"));
    let (messy, result) = render(&fx.store, &settings(), Some("/docs//a/"));
    assert_eq!(result.unwrap().path, "docs/a");
    assert_eq!(plain, messy);
}

#[test]
fn file_renders_exactly_one_content_block() {
    let fx = fixture();
    let (out, result) = render(&fx.store, &settings(), Some("src/main.rs"));
    let outcome = result.unwrap();
    assert_eq!(outcome.state, WalkState::FoundBlob);
    assert_eq!(outcome.rows, 0);
    assert_eq!(
        outcome.content,
        Some(ContentOutcome::Text {
            lines: 3,
            filtered: false
        })
    );
    assert_eq!(out.matches("<table summary='blob content'").count(), 1);
    assert!(!out.contains("tree listing"));
}

#[test]
fn unmatched_paths_fail_without_listing_markup() {
    let fx = fixture();
    for path in ["nope", "docs/a/c", "README.md/child", "docs/a/b/one.txt/extra", "vendorx"] {
        let (out, result) = render(&fx.store, &settings(), Some(path));
        match result {
            Err(ApiError::NotFound(msg)) => assert_eq!(msg, "Path not found"),
            other => panic!("expected NotFound for {}, got {:?}", path, other.map(|o| o.state)),
        }
        assert_eq!(out, "<div class='error'>Path not found</div>\n");
    }
}

#[test]
fn document_title_follows_the_resolved_path() {
    let fx = fixture();
    let (out, _) = render_document(&fx.store, &settings(), Some("src"));
    assert!(out.starts_with("<!DOCTYPE html>"));
    assert!(out.contains("<title>src - demo</title>"));
    assert!(out.ends_with("</html>\n"));

    let (out, _) = render_document(&fx.store, &settings(), Some("src/lib.rs"));
    assert!(out.contains("<title>src/lib.rs - demo</title>"));
    assert!(out.ends_with("</html>\n"));
}

#[test]
fn not_found_document_is_a_404_page() {
    let fx = fixture();
    let (out, result) = render_document(&fx.store, &settings(), Some("missing/file"));
    assert_eq!(result.unwrap_err().status_code(), Some(404));
    assert!(out.contains("<title>404 Not found - demo</title>"));
    assert!(!out.contains("<table"));
}

#[test]
fn rendering_is_deterministic() {
    let fx = fixture();
    for path in [None, Some("docs"), Some("README.md"), Some("data.bin")] {
        let (first, _) = render(&fx.store, &settings(), path);
        let (second, _) = render(&fx.store, &settings(), path);
        assert_eq!(first, second);
    }
}

fn request_rev(rev: &str) -> (String, ApiError) {
    let fx = fixture();
    let links = links();
    let settings = settings();
    let view = TreeView::new(&fx.store, &fx.store, &links, &settings);
    let request = TreeRequest {
        head: "master",
        rev: Some(rev),
        path: None,
    };
    let mut out = Vec::new();
    let err = view
        .print_tree(&mut out, &mut FragmentLayout, &request)
        .unwrap_err();
    (String::from_utf8(out).unwrap(), err)
}

#[test]
fn unknown_revision_is_reported() {
    let (out, err) = request_rev("no-such-branch");
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.message(), "Invalid revision name: no-such-branch");
    assert!(out.contains("Invalid revision name: no-such-branch"));
}

#[test]
fn non_commit_revision_is_reported() {
    let fx = fixture();
    let blob_hex = fx.readme.to_hex();
    let (_, err) = request_rev(&blob_hex);
    assert_eq!(err.message(), format!("Invalid commit reference: {}", blob_hex));
}

#[test]
fn explicit_revision_resolves_by_id() {
    let fx = fixture();
    let links = links();
    let settings = settings();
    let view = TreeView::new(&fx.store, &fx.store, &links, &settings);
    let rev = fx.head.to_hex();
    let request = TreeRequest {
        head: "master",
        rev: Some(&rev),
        path: Some("src"),
    };
    let mut out = Vec::new();
    let outcome = view.print_tree(&mut out, &mut FragmentLayout, &request).unwrap();
    assert_eq!(outcome.rows, 2);
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains(&format!("href='/demo/tree/src/lib.rs?id={}'", rev)));
}
