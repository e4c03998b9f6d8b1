use crate::integration::support::{fixture, render, render_with, settings, CountingWalker};
use treeview::render::layout::FragmentLayout;
use treeview::render::ViewSettings;
use treeview::store::ObjectStore;
use treeview::subtree::collect_subtrees;
use treeview::types::ContentRef;

fn subtree_settings(max: Option<usize>) -> ViewSettings {
    ViewSettings {
        enable_subtree: true,
        max_subtree_commits: max,
        ..settings()
    }
}

#[test]
fn trailer_pair_is_normalized_and_labelled() {
    let fx = fixture();
    let index = collect_subtrees(&fx.store, &fx.head, None);
    assert_eq!(index.len(), 1);
    assert_eq!(index.get("vendor/lib"), Some(Some("abc123")));
    assert_eq!(index.get("/vendor/lib/"), Some(Some("abc123")));
    assert!(!index.contains("vendor"));
}

#[test]
fn collection_is_deterministic() {
    let fx = fixture();
    let first = collect_subtrees(&fx.store, &fx.head, None);
    let second = collect_subtrees(&fx.store, &fx.head, None);
    assert_eq!(first, second);
}

#[test]
fn newest_annotation_wins() {
    let mut fx = fixture();
    let tree = fx.store.commit_tree(&fx.head).unwrap();
    let newer = fx.store.put_commit(
        &tree,
        &[fx.head.clone()],
        "Update lib\n\ngit-subtree-dir: vendor/lib\ngit-subtree-split: def456\n",
    );
    let index = collect_subtrees(&fx.store, &newer, None);
    assert_eq!(index.get("vendor/lib"), Some(Some("def456")));
}

#[test]
fn ceiling_bounds_commits_inspected() {
    let fx = fixture();

    let walker = CountingWalker::new(&fx.store);
    let index = collect_subtrees(&walker, &fx.head, Some(1));
    assert_eq!(walker.pulled.get(), 1);
    assert!(index.is_empty());

    let walker = CountingWalker::new(&fx.store);
    let index = collect_subtrees(&walker, &fx.head, Some(2));
    assert_eq!(walker.pulled.get(), 2);
    assert!(index.contains("vendor/lib"));

    let walker = CountingWalker::new(&fx.store);
    collect_subtrees(&walker, &fx.head, Some(0));
    assert_eq!(walker.pulled.get(), 3);
}

#[test]
fn listing_badges_subtree_directories() {
    let fx = fixture();
    let (out, result) = render(&fx.store, &subtree_settings(None), Some("vendor"));
    let outcome = result.unwrap();
    assert!(outcome.subtrees.unwrap().contains("vendor/lib"));
    assert!(out.contains("<tr class='ls-subtree' data-name='lib' data-path='vendor/lib'>"));
    assert!(out.contains(
        "<a class='ls-dir' href='/demo/tree/vendor/lib'>lib</a> \
         <span class='subtree-badge' title='split abc123'>subtree</span>"
    ));
    let notice = out
        .lines()
        .find(|line| line.contains("data-name='NOTICE'"))
        .unwrap();
    assert!(!notice.contains("ls-subtree"));
}

#[test]
fn disabled_annotator_adds_no_badges() {
    let fx = fixture();
    let (out, result) = render(&fx.store, &settings(), Some("vendor"));
    assert!(result.unwrap().subtrees.is_none());
    assert!(!out.contains("subtree-badge"));
    assert!(!out.contains("ls-subtree"));
}

#[test]
fn ceiling_applies_to_rendered_listing() {
    let fx = fixture();
    let walker = CountingWalker::new(&fx.store);
    let (out, result) = render_with(
        &fx.store,
        &walker,
        &subtree_settings(Some(1)),
        &mut FragmentLayout,
        Some("vendor"),
    );
    assert!(result.unwrap().subtrees.unwrap().is_empty());
    assert_eq!(walker.pulled.get(), 1);
    assert!(!out.contains("subtree-badge"));
}

#[test]
fn unknown_start_commit_yields_empty_index() {
    let fx = fixture();
    let missing = ContentRef::from_bytes(vec![0x11; 32]);
    let index = collect_subtrees(&fx.store, &missing, None);
    assert!(index.is_empty());
}
