use crate::integration::support::{fixture, render, settings};
use treeview::render::ViewSettings;
use treeview::store::MemoryStore;
use treeview::types::{ContentRef, FileMode, TreeEntry};

#[test]
fn single_child_directories_collapse_into_one_breadcrumb() {
    let fx = fixture();
    let (out, _) = render(&fx.store, &settings(), None);
    assert!(out.contains(
        "<a class='ls-dir' href='/demo/tree/docs'>docs</a> / \
         <a class='ls-dir' href='/demo/tree/docs/a'>a</a> / \
         <a class='ls-dir' href='/demo/tree/docs/a/b'>b</a>"
    ));
    // vendor has two entries, so its link stands alone.
    assert!(out.contains("<a class='ls-dir' href='/demo/tree/vendor'>vendor</a></td>"));
}

#[test]
fn symlink_row_links_to_its_normalized_target() {
    let fx = fixture();
    let (out, _) = render(&fx.store, &settings(), None);
    assert!(out.contains("<td class='ls-mode'>l---------</td>"));
    assert!(out.contains(
        "<a class='ls-blob' href='/demo/tree/latest'>latest</a> -> \
         <a class='ls-blob' href='/demo/tree/docs/a/b/one.txt'>docs/a/b/one.txt</a>"
    ));
}

#[test]
fn submodule_row_has_no_size_and_no_plain_link() {
    let fx = fixture();
    let (out, _) = render(&fx.store, &settings(), None);
    let row = out
        .lines()
        .find(|line| line.contains("data-name='deps'"))
        .unwrap();
    assert!(row.contains("<td class='ls-mode'>m---------</td>"));
    assert!(row.contains("<span class='ls-mod'>deps @ 5a5a5a5</span>"));
    assert!(row.contains("<td class='ls-size'></td>"));
    assert!(row.contains(">log</a>"));
    assert!(!row.contains(">plain</a>"));
}

#[test]
fn file_rows_carry_mode_extension_class_and_size() {
    let fx = fixture();
    let (out, _) = render(&fx.store, &settings(), Some("src"));
    let row = out
        .lines()
        .find(|line| line.contains("data-name='main.rs'"))
        .unwrap();
    assert!(row.contains("<td class='ls-mode'>-rwxr-xr-x</td>"));
    assert!(row.contains("<a class='ls-blob rs' href='/demo/tree/src/main.rs'>main.rs</a>"));
    assert!(row.contains("<td class='ls-size'>34</td>"));
}

#[test]
fn action_links_follow_repository_switches() {
    let fx = fixture();
    let (out, _) = render(&fx.store, &settings(), Some("src"));
    assert!(out.contains("<a class='button' href='/demo/log/src/lib.rs'>log</a>"));
    assert!(out.contains("<a class='button' href='/demo/plain/src/lib.rs'>plain</a>"));
    assert!(!out.contains(">blame</a>"));
    assert!(!out.contains(">stats</a>"));

    let enabled = ViewSettings {
        enable_blame: true,
        enable_stats: true,
        ..settings()
    };
    let (out, _) = render(&fx.store, &enabled, None);
    assert!(out.contains("<a class='button' href='/demo/blame/README.md'>blame</a>"));
    assert!(out.contains("<a class='button' href='/demo/stats/src'>stats</a>"));
    assert!(!out.contains("href='/demo/blame/src'"));
}

#[test]
fn unresolvable_entry_gets_an_error_row_and_listing_continues() {
    let mut store = MemoryStore::new();
    let ghost = ContentRef::from_bytes(vec![0xee; 32]);
    let real = store.put_blob("still here\n");
    let root = store.put_tree(vec![
        TreeEntry::new("ghost.txt", FileMode::REGULAR, ghost.clone()),
        TreeEntry::new("real.txt", FileMode::REGULAR, real),
    ]);
    let commit = store.put_commit(&root, &[], "Broken tree\n");
    store.set_ref("master", &commit);

    let (out, result) = render(&store, &settings(), None);
    let outcome = result.unwrap();
    assert_eq!(outcome.rows, 2);
    assert_eq!(outcome.bad_rows, 1);
    assert!(out.contains(&format!("<tr><td colspan='3'>Bad object: ghost.txt {}</td></tr>", ghost)));
    assert!(out.contains("data-path='real.txt'"));
    assert!(out.ends_with("</table>\n"));
}

#[test]
fn listing_survives_unreadable_blob_content() {
    let mut fx = fixture();
    assert!(fx.store.drop_content(&fx.readme));
    let (out, result) = render(&fx.store, &settings(), None);
    assert_eq!(result.unwrap().bad_rows, 0);
    assert!(out.contains("data-path='README.md'"));
}

#[test]
fn names_are_escaped_in_rows() {
    let mut store = MemoryStore::new();
    let blob = store.put_blob("x");
    let root = store.put_tree(vec![TreeEntry::new("a'b<c>.txt", FileMode::REGULAR, blob)]);
    let commit = store.put_commit(&root, &[], "Odd name\n");
    store.set_ref("master", &commit);
    let (out, _) = render(&store, &settings(), None);
    assert!(out.contains("data-name='a&#x27;b&lt;c&gt;.txt'"));
    assert!(out.contains(">a'b&lt;c&gt;.txt</a>"));
}
