//! Shared fixtures: an in-memory repository and render helpers.

use std::cell::Cell;
use treeview::error::{ApiError, StorageError};
use treeview::render::layout::{DocumentLayout, FragmentLayout, PageLayout};
use treeview::render::links::UrlLinks;
use treeview::render::ViewSettings;
use treeview::store::{Ancestry, AncestryWalker, MemoryStore, ObjectStore};
use treeview::tree::{TreeOutcome, TreeRequest, TreeView};
use treeview::types::{ContentRef, FileMode, TreeEntry};

/// Size of `big.log` in the fixture, just over 2 KiB
pub const BIG_LEN: usize = 3 * 1024;

pub struct Fixture {
    pub store: MemoryStore,
    pub head: ContentRef,
    pub binary: ContentRef,
    pub readme: ContentRef,
}

/// Repository used by most tests:
///
/// ```text
/// README.md
/// big.log
/// data.bin
/// deps            (submodule)
/// docs/a/b/{one.txt,two.txt}
/// latest          -> docs/a/b/one.txt
/// src/{lib.rs,main.rs}
/// vendor/NOTICE
/// vendor/lib/{mod.rs,util.rs}
/// ```
pub fn fixture() -> Fixture {
    let mut store = MemoryStore::new();
    let readme = store.put_blob("# Demo\n\nA <small> & tidy repo.\n");
    let big = store.put_blob("x".repeat(BIG_LEN - 1) + "\n");
    let binary = store.put_blob((0u8..=255).collect::<Vec<u8>>());
    let one = store.put_blob("one\n");
    let two = store.put_blob("two\n");
    let main = store.put_blob("fn main() {\n    println!(\"hi\");\n}\n");
    let lib = store.put_blob("pub fn lib() {}\n");
    let notice = store.put_blob("third party\n");
    let module = store.put_blob("pub mod util;\n");
    let util = store.put_blob("pub fn help() {}\n");
    let link = store.put_blob("docs/a/b/one.txt");

    let b = store.put_tree(vec![
        TreeEntry::new("one.txt", FileMode::REGULAR, one),
        TreeEntry::new("two.txt", FileMode::REGULAR, two),
    ]);
    let a = store.put_tree(vec![TreeEntry::new("b", FileMode::DIRECTORY, b)]);
    let docs = store.put_tree(vec![TreeEntry::new("a", FileMode::DIRECTORY, a)]);
    let src = store.put_tree(vec![
        TreeEntry::new("lib.rs", FileMode::REGULAR, lib),
        TreeEntry::new("main.rs", FileMode::EXECUTABLE, main),
    ]);
    let vendored = store.put_tree(vec![
        TreeEntry::new("mod.rs", FileMode::REGULAR, module),
        TreeEntry::new("util.rs", FileMode::REGULAR, util),
    ]);
    let vendor = store.put_tree(vec![
        TreeEntry::new("NOTICE", FileMode::REGULAR, notice),
        TreeEntry::new("lib", FileMode::DIRECTORY, vendored),
    ]);
    let root = store.put_tree(vec![
        TreeEntry::new("README.md", FileMode::REGULAR, readme.clone()),
        TreeEntry::new("big.log", FileMode::REGULAR, big),
        TreeEntry::new("data.bin", FileMode::REGULAR, binary.clone()),
        TreeEntry::new("deps", FileMode::SUBMODULE, ContentRef::from_bytes(vec![0x5a; 20])),
        TreeEntry::new("docs", FileMode::DIRECTORY, docs),
        TreeEntry::new("latest", FileMode::SYMLINK, link),
        TreeEntry::new("src", FileMode::DIRECTORY, src),
        TreeEntry::new("vendor", FileMode::DIRECTORY, vendor),
    ]);

    let initial = store.put_commit(&root, &[], "Initial commit\n");
    let merge = store.put_commit(
        &root,
        &[initial],
        "Add 'vendor/lib/' from commit 'abc123'\n\n\
         git-subtree-dir: /vendor/lib/\n\
         git-subtree-split: abc123\n",
    );
    let head = store.put_commit(&root, &[merge], "Tidy README\n");
    store.set_ref("master", &head);

    Fixture {
        store,
        head,
        binary,
        readme,
    }
}

pub fn settings() -> ViewSettings {
    ViewSettings {
        repo_name: "demo".to_string(),
        ..ViewSettings::default()
    }
}

pub fn links() -> UrlLinks {
    UrlLinks::new("/", "demo", "master", None).unwrap()
}

/// Render `path` at the head of `store` through a fragment layout.
pub fn render(
    store: &MemoryStore,
    settings: &ViewSettings,
    path: Option<&str>,
) -> (String, Result<TreeOutcome, ApiError>) {
    render_with(store, store, settings, &mut FragmentLayout, path)
}

/// Render `path` inside a full document.
pub fn render_document(
    store: &MemoryStore,
    settings: &ViewSettings,
    path: Option<&str>,
) -> (String, Result<TreeOutcome, ApiError>) {
    render_with(store, store, settings, &mut DocumentLayout::new("demo"), path)
}

pub fn render_with(
    store: &dyn ObjectStore,
    history: &dyn AncestryWalker,
    settings: &ViewSettings,
    layout: &mut dyn PageLayout,
    path: Option<&str>,
) -> (String, Result<TreeOutcome, ApiError>) {
    let links = links();
    let view = TreeView::new(store, history, &links, settings);
    let request = TreeRequest {
        head: "master",
        rev: None,
        path,
    };
    let mut out = Vec::new();
    let result = view.print_tree(&mut out, layout, &request);
    (String::from_utf8(out).unwrap(), result)
}

/// Ancestry walker that counts the commits actually pulled from the walk
pub struct CountingWalker<'a> {
    pub inner: &'a MemoryStore,
    pub pulled: Cell<usize>,
}

impl<'a> CountingWalker<'a> {
    pub fn new(inner: &'a MemoryStore) -> Self {
        CountingWalker {
            inner,
            pulled: Cell::new(0),
        }
    }
}

impl AncestryWalker for CountingWalker<'_> {
    fn walk_ancestry<'b>(&'b self, start: &ContentRef) -> Result<Ancestry<'b>, StorageError> {
        let walk = self.inner.walk_ancestry(start)?;
        Ok(Box::new(walk.inspect(move |_| {
            self.pulled.set(self.pulled.get() + 1);
        })))
    }
}

/// Number of `<tr data-name=` listing rows in rendered output.
pub fn listing_rows(out: &str) -> usize {
    out.matches("<tr data-name=").count() + out.matches("<tr class='ls-subtree' data-name=").count()
}
