use std::fs;
use tempfile::TempDir;
use treeview::config::TreeviewConfig;
use treeview::render::layout::FragmentLayout;
use treeview::render::links::UrlLinks;
use treeview::render::ViewSettings;
use treeview::store::{MemoryStore, ObjectStore};
use treeview::tooling::cli::{CliContext, Commands};
use treeview::tree::{TreeRequest, TreeView};

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src/nested/deeper")).unwrap();
    fs::create_dir_all(dir.path().join(".git")).unwrap();
    fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/master\n").unwrap();
    fs::write(dir.path().join("README"), "snapshot\n").unwrap();
    fs::write(dir.path().join("src/lib.rs"), "pub fn f() {}\n").unwrap();
    fs::write(dir.path().join("src/nested/deeper/leaf.txt"), "leaf\n").unwrap();
    dir
}

#[test]
fn directory_import_renders_like_a_commit() {
    let dir = project();
    let (store, commit) = MemoryStore::from_directory(dir.path(), "Snapshot").unwrap();
    assert_eq!(store.resolve_revision("HEAD").unwrap(), commit);

    let links = UrlLinks::new("/", "snap", "HEAD", None).unwrap();
    let settings = ViewSettings::default();
    let view = TreeView::new(&store, &store, &links, &settings);
    let request = TreeRequest {
        head: "HEAD",
        rev: None,
        path: Some("src"),
    };
    let mut out = Vec::new();
    let outcome = view
        .print_tree(&mut out, &mut FragmentLayout, &request)
        .unwrap();
    let out = String::from_utf8(out).unwrap();
    assert_eq!(outcome.rows, 2);
    assert!(out.contains("data-path='src/lib.rs'"));
    assert!(out.contains(
        "<a class='ls-dir' href='/snap/tree/src/nested'>nested</a> / \
         <a class='ls-dir' href='/snap/tree/src/nested/deeper'>deeper</a>"
    ));
}

#[test]
fn git_metadata_is_not_imported() {
    let dir = project();
    let (store, commit) = MemoryStore::from_directory(dir.path(), "Snapshot").unwrap();
    let root = store.commit_tree(&commit).unwrap();
    let names: Vec<String> = store
        .read_tree(&root)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["README", "src"]);
}

#[cfg(unix)]
#[test]
fn symlinks_and_exec_bits_survive_import() {
    use std::os::unix::fs::PermissionsExt;

    let dir = project();
    std::os::unix::fs::symlink("src/lib.rs", dir.path().join("entry")).unwrap();
    let tool = dir.path().join("run.sh");
    fs::write(&tool, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

    let ctx = CliContext::snapshot(dir.path().to_path_buf(), None).unwrap();
    let out = ctx
        .execute(&Commands::Tree {
            rev: None,
            head: None,
            fragment: true,
            path: None,
        })
        .unwrap();
    assert!(out.contains(" -> "));
    assert!(out.contains("/tree/src/lib.rs'>src/lib.rs</a>"));
    let row = out
        .lines()
        .find(|line| line.contains("data-name='run.sh'"))
        .unwrap();
    assert!(row.contains("-rwxr-xr-x"));
}

#[test]
fn snapshot_context_uses_configured_branch_and_directory_name() {
    let dir = project();
    fs::write(
        dir.path().join(".treeview.toml"),
        "[repo]\ndefault_branch = \"main\"\n",
    )
    .unwrap();
    let ctx = CliContext::snapshot(dir.path().to_path_buf(), None).unwrap();
    let config: &TreeviewConfig = ctx.config();
    assert_eq!(config.repo.default_branch, "main");
    let expected = dunce::canonicalize(dir.path())
        .unwrap()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();
    assert_eq!(config.repo.name, expected);

    let out = ctx
        .execute(&Commands::Tree {
            rev: None,
            head: None,
            fragment: false,
            path: Some("README".to_string()),
        })
        .unwrap();
    assert!(out.contains("snapshot\n"));
}
