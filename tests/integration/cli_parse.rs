use clap::{CommandFactory, Parser};
use treeview::tooling::cli::{Cli, Commands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["treeview", "tree"],
        vec!["treeview", "tree", "src/lib.rs"],
        vec!["treeview", "tree", "--rev", "v1.0", "--head", "dev", "docs"],
        vec!["treeview", "tree", "--fragment"],
        vec!["treeview", "--repo", "/srv/git/demo.git", "tree"],
        vec!["treeview", "--snapshot", "--repo", ".", "tree", "README"],
        vec!["treeview", "--config", "/etc/treeview.toml", "subtrees"],
        vec!["treeview", "subtrees", "--limit", "100", "--format", "json"],
        vec!["treeview", "--log-level", "debug", "--log-format", "json", "subtrees"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_invalid_input() {
    assert!(Cli::try_parse_from(["treeview"]).is_err());
    assert!(Cli::try_parse_from(["treeview", "log"]).is_err());
    assert!(Cli::try_parse_from(["treeview", "subtrees", "--limit", "many"]).is_err());
    assert!(Cli::try_parse_from(["treeview", "tree", "a", "b"]).is_err());
}

#[test]
fn subtrees_defaults() {
    let cli = Cli::try_parse_from(["treeview", "subtrees", "--rev", "main"]).unwrap();
    assert!(!cli.snapshot);
    assert!(cli.config.is_none());
    match cli.command {
        Commands::Subtrees { rev, limit, format } => {
            assert_eq!(rev.as_deref(), Some("main"));
            assert_eq!(limit, None);
            assert_eq!(format, "text");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn help_lists_subcommands() {
    let help = Cli::command().render_help().to_string();
    assert!(help.contains("tree"));
    assert!(help.contains("subtrees"));
    assert!(help.contains("--repo"));
}

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}
