use aiwork::tooling::cli::{Cli, Commands};
use clap::{CommandFactory, Parser};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["aiwork", "serve"],
        vec!["aiwork", "bridge"],
        vec!["aiwork", "tools"],
        vec!["aiwork", "call", "get_sync_status"],
        vec!["aiwork", "call", "get_requirement", "--args", r#"{"name":"login"}"#],
        vec!["aiwork", "changes", "--tree", "tree.json", "--format", "json"],
        vec!["aiwork", "init", "--framework", "react", "--project-name", "shop", "--force"],
        vec!["aiwork", "status", "--format", "json"],
        vec!["aiwork", "--workspace", "/tmp/app", "--log-level", "debug", "status"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_missing_and_unknown() {
    assert!(Cli::try_parse_from(["aiwork"]).is_err());
    assert!(Cli::try_parse_from(["aiwork", "call"]).is_err());
    assert!(Cli::try_parse_from(["aiwork", "scan"]).is_err());
}

#[test]
fn parse_defaults() {
    let cli = Cli::try_parse_from(["aiwork", "changes"]).unwrap();
    assert_eq!(cli.workspace.to_str(), Some("."));
    assert!(cli.config.is_none());
    match cli.command {
        Commands::Changes { tree, format } => {
            assert!(tree.is_none());
            assert_eq!(format, "text");
        }
        _ => panic!("expected changes command"),
    }
}

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}
