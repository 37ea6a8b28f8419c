use clap::Parser;
use stackboost_cli::{Cli, Commands};
use std::path::PathBuf;

#[test]
fn parses_activate_with_instance() {
    let cli = Cli::try_parse_from([
        "stackboost",
        "activate",
        "KEY-123",
        "--instance",
        "support.example.com",
    ])
    .unwrap();
    match cli.command {
        Commands::Activate { key, instance } => {
            assert_eq!(key, "KEY-123");
            assert_eq!(instance.as_deref(), Some("support.example.com"));
        }
        _ => panic!("expected activate"),
    }
}

#[test]
fn activate_requires_a_key() {
    assert!(Cli::try_parse_from(["stackboost", "activate"]).is_err());
}

#[test]
fn parses_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "stackboost",
        "status",
        "--config",
        "/etc/stackboost.toml",
        "--verbose",
    ])
    .unwrap();
    assert!(matches!(cli.command, Commands::Status));
    assert_eq!(cli.config, Some(PathBuf::from("/etc/stackboost.toml")));
    assert!(cli.verbose);
}

#[test]
fn parses_feature_slug() {
    let cli = Cli::try_parse_from(["stackboost", "feature", "queue_macro"]).unwrap();
    match cli.command {
        Commands::Feature { slug } => assert_eq!(slug, "queue_macro"),
        _ => panic!("expected feature"),
    }
}

#[test]
fn parses_remaining_commands() {
    let parse = |arg: &str| Cli::try_parse_from(["stackboost", arg]).unwrap().command;

    assert!(matches!(parse("deactivate"), Commands::Deactivate));
    assert!(matches!(parse("uninstall"), Commands::Uninstall));
    assert!(matches!(parse("init"), Commands::Init { path: None }));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["stackboost"]).is_err());
}

#[test]
fn init_writes_default_config_once() {
    let tmp = tempfile::tempdir().unwrap();
    stackboost_cli::commands::init::run(Some(tmp.path())).unwrap();

    let path = tmp.path().join(".stackboost.toml");
    let config = stackboost_core::StackboostConfig::from_file(&path).unwrap();
    assert_eq!(config.license.grace_period_hours, 72);

    std::fs::write(&path, "[license]\ngrace_period_hours = 1\n").unwrap();
    stackboost_cli::commands::init::run(Some(tmp.path())).unwrap();
    let config = stackboost_core::StackboostConfig::from_file(&path).unwrap();
    assert_eq!(config.license.grace_period_hours, 1);
}
