use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser};

use super::{CliArgs, OutputFormat, SourceKind, cli_command};

#[test]
fn command_has_about_text() {
    let command = cli_command();
    assert!(command.get_about().is_some());
}

#[test]
fn command_definition_is_consistent() {
    CliArgs::command().debug_assert();
}

#[test]
fn parse_cli_accepts_default_arguments() {
    let command = CliArgs::command();
    let mut matches = command.get_matches_from(vec!["usersearch"]);
    let parsed = CliArgs::from_arg_matches_mut(&mut matches).expect("parses");
    assert_eq!(parsed.output, OutputFormat::Plain);
    assert!(parsed.queries.is_empty());
    assert!(!parsed.interactive);
}

#[test]
fn positional_queries_keep_their_order() {
    let parsed = CliArgs::parse_from(["usersearch", "jo", "joh", "john", "--source", "static"]);
    assert_eq!(parsed.queries, vec!["jo", "joh", "john"]);
    assert_eq!(parsed.source, Some(SourceKind::Static));
}

#[test]
fn interactive_conflicts_with_positional_queries() {
    let result = CliArgs::try_parse_from(["usersearch", "--interactive", "john"]);
    assert!(result.is_err());
}

#[test]
fn tuning_flags_are_parsed() {
    let parsed = CliArgs::parse_from([
        "usersearch",
        "--min-length",
        "2",
        "--quiet-period-ms",
        "50",
        "--timeout-ms",
        "750",
        "--file",
        "users.json",
        "-o",
        "json",
    ]);
    assert_eq!(parsed.min_length, Some(2));
    assert_eq!(parsed.quiet_period_ms, Some(50));
    assert_eq!(parsed.timeout_ms, Some(750));
    assert_eq!(parsed.file, Some(PathBuf::from("users.json")));
    assert_eq!(parsed.output, OutputFormat::Json);
}
