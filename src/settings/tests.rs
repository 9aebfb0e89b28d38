use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tempfile::tempdir;

use super::*;
use crate::cli::CliArgs;

fn cli(args: &[&str]) -> CliArgs {
    let mut argv = vec!["usersearch"];
    argv.extend_from_slice(args);
    CliArgs::parse_from(argv)
}

#[test]
fn defaults_resolve_to_http_with_standard_gate() {
    let resolved = RawConfig::default().resolve().expect("resolve");
    assert_eq!(resolved.gate, GateConfig::default());
    assert_eq!(
        resolved.source,
        LookupSource::Http {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    );
    assert!(resolved.keystroke_delay.is_zero());
}

#[test]
fn cli_overrides_take_precedence() {
    let mut config = RawConfig::default();
    config.gate.min_length = Some(5);
    config.lookup.source = Some("http".into());

    let args = cli(&[
        "--min-length",
        "2",
        "--quiet-period-ms",
        "25",
        "--source",
        "static",
        "--keystroke-delay-ms",
        "10",
    ]);
    config.apply_cli_overrides(&args);

    assert_eq!(config.gate.min_length, Some(2));
    assert_eq!(config.gate.quiet_period_ms, Some(25));
    assert_eq!(config.lookup.source.as_deref(), Some("static"));
    assert_eq!(config.input.keystroke_delay_ms, Some(10));

    let resolved = config.resolve().expect("resolve");
    assert_eq!(resolved.source, LookupSource::Static);
    assert_eq!(resolved.gate.quiet_period, Duration::from_millis(25));
}

#[test]
fn file_source_requires_a_path() {
    let mut config = RawConfig::default();
    config.lookup.source = Some("file".into());
    let err = config.resolve().unwrap_err();
    assert!(err.to_string().contains("lookup.file"));
}

#[test]
fn configured_file_implies_file_source() {
    let mut config = RawConfig::default();
    config.lookup.file = Some(PathBuf::from("users.json"));
    let resolved = config.resolve().expect("resolve");
    assert_eq!(
        resolved.source,
        LookupSource::File {
            path: PathBuf::from("users.json")
        }
    );
}

#[test]
fn rejects_out_of_range_values() {
    let mut config = RawConfig::default();
    config.gate.min_length = Some(0);
    assert!(config.resolve().is_err());

    let mut config = RawConfig::default();
    config.gate.quiet_period_ms = Some(MAX_QUIET_PERIOD_MS + 1);
    assert!(config.resolve().is_err());

    let mut config = RawConfig::default();
    config.lookup.timeout_ms = Some(0);
    assert!(config.resolve().is_err());

    let mut config = RawConfig::default();
    config.lookup.endpoint = Some("ftp://example.com/users".into());
    assert!(config.resolve().is_err());

    let mut config = RawConfig::default();
    config.lookup.source = Some("carrier-pigeon".into());
    assert!(config.resolve().is_err());
}

#[test]
fn explicit_config_file_is_loaded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("usersearch.toml");
    fs::write(
        &path,
        r#"
[gate]
min_length = 4
quiet_period_ms = 120

[lookup]
source = "file"
file = "people.json"
"#,
    )
    .unwrap();

    let path_arg = path.display().to_string();
    let args = cli(&["--no-config", "--config", &path_arg]);
    let resolved = load(&args).expect("load");

    assert_eq!(resolved.gate.min_length, 4);
    assert_eq!(resolved.gate.quiet_period, Duration::from_millis(120));
    assert_eq!(
        resolved.source,
        LookupSource::File {
            path: PathBuf::from("people.json")
        }
    );
}

#[test]
fn missing_explicit_config_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path_arg = dir.path().join("absent.toml").display().to_string();
    let args = cli(&["--no-config", "--config", &path_arg]);
    assert!(load(&args).is_err());
}
