//! Configuration loading tests for the daemon.
//!
//! Tests file lookup, default fallback, environment and CLI override order,
//! and validation after overrides.

use std::io::Write;

use clap::Parser;
use hldslog_daemon::cli::DaemonCli;
use hldslog_daemon::orchestrator::{ConfigSource, load_config};
use serial_test::serial;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file should be created");
    file.write_all(content.as_bytes())
        .expect("config should be written");
    file.flush().expect("config should be flushed");
    file
}

fn cli(args: &[&str]) -> DaemonCli {
    let mut argv = vec!["hldslog-daemon"];
    argv.extend_from_slice(args);
    DaemonCli::parse_from(argv)
}

#[tokio::test]
#[serial]
async fn test_explicit_config_file_is_loaded() {
    // Given: A config file with a custom port and locale
    let file = write_config("[parser]\nport = 27016\nlocale = \"fr\"\ndisplay_chat = false\n");
    let path = file.path().to_string_lossy().into_owned();

    // When: Loading with --config
    let (config, source) = load_config(&cli(&["--config", &path]))
        .await
        .expect("config should load");

    // Then: File values are applied
    assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
    assert_eq!(config.parser.port, 27016);
    assert_eq!(config.parser.locale, "fr");
    assert!(!config.parser.display_chat);
    assert!(config.parser.display_kills);
}

#[tokio::test]
#[serial]
async fn test_missing_explicit_config_is_error() {
    // Given: An explicit path that does not exist
    let result = load_config(&cli(&["--config", "/nonexistent/hldslog.toml"])).await;

    // Then: Should fail and name the file
    let err = result.expect_err("missing explicit config should fail");
    assert!(err.to_string().contains("/nonexistent/hldslog.toml"));
}

#[tokio::test]
#[serial]
async fn test_missing_default_config_falls_back_to_defaults() {
    // Given: A working directory without hldslog.toml
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let previous = std::env::current_dir().expect("cwd should be readable");
    std::env::set_current_dir(dir.path()).expect("cwd should change");

    // When: Loading without --config
    let result = load_config(&cli(&[])).await;
    std::env::set_current_dir(previous).expect("cwd should be restored");

    // Then: Built-in defaults are used
    let (config, source) = result.expect("defaults should load");
    assert_eq!(source, ConfigSource::Defaults);
    assert_eq!(config.parser.source_label(), "0.0.0.0:27115");
    assert_eq!(config.parser.locale, "en");
}

#[tokio::test]
#[serial]
async fn test_cli_overrides_env_and_file() {
    // Given: A file port, an env port and a CLI port
    let file = write_config("[parser]\nport = 27016\nhost = \"10.0.0.1\"\n");
    let path = file.path().to_string_lossy().into_owned();
    // SAFETY: #[serial] serializes tests that touch the environment.
    unsafe { std::env::set_var("HLDSLOG_PARSER_PORT", "27017") };

    // When: Loading with --port
    let env_only = load_config(&cli(&["--config", &path])).await;
    let with_cli = load_config(&cli(&["--config", &path, "--port", "27018"])).await;

    // SAFETY: see above
    unsafe { std::env::remove_var("HLDSLOG_PARSER_PORT") };

    // Then: env beats file, CLI beats env
    let (env_only, _) = env_only.expect("config should load");
    let (with_cli, _) = with_cli.expect("config should load");
    assert_eq!(env_only.parser.port, 27017);
    assert_eq!(with_cli.parser.port, 27018);
    assert_eq!(with_cli.parser.host, "10.0.0.1");
}

#[tokio::test]
#[serial]
async fn test_cli_override_can_fix_file_value() {
    // Given: A file with an unknown log level
    let file = write_config("[general]\nlog_level = \"verbose\"\n");
    let path = file.path().to_string_lossy().into_owned();

    // When: Loading with and without --log-level
    let broken = load_config(&cli(&["--config", &path])).await;
    let fixed = load_config(&cli(&["--config", &path, "--log-level", "debug"])).await;

    // Then: Validation runs after CLI overrides
    let err = broken.expect_err("invalid log level should fail validation");
    assert!(err.to_string().contains("general.log_level"));
    let (config, _) = fixed.expect("override should make config valid");
    assert_eq!(config.general.log_level, "debug");
}

#[tokio::test]
#[serial]
async fn test_empty_host_override_is_rejected() {
    let result = load_config(&cli(&["--host", " ", "--config", "/dev/null"])).await;
    let err = result.expect_err("empty host should fail validation");
    assert!(err.to_string().contains("parser.host"));
}

#[tokio::test]
#[serial]
async fn test_malformed_toml_is_error() {
    let file = write_config("[parser\nport = ");
    let path = file.path().to_string_lossy().into_owned();

    let result = load_config(&cli(&["--config", &path])).await;
    let err = result.expect_err("malformed TOML should fail");
    assert!(err.to_string().contains("failed to load config"));
}
