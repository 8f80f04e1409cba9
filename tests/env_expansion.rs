//! Integration tests for the Config::from_file_with_env pipeline.
//!
//! These tests exercise the end-to-end flow: TOML file -> raw parse -> env var
//! expansion -> final Config with KeySource metadata.
//!
//! Each test writes its own temporary file and uses unique variable names.

use std::io::Write;

use gemini_relay::config::{Config, ConfigError, KeySource};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp config");
    file.write_all(content.as_bytes()).expect("write temp config");
    file
}

#[test]
fn test_literal_key_from_file() {
    let file = write_config(
        r#"
[server]
listen = "127.0.0.1:19876"

[gemini]
api_key = "AIzaLiteral"
models = ["gemini-2.0-flash", "gemini-pro"]
"#,
    );

    let (config, source) = Config::from_file_with_env(file.path()).expect("valid config");

    assert_eq!(config.server.listen, "127.0.0.1:19876");
    assert_eq!(
        config.gemini.api_key.as_ref().unwrap().expose_secret(),
        "AIzaLiteral"
    );
    assert_eq!(config.gemini.models, vec!["gemini-2.0-flash", "gemini-pro"]);
    assert_eq!(source, KeySource::Literal);
}

#[test]
fn test_missing_env_var_names_variable() {
    let file = write_config(
        r#"
[gemini]
api_key = "${GEMINI_RELAY_TEST_DEFINITELY_UNSET_7F3A}"
"#,
    );

    let err = Config::from_file_with_env(file.path()).unwrap_err();
    match err {
        ConfigError::EnvVar { var, field, .. } => {
            assert_eq!(var, "GEMINI_RELAY_TEST_DEFINITELY_UNSET_7F3A");
            assert_eq!(field, "gemini.api_key");
        }
        other => panic!("expected EnvVar error, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("nope.toml");

    let err = Config::from_file_with_env(&missing).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let file = write_config("[gemini\napi_key = ");

    let err = Config::from_file_with_env(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_invalid_listen_is_validation_error() {
    let file = write_config(
        r#"
[server]
listen = "not-an-address"

[gemini]
api_key = "k"
"#,
    );

    let err = Config::from_file_with_env(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_wildcard_listen_is_rejected() {
    let file = write_config(
        r#"
[server]
listen = "0.0.0.0:5001"
"#,
    );

    let err = Config::from_file_with_env(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(err.to_string().contains("loopback"));
}

#[test]
fn test_load_with_path_matches_from_file() {
    let file = write_config(
        r#"
[gemini]
api_key = "k"
base_url = "http://127.0.0.1:9/v1beta"
request_timeout_secs = 5
"#,
    );

    let (config, source) = Config::load(Some(file.path())).expect("valid config");
    assert_eq!(config.gemini.base_url, "http://127.0.0.1:9/v1beta");
    assert_eq!(config.gemini.request_timeout_secs, Some(5));
    assert_eq!(source, KeySource::Literal);
}

#[test]
fn test_load_without_path_uses_defaults() {
    let (config, _source) = Config::load(None).expect("default config");
    assert_eq!(config.server.listen, "127.0.0.1:5001");
    assert_eq!(config.gemini.models.len(), 4);
    assert_eq!(config.gemini.models[0], "gemini-2.5-flash");
}
