//! Unit tests for configuration loading and resolution priority
//!
//! Tests that manipulate LYRA_* environment variables are marked #[serial]
//! so they never run in parallel with each other.

use lyra_common::config::{
    CliOverrides, ServiceConfig, TomlConfig, DEFAULT_GEMINI_MODEL, DEFAULT_PORT,
    ENV_GEMINI_API_KEY, ENV_GEMINI_MODEL, ENV_GENIUS_TOKEN,
};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

fn clear_env() {
    env::remove_var(ENV_GENIUS_TOKEN);
    env::remove_var(ENV_GEMINI_API_KEY);
    env::remove_var(ENV_GEMINI_MODEL);
}

fn write_toml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
fn test_toml_config_parses_all_keys() {
    let file = write_toml(
        r#"
bind = "0.0.0.0"
port = 4000
log_level = "debug"
genius_token = "g-token"
gemini_api_key = "ai-key"
gemini_model = "gemini-pro"
genius_api_base = "http://localhost:9000"
"#,
    );

    let config = TomlConfig::load(file.path()).expect("valid TOML should load");
    assert_eq!(config.bind.as_deref(), Some("0.0.0.0"));
    assert_eq!(config.port, Some(4000));
    assert_eq!(config.log_level.as_deref(), Some("debug"));
    assert_eq!(config.genius_token.as_deref(), Some("g-token"));
    assert_eq!(config.gemini_api_key.as_deref(), Some("ai-key"));
    assert_eq!(config.gemini_model.as_deref(), Some("gemini-pro"));
    assert_eq!(config.genius_api_base.as_deref(), Some("http://localhost:9000"));
    assert!(config.spotify_api_base.is_none());
}

#[test]
fn test_malformed_toml_is_an_error() {
    let file = write_toml("port = \"not a number\"");
    assert!(TomlConfig::load(file.path()).is_err());
}

#[test]
fn test_missing_explicit_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("nope.toml");

    let config = TomlConfig::load_or_default(Some(&missing)).expect("missing file is not fatal");
    assert!(config.port.is_none());
    assert!(config.genius_token.is_none());
}

#[test]
#[serial]
fn test_defaults_when_nothing_configured() {
    clear_env();

    let config = ServiceConfig::resolve(&CliOverrides::default(), &TomlConfig::default());
    assert_eq!(config.bind, "127.0.0.1");
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
    assert!(config.genius_token.is_none());
    assert!(config.gemini_api_key.is_none());
    assert_eq!(config.genius_api_base, "https://api.genius.com");
}

#[test]
#[serial]
fn test_cli_overrides_toml() {
    clear_env();

    let toml = TomlConfig {
        port: Some(4000),
        bind: Some("0.0.0.0".to_string()),
        ..Default::default()
    };
    let cli = CliOverrides {
        port: Some(5000),
        bind: None,
        log_level: Some("trace".to_string()),
    };

    let config = ServiceConfig::resolve(&cli, &toml);
    assert_eq!(config.port, 5000);
    assert_eq!(config.bind, "0.0.0.0");
    assert_eq!(config.log_level, "trace");
}

#[test]
#[serial]
fn test_environment_overrides_toml_credentials() {
    clear_env();
    env::set_var(ENV_GEMINI_API_KEY, "from-env");

    let toml = TomlConfig {
        gemini_api_key: Some("from-toml".to_string()),
        genius_token: Some("genius-from-toml".to_string()),
        ..Default::default()
    };

    let config = ServiceConfig::resolve(&CliOverrides::default(), &toml);
    assert_eq!(config.gemini_api_key.as_deref(), Some("from-env"));
    assert_eq!(config.genius_token.as_deref(), Some("genius-from-toml"));

    clear_env();
}

#[test]
#[serial]
fn test_blank_environment_value_is_ignored() {
    clear_env();
    env::set_var(ENV_GENIUS_TOKEN, "   ");

    let toml = TomlConfig {
        genius_token: Some("genius-from-toml".to_string()),
        ..Default::default()
    };

    let config = ServiceConfig::resolve(&CliOverrides::default(), &toml);
    assert_eq!(config.genius_token.as_deref(), Some("genius-from-toml"));

    clear_env();
}
