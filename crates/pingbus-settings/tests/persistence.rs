use pingbus_settings::{Config, ConfigError, FailurePolicy, LogFormat, SettingsError};
use std::fs;
use tempfile::TempDir;

fn customized() -> Config {
    let mut config = Config::new();
    config.bus.channel_capacity = 64;
    config.bus.failure_policy = FailurePolicy::Isolate;
    config.worker.thread_name = "echo".to_string();
    config.worker.reply_timeout_ms = 750;
    config.logging.level = "debug".to_string();
    config.logging.format = LogFormat::Compact;
    config
}

#[test]
fn toml_file_round_trips() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested").join("config.toml");

    let config = customized();
    config.save_to_file(&path).expect("save");
    let loaded = Config::load_from_file(&path).expect("load");

    assert_eq!(loaded, config);
}

#[test]
fn json_file_round_trips() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.json");

    let config = customized();
    config.save_to_file(&path).expect("save");
    let loaded = Config::load_from_file(&path).expect("load");

    assert_eq!(loaded, config);
}

#[test]
fn partial_toml_uses_defaults() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[bus]\nfailure_policy = \"isolate\"\n\n[logging]\nformat = \"json\"\n",
    )
    .expect("write");

    let loaded = Config::load_from_file(&path).expect("load");
    assert_eq!(loaded.bus.failure_policy, FailurePolicy::Isolate);
    assert_eq!(loaded.bus.channel_capacity, 1024);
    assert_eq!(loaded.logging.format, LogFormat::Json);
    assert_eq!(loaded.worker, Config::default().worker);
}

#[test]
fn invalid_values_are_rejected_on_load() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[worker]\nreply_timeout_ms = 0\n").expect("write");

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::ValueOutOfRange { .. })
    ));
}

#[test]
fn invalid_values_are_not_saved() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.toml");

    let mut config = Config::new();
    config.logging.level = "verbose".to_string();

    assert!(config.save_to_file(&path).is_err());
    assert!(!path.exists());
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");

    let err = Config::new().save_to_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::UnsupportedFormat(_))
    ));
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("absent.toml");

    let err = Config::load_from_file(&path).unwrap_err();
    match err {
        SettingsError::LoadError { path: reported, .. } => {
            assert!(reported.ends_with("absent.toml"))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[bus\nchannel_capacity = ").expect("write");

    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));
}

#[test]
fn explicit_path_wins_in_load_or_default() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.json");
    customized().save_to_file(&path).expect("save");

    let loaded = Config::load_or_default(Some(&path)).expect("load");
    assert_eq!(loaded.worker.thread_name, "echo");
}

#[test]
fn failure_policy_is_stored_lowercase() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("policy.toml");

    let mut config = Config::default();
    config.bus.failure_policy = FailurePolicy::Isolate;
    config.save_to_file(&path).expect("save");

    let text = fs::read_to_string(&path).expect("read");
    assert!(text.contains("failure_policy = \"isolate\""));

    let loaded = Config::load_from_file(&path).expect("load");
    assert_eq!(loaded.bus.failure_policy, FailurePolicy::Isolate);
}
