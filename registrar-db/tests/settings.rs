use std::path::PathBuf;

use registrar_db::settings::settings_path;
use registrar_db::*;

#[test]
fn defaults_are_in_memory_without_enforcement() {
    let settings = Settings::default();
    assert!(settings.database.path.is_none());
    assert!(!settings.database.enforce_foreign_keys);
}

#[test]
fn parse_full_settings() {
    let settings = Settings::from_toml_str(
        r#"
[database]
path = "/tmp/registrar.db"
enforce_foreign_keys = true
"#,
    )
    .unwrap();
    assert_eq!(
        settings.database.path,
        Some(PathBuf::from("/tmp/registrar.db"))
    );
    assert!(settings.database.enforce_foreign_keys);
}

#[test]
fn missing_keys_use_defaults() {
    let settings = Settings::from_toml_str("").unwrap();
    assert_eq!(settings, Settings::default());

    let settings = Settings::from_toml_str("[database]\npath = \"a.db\"\n").unwrap();
    assert_eq!(settings.database.path, Some(PathBuf::from("a.db")));
    assert!(!settings.database.enforce_foreign_keys);
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let err = Settings::from_toml_str("[database\npath = ").unwrap_err();
    assert!(matches!(err, SettingsError::Parse(_)));

    let err = Settings::from_toml_str("[database]\nenforce_foreign_keys = \"yes\"\n").unwrap_err();
    assert!(matches!(err, SettingsError::Parse(_)));
}

#[test]
fn load_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load_from(&dir.path().join("settings.toml")).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[database]\nenforce_foreign_keys = true\n").unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert!(settings.database.enforce_foreign_keys);
    assert!(settings.database.path.is_none());
}

#[test]
fn settings_path_is_under_registrar_dir() {
    let path = settings_path();
    assert!(path.ends_with("registrar/settings.toml"));
}
