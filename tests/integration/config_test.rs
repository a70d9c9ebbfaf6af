use std::fs;

use bytedog::core::view_mode::ViewMode;
use bytedog::Config;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.update_interval_secs, 2.0);
    assert_eq!(config.queue_capacity, 8);
    assert_eq!(config.history_capacity, 60);
    assert_eq!(config.view_mode, ViewMode::Minimal);
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config.set_update_interval(3.5);
    config.view_mode = ViewMode::Compact;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let loaded = Config::load_from(&temp_dir.path().join("absent.json")).unwrap();
    assert_eq!(loaded, Config::default());
}

#[test]
fn test_corrupt_or_empty_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    fs::write(&path, b"{ not json").unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());

    fs::write(&path, b"").unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_partial_file_fills_missing_fields() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, r#"{ "view_mode": "detailed", "update_interval_secs": 60.0 }"#).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.view_mode, ViewMode::Detailed);
    assert_eq!(loaded.update_interval_secs, 10.0);
    assert_eq!(loaded.terminate_grace_ms, 500);
}
