//! Integration tests for layered settings.
//!
//! Precedence: defaults, then global file, then local `.exnn.toml`.
//! The env var layer is covered in `config_env_test.rs`.

use std::fs;

use rstest::rstest;
use tempfile::TempDir;

use exnn::application::ApplicationError;
use exnn::config::{local_config_path, Settings};
use exnn::domain::TieBreak;

#[test]
fn given_local_config_only_when_loading_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "tie_break = \"first\"\n").unwrap();

    let settings = Settings::load_files(None, Some(dir.path())).unwrap();

    assert_eq!(settings.tie_break, TieBreak::First);
    assert_eq!(settings.separator, ",");
}

#[test]
fn given_partial_local_config_when_loading_then_global_values_survive() {
    let global_dir = TempDir::new().unwrap();
    let global = global_dir.path().join("exnn.toml");
    fs::write(&global, "tie_break = \"first\"\nseparator = \"\\t\"\n").unwrap();

    let local_dir = TempDir::new().unwrap();
    fs::write(local_config_path(local_dir.path()), "separator = \";\"\n").unwrap();

    let settings = Settings::load_files(Some(&global), Some(local_dir.path())).unwrap();

    assert_eq!(settings.tie_break, TieBreak::First);
    assert_eq!(settings.separator, ";");
}

#[test]
fn given_missing_files_when_loading_then_defaults() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("does-not-exist.toml");

    let settings = Settings::load_files(Some(&global), Some(dir.path())).unwrap();

    assert_eq!(settings, Settings::default());
}

#[rstest]
#[case("tie_break = \"middle\"\n")]
#[case("tie_break = 3\n")]
#[case("this is not toml")]
fn given_malformed_local_config_when_loading_then_config_error(#[case] content: &str) {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), content).unwrap();

    let result = Settings::load_files(None, Some(dir.path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_effective_settings_when_written_as_local_config_then_reloaded_unchanged() {
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        tie_break: TieBreak::First,
        separator: " ".to_string(),
    };
    fs::write(local_config_path(dir.path()), settings.to_toml().unwrap()).unwrap();

    let reloaded = Settings::load_files(None, Some(dir.path())).unwrap();

    assert_eq!(reloaded, settings);
}
