//! Env var layer of the settings.
//!
//! Kept in its own test binary with a single test: env vars are
//! process-global and would race with other config tests.

use std::env;
use std::fs;

use tempfile::TempDir;

use exnn::application::ApplicationError;
use exnn::config::{local_config_path, Settings};
use exnn::domain::TieBreak;

#[test]
fn given_exnn_env_vars_when_loading_then_they_override_files() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "tie_break = \"second\"\nseparator = \";\"\n",
    )
    .unwrap();

    env::set_var("EXNN_TIE_BREAK", "first");
    env::set_var("EXNN_SEPARATOR", "|");
    let overridden = Settings::load(Some(dir.path()));

    env::set_var("EXNN_TIE_BREAK", "middle");
    let invalid = Settings::load(Some(dir.path()));

    env::remove_var("EXNN_TIE_BREAK");
    env::remove_var("EXNN_SEPARATOR");
    let restored = Settings::load(Some(dir.path()));

    let overridden = overridden.unwrap();
    assert_eq!(overridden.tie_break, TieBreak::First);
    assert_eq!(overridden.separator, "|");

    assert!(matches!(invalid, Err(ApplicationError::Config { .. })));

    let restored = restored.unwrap();
    assert_eq!(restored.tie_break, TieBreak::Second);
    assert_eq!(restored.separator, ";");
}
