//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/exnn/exnn.toml`
//! 3. Local config: `<dir>/.exnn.toml` (working directory or `-C <dir>`)
//! 4. Environment variables: `EXNN_*` prefix
//!
//! Command-line flags override all of these.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::TieBreak;

/// Raw settings for intermediate parsing (`None` means "not specified, inherit").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub tie_break: Option<TieBreak>,
    pub separator: Option<String>,
}

/// Unified configuration for exnn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Side taken by the majority descent when both children have equal votes
    pub tie_break: TieBreak,
    /// Separator used when printing neighbor names to stdout
    pub separator: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::default(),
            separator: ",".into(),
        }
    }
}

/// Get the XDG config directory for exnn.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "exnn").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("exnn.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".exnn.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            tie_break: overlay.tie_break.unwrap_or(self.tie_break),
            separator: overlay
                .separator
                .clone()
                .unwrap_or_else(|| self.separator.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a local `.exnn.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let current = Self::load_files(global_config_path().as_deref(), local_dir)?;
        Self::apply_env_overrides(current)
    }

    /// Defaults, then the global file, then the local file; no env vars.
    pub fn load_files(global: Option<&Path>, local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        Ok(current)
    }

    /// Apply EXNN_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // EXNN_TIE_BREAK: single underscore after the prefix, `__` only for nesting
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("EXNN")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("tie_break") {
            settings.tie_break = val
                .parse()
                .map_err(|message: String| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("separator") {
            settings.separator = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# exnn configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/exnn/exnn.toml
#   Local:  <dir>/.exnn.toml
#   Env:    EXNN_* environment variables (explicit overrides)

# Child followed by the majority descent on equal votes: "first" or "second"
# tie_break = "second"

# Separator for neighbor names printed to stdout
# separator = ","
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
