//! Store settings (database location, foreign-key enforcement).
//!
//! Settings live in `~/.config/registrar/settings.toml`:
//!
//! ```toml
//! [database]
//! path = "/var/lib/registrar/registrar.db"
//! enforce_foreign_keys = false
//! ```
//!
//! A missing file or missing keys fall back to the defaults: an in-memory
//! database with foreign-key enforcement off, matching the sample schema.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error reading settings: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
}

/// The `[database]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Database file. `None` means an in-memory database.
    pub path: Option<PathBuf>,
    /// Turn on `PRAGMA foreign_keys` for the connection.
    pub enforce_foreign_keys: bool,
}

/// Canonical path to the settings file: `~/.config/registrar/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("registrar").join("settings.toml")
}

impl Settings {
    /// Settings for an on-disk database at `path`, other fields defaulted.
    pub fn with_database_path(path: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseSettings {
                path: Some(path.into()),
                ..DatabaseSettings::default()
            },
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load settings from the canonical [`settings_path`].
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&settings_path())
    }
}
