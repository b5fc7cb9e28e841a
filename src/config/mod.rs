// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Application configuration.
//!
//! Settings are read from a TOML file. Every field has a default, so a
//! missing file or a partial one is fine.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::store::{JsonFileStorage, STORAGE_KEY};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "MIDI_EDITOR_CONFIG";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "MIDI_EDITOR_DATA_DIR";

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Snapshot location
    #[serde(default)]
    pub storage: StorageConfig,
    /// Import behaviour
    #[serde(default)]
    pub import: ImportConfig,
    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_toml(&contents)
    }

    /// Load configuration, falling back to defaults if the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match fs::read_to_string(path.as_ref()) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read config file: {:?}", path.as_ref())),
        }
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize configuration to TOML")
    }

    /// Directory holding the snapshot: config, then `MIDI_EDITOR_DATA_DIR`, then the platform data dir
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }
        if let Ok(dir) = env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| anyhow!("Could not determine a data directory; set {}", DATA_DIR_ENV))
    }

    /// Full path of the snapshot file
    pub fn snapshot_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(&self.storage.file_name))
    }

    /// Storage adapter for the snapshot file
    pub fn open_storage(&self) -> Result<JsonFileStorage> {
        Ok(JsonFileStorage::new(self.snapshot_path()?))
    }
}

/// Snapshot location settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Directory for the snapshot (platform default if unset)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Snapshot file name
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_file_name() -> String {
    format!("{}.json", STORAGE_KEY)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            file_name: default_file_name(),
        }
    }
}

/// Import settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportConfig {
    /// Validate every imported song and note, not just the document shape
    #[serde(default = "default_strict")]
    pub strict: bool,
}

fn default_strict() -> bool {
    true
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            strict: default_strict(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Maximum level: error, warn, info, debug or trace
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl LoggingConfig {
    /// Parse the configured level
    pub fn max_level(&self) -> Result<Level> {
        self.level
            .parse()
            .map_err(|_| anyhow!("Invalid log level: {}", self.level))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "midi-editor", "midi-editor")
}

/// Config file to use: explicit path, then `MIDI_EDITOR_CONFIG`, then the platform config dir
pub fn config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit
        .or_else(|| env::var(CONFIG_ENV).ok().map(PathBuf::from))
        .or_else(|| project_dirs().map(|dirs| dirs.config_dir().join("midi-editor.toml")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_config() {
        let text = r#"
[storage]
data_dir = "/tmp/songs"
file_name = "backup.json"

[import]
strict = false

[logging]
level = "debug"
"#;

        let config = AppConfig::from_toml(text).unwrap();
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/songs")));
        assert_eq!(config.storage.file_name, "backup.json");
        assert!(!config.import.strict);
        assert_eq!(config.logging.max_level().unwrap(), Level::DEBUG);
        assert_eq!(
            config.snapshot_path().unwrap(),
            PathBuf::from("/tmp/songs/backup.json")
        );
    }

    #[test]
    fn test_default_values() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage.file_name, "midi-editor-data.json");
        assert!(config.import.strict);
        assert_eq!(config.logging.max_level().unwrap(), Level::INFO);
    }

    #[test]
    fn test_partial_section() {
        let config = AppConfig::from_toml("[storage]\ndata_dir = \"data\"\n").unwrap();
        assert_eq!(config.storage.file_name, "midi-editor-data.json");
        assert_eq!(config.open_storage().unwrap().path(), Path::new("data/midi-editor-data.json"));
    }

    #[test]
    fn test_invalid_level() {
        let config = AppConfig::from_toml("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(config.logging.max_level().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(AppConfig::from_toml("[storage\n").is_err());
        assert!(AppConfig::from_toml("[import]\nstrict = \"yes\"\n").is_err());
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("midi-editor.toml");

        assert_eq!(AppConfig::load_or_default(&path).unwrap(), AppConfig::default());
        assert!(AppConfig::load(&path).is_err());

        fs::write(&path, "[import]\nstrict = false\n").unwrap();
        assert!(!AppConfig::load_or_default(&path).unwrap().import.strict);
    }

    #[test]
    fn test_round_trip() {
        let mut original = AppConfig::default();
        original.storage.data_dir = Some(PathBuf::from("/data"));
        original.logging.level = "warn".to_string();

        let text = original.to_toml().unwrap();
        assert_eq!(AppConfig::from_toml(&text).unwrap(), original);
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let explicit = PathBuf::from("/etc/midi-editor.toml");
        assert_eq!(config_path(Some(explicit.clone())), Some(explicit));
    }
}
