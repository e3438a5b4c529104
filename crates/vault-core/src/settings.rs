//! Service settings management
//!
//! Stores non-sensitive configuration in a plain JSON file.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, Level};

use crate::crypto::KeyDerivationParams;
use crate::error::{Result, VaultError};
use crate::storage::FileRecordStore;

const SETTINGS_FILE: &str = "settings.json";

/// Service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Directory for record files (platform data dir when unset)
    pub storage_dir: Option<PathBuf>,
    /// HTTP listen port
    pub port: u16,
    /// One of trace, debug, info, warn, error
    pub log_level: String,
    /// Argon2id costs for newly armored private keys
    pub kdf: KeyDerivationParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 1,
            storage_dir: None,
            port: 8080,
            log_level: "info".to_string(),
            kdf: KeyDerivationParams::default(),
        }
    }
}

impl Settings {
    /// Platform configuration directory holding `settings.json`
    pub fn default_config_dir() -> Result<PathBuf> {
        ProjectDirs::from("io", "textvault", "textvault")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| VaultError::Config("Could not determine config directory".to_string()))
    }

    /// Storage directory to use, falling back to the platform data directory
    pub fn effective_storage_dir(&self) -> Result<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => FileRecordStore::default_dir(),
        }
    }

    /// Parsed log level
    pub fn level(&self) -> Result<Level> {
        parse_log_level(&self.log_level)
    }

    /// Reject settings the service cannot start with
    pub fn validate(&self) -> Result<()> {
        self.level()?;
        self.kdf
            .validate()
            .map_err(|e| VaultError::Config(format!("invalid kdf settings: {}", e)))
    }
}

/// Parse a log level name; unknown names are a configuration error
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(VaultError::Config(format!(
            "the specified '{}' log level is not supported",
            other
        ))),
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Load settings from `config_dir`, using defaults when no file exists
    pub fn load(config_dir: &Path) -> Result<Self> {
        let settings_file = config_dir.join(SETTINGS_FILE);
        let settings = Self::load_from_file(&settings_file)?;

        Ok(Self {
            settings_file,
            settings,
        })
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| VaultError::Config(format!("cannot read {:?}: {}", path, e)))?;
        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| VaultError::Config(format!("invalid settings file {:?}: {}", path, e)))?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub async fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.settings)?;

        if let Some(parent) = self.settings_file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| VaultError::Config(e.to_string()))?;
        }

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| VaultError::Config(e.to_string()))?;
        tokio::fs::rename(&temp_path, &self.settings_file)
            .await
            .map_err(|e| VaultError::Config(e.to_string()))?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Update settings and save
    pub async fn update(&mut self, settings: Settings) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        self.save().await
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_default() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::load(temp_dir.path()).unwrap();

        let settings = manager.get();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.level().unwrap(), Level::INFO);
        assert_eq!(settings.kdf, KeyDerivationParams::default());
        assert!(settings.validate().is_ok());
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut manager = SettingsManager::load(temp_dir.path()).unwrap();
            manager.get_mut().port = 9000;
            manager.get_mut().storage_dir = Some(PathBuf::from("/var/lib/textvault"));
            manager.get_mut().log_level = "debug".to_string();
            manager.save().await.unwrap();
        }

        {
            let manager = SettingsManager::load(temp_dir.path()).unwrap();
            assert_eq!(manager.get().port, 9000);
            assert_eq!(
                manager.get().effective_storage_dir().unwrap(),
                PathBuf::from("/var/lib/textvault")
            );
            assert_eq!(manager.get().level().unwrap(), Level::DEBUG);
        }
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(SETTINGS_FILE),
            r#"{"kdf":{"memoryCost":19456,"timeCost":2,"parallelism":1}}"#,
        )
        .unwrap();

        let settings = SettingsManager::load(temp_dir.path()).unwrap().into_settings();
        assert_eq!(settings.kdf.memory_cost, 19456);
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(SETTINGS_FILE), "{not json").unwrap();

        assert!(matches!(
            SettingsManager::load(temp_dir.path()),
            Err(VaultError::Config(_))
        ));
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(parse_log_level("warn").unwrap(), Level::WARN);
        assert_eq!(parse_log_level(" ERROR ").unwrap(), Level::ERROR);
        assert!(matches!(parse_log_level("fatal"), Err(VaultError::Config(_))));
        assert!(matches!(parse_log_level(""), Err(VaultError::Config(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::load(temp_dir.path()).unwrap();

        let bad = Settings {
            log_level: "loud".to_string(),
            ..Settings::default()
        };
        assert!(manager.update(bad).await.is_err());
        assert_eq!(manager.get().log_level, "info");
    }
}
