//! User settings for smb-shares
//!
//! Holds the sanctioned mount tree that share paths must resolve into and
//! the backup retention policy.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::SharesPaths;
use crate::error::SharesError;
use crate::storage::file_io::write_json_atomic;

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of most recent backups to keep when pruning
    pub keep_count: usize,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self { keep_count: 10 }
    }
}

/// Settings for smb-shares
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Every share path must resolve strictly beneath this directory
    #[serde(default = "default_allowed_root")]
    pub allowed_root: PathBuf,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Snapshot shares.json before every change made through the CLI
    #[serde(default = "default_auto_backup")]
    pub auto_backup: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_allowed_root() -> PathBuf {
    PathBuf::from("/mnt")
}

fn default_auto_backup() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            allowed_root: default_allowed_root(),
            backup_retention: BackupRetention::default(),
            auto_backup: default_auto_backup(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &SharesPaths) -> Result<Self, SharesError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| SharesError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                SharesError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SharesPaths) -> Result<(), SharesError> {
        write_json_atomic(paths.settings_file(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.allowed_root, PathBuf::from("/mnt"));
        assert_eq!(settings.backup_retention.keep_count, 10);
        assert!(settings.auto_backup);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SharesPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.backup_retention.keep_count, 10);
        assert!(!paths.settings_file().exists());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SharesPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.allowed_root = PathBuf::from("/srv/storage");
        settings.backup_retention.keep_count = 3;
        settings.auto_backup = false;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.allowed_root, PathBuf::from("/srv/storage"));
        assert_eq!(loaded.backup_retention.keep_count, 3);
        assert!(!loaded.auto_backup);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SharesPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"allowed_root": "/data"}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.allowed_root, PathBuf::from("/data"));
        assert_eq!(loaded.backup_retention.keep_count, 10);
        assert!(loaded.auto_backup);
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SharesPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{ nope").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, SharesError::Config(_)));
    }
}
