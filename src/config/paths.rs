//! Path management for smb-shares
//!
//! All state lives under a single configuration directory:
//!
//! ```text
//! <base>/shares.json     share definitions
//! <base>/settings.json   tool settings
//! <base>/backups/        timestamped snapshots of shares.json
//! ```
//!
//! ## Path Resolution Order
//!
//! 1. `SMB_SHARES_CONFIG_DIR` environment variable (if set)
//! 2. The plugin directory on the flash drive, `/boot/config/plugins/custom.smb.shares`

use std::path::PathBuf;

use crate::error::SharesError;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "SMB_SHARES_CONFIG_DIR";

/// Default configuration directory
pub const DEFAULT_CONFIG_DIR: &str = "/boot/config/plugins/custom.smb.shares";

/// Manages all paths used by smb-shares
#[derive(Debug, Clone)]
pub struct SharesPaths {
    /// Base directory for all state
    base_dir: PathBuf,
}

impl SharesPaths {
    /// Create a new SharesPaths instance from the environment
    pub fn new() -> Self {
        let base_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => PathBuf::from(DEFAULT_CONFIG_DIR),
        };

        Self { base_dir }
    }

    /// Create SharesPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to shares.json
    pub fn shares_file(&self) -> PathBuf {
        self.base_dir.join("shares.json")
    }

    /// Get the backup directory (`<base>/backups/`)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("settings.json")
    }

    /// Ensure the base and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), SharesError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SharesError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| SharesError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }
}

impl Default for SharesPaths {
    fn default() -> Self {
        Self::new()
    }
}
