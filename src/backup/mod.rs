//! Backup system for smb-shares
//!
//! Provides timestamped snapshots of shares.json with a count-based
//! retention policy, plus view, restore and delete operations.
//!
//! # Backup Format
//!
//! A backup is an exact byte copy of shares.json at the time it was taken,
//! stored as `backups/shares_YYYY-MM-DD_HH-MM-SS.json`. Backups are never
//! re-serialized, so they survive documents this version cannot fully parse.
//!
//! # Retention Policy
//!
//! Creating a backup prunes the directory down to the configured number of
//! newest backups (10 by default).
//!
//! # Example
//!
//! ```rust,ignore
//! use smb_shares::backup::BackupManager;
//! use smb_shares::config::{BackupRetention, SharesPaths};
//!
//! let paths = SharesPaths::new();
//! let manager = BackupManager::new(paths, BackupRetention::default());
//!
//! let backup_path = manager.create_backup()?;
//! let filename = backup_path.file_name().unwrap().to_string_lossy();
//! manager.restore_backup(&filename)?;
//! ```

mod manager;

pub use manager::{prune_backups, BackupInfo, BackupManager};
