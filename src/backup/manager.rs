//! Backup manager for smb-shares
//!
//! Snapshots shares.json byte-for-byte into `backups/` and manages those
//! snapshots. Backup files are only ever created or deleted, never edited.
//!
//! File names encode the creation time:
//! `shares_YYYY-MM-DD_HH-MM-SS.json`. A second backup within the same second
//! gets a sequence suffix (`shares_YYYY-MM-DD_HH-MM-SS_1.json`) instead of
//! replacing the first.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::paths::SharesPaths;
use crate::config::settings::BackupRetention;
use crate::error::{SharesError, SharesResult};
use crate::models::ShareRecord;
use crate::storage::file_io::{copy_permissions, write_bytes_atomic};

const BACKUP_PREFIX: &str = "shares_";
const BACKUP_SUFFIX: &str = ".json";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const TIMESTAMP_LEN: usize = 19;
const MAX_SEQUENCE: u32 = 999;

/// Metadata about a backup
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// When the backup was created (local time, from the filename)
    pub created_at: NaiveDateTime,
    /// Same-second sequence number, 0 for the first backup of that second
    pub sequence: u32,
    /// Size in bytes
    pub size_bytes: u64,
    /// Number of top-level entries in the backup, 0 if it cannot be parsed
    pub share_count: usize,
}

/// A backup file found on disk, before metadata is read
#[derive(Debug)]
struct BackupFile {
    filename: String,
    path: PathBuf,
    created_at: NaiveDateTime,
    sequence: u32,
}

/// Manages backup creation, inspection, restore and retention
pub struct BackupManager {
    /// Path to backup directory
    backup_dir: PathBuf,
    /// The live share document
    shares_file: PathBuf,
    /// Retention policy
    retention: BackupRetention,
}

impl BackupManager {
    /// Create a new BackupManager
    pub fn new(paths: SharesPaths, retention: BackupRetention) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            shares_file: paths.shares_file(),
            retention,
        }
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Snapshot the share document and enforce the retention policy
    ///
    /// Returns the path of the new backup. With a retention of zero the new
    /// backup is pruned along with everything else.
    pub fn create_backup(&self) -> SharesResult<PathBuf> {
        let backup_path = self.snapshot()?;
        self.enforce_retention()?;
        Ok(backup_path)
    }

    /// Copy the share document into a new, never-overwritten backup file
    ///
    /// Unlike [`create_backup`](Self::create_backup) this does not prune, so
    /// it is safe to call right before restoring an old backup.
    pub fn snapshot(&self) -> SharesResult<PathBuf> {
        let bytes = fs::read(&self.shares_file).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SharesError::Backup(format!(
                "Nothing to back up: {} does not exist",
                self.shares_file.display()
            )),
            _ => SharesError::Io(format!("Failed to read shares file for backup: {}", e)),
        })?;

        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| SharesError::Io(format!("Failed to create backup directory: {}", e)))?;

        let mut temp = NamedTempFile::new_in(&self.backup_dir)
            .map_err(|e| SharesError::Io(format!("Failed to create backup file: {}", e)))?;
        // Backups are readable by whoever can read the live document
        temp.write_all(&bytes)
            .and_then(|_| copy_permissions(&temp, &self.shares_file))
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| SharesError::Io(format!("Failed to write backup file: {}", e)))?;

        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

        for sequence in 0..=MAX_SEQUENCE {
            let path = self.backup_dir.join(backup_filename(&stamp, sequence));
            match temp.persist_noclobber(&path) {
                Ok(_) => {
                    info!(path = %path.display(), bytes = bytes.len(), "created backup");
                    return Ok(path);
                }
                Err(e) if e.error.kind() == ErrorKind::AlreadyExists => temp = e.file,
                Err(e) => {
                    return Err(SharesError::Io(format!(
                        "Failed to write backup file: {}",
                        e.error
                    )))
                }
            }
        }

        Err(SharesError::Backup(format!(
            "Too many backups created at {}",
            stamp
        )))
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> SharesResult<Vec<BackupInfo>> {
        let files = scan_backups(&self.backup_dir)?;

        let mut backups = Vec::with_capacity(files.len());
        for file in files {
            let size_bytes = fs::metadata(&file.path)
                .map_err(|e| SharesError::Io(format!("Failed to read backup metadata: {}", e)))?
                .len();
            let share_count = count_entries(&file.path);

            backups.push(BackupInfo {
                filename: file.filename,
                path: file.path,
                created_at: file.created_at,
                sequence: file.sequence,
                size_bytes,
                share_count,
            });
        }

        Ok(backups)
    }

    /// Get the most recent backup
    pub fn latest_backup(&self) -> SharesResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }

    /// Parse the shares stored in a backup
    ///
    /// Returns `None` if no such backup exists.
    pub fn view_backup(&self, filename: &str) -> SharesResult<Option<Vec<ShareRecord>>> {
        let Some(path) = self.resolve_backup(filename) else {
            return Ok(None);
        };

        let bytes = fs::read(&path)
            .map_err(|e| SharesError::Io(format!("Failed to read backup file: {}", e)))?;
        let shares = serde_json::from_slice(&bytes).map_err(|e| {
            SharesError::Json(format!("Failed to parse backup {}: {}", filename, e))
        })?;

        Ok(Some(shares))
    }

    /// Replace the live share document with a backup's exact bytes
    ///
    /// Returns `false` if no such backup exists. A backup that does not parse
    /// as a share list is refused and the live document is left alone. No
    /// safety backup of the current document is taken here.
    pub fn restore_backup(&self, filename: &str) -> SharesResult<bool> {
        let Some(path) = self.resolve_backup(filename) else {
            return Ok(false);
        };

        let bytes = fs::read(&path)
            .map_err(|e| SharesError::Io(format!("Failed to read backup file: {}", e)))?;
        serde_json::from_slice::<Vec<ShareRecord>>(&bytes).map_err(|e| {
            SharesError::Backup(format!(
                "Refusing to restore {}: not a valid share list: {}",
                filename, e
            ))
        })?;

        write_bytes_atomic(&self.shares_file, &bytes)?;
        info!(backup = filename, "restored shares from backup");
        Ok(true)
    }

    /// Delete a backup, returning `false` if it does not exist
    pub fn delete_backup(&self, filename: &str) -> SharesResult<bool> {
        let Some(path) = self.resolve_backup(filename) else {
            return Ok(false);
        };

        match fs::remove_file(&path) {
            Ok(()) => {
                info!(backup = filename, "deleted backup");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SharesError::Io(format!("Failed to delete backup: {}", e))),
        }
    }

    /// Enforce retention policy by deleting old backups
    pub fn enforce_retention(&self) -> SharesResult<Vec<PathBuf>> {
        prune_backups(&self.backup_dir, self.retention.keep_count)
    }

    /// Map a caller-supplied filename to a regular file in the backup directory
    fn resolve_backup(&self, filename: &str) -> Option<PathBuf> {
        if !is_safe_backup_name(filename) {
            warn!(filename, "rejected backup filename");
            return None;
        }

        let path = self.backup_dir.join(filename);
        let is_file = fs::symlink_metadata(&path)
            .map(|m| m.file_type().is_file())
            .unwrap_or(false);

        is_file.then_some(path)
    }
}

/// Delete all but the `keep_count` newest backups in `backup_dir`
///
/// Only files named like backups are considered. Returns the deleted paths.
pub fn prune_backups(backup_dir: &Path, keep_count: usize) -> SharesResult<Vec<PathBuf>> {
    let mut deleted = Vec::new();

    for backup in scan_backups(backup_dir)?.into_iter().skip(keep_count) {
        fs::remove_file(&backup.path)
            .map_err(|e| SharesError::Io(format!("Failed to delete old backup: {}", e)))?;
        debug!(backup = %backup.filename, "pruned backup");
        deleted.push(backup.path);
    }

    if !deleted.is_empty() {
        info!(deleted = deleted.len(), keep_count, "pruned backups");
    }

    Ok(deleted)
}

/// Find backup files in `dir`, newest first
fn scan_backups(dir: &Path) -> SharesResult<Vec<BackupFile>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut backups = Vec::new();

    for entry in fs::read_dir(dir)
        .map_err(|e| SharesError::Io(format!("Failed to read backup directory: {}", e)))?
    {
        let entry = entry
            .map_err(|e| SharesError::Io(format!("Failed to read directory entry: {}", e)))?;

        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        let filename = entry.file_name().to_string_lossy().to_string();

        if !is_file {
            continue;
        }
        if let Some((created_at, sequence)) = parse_backup_filename(&filename) {
            backups.push(BackupFile {
                path: entry.path(),
                filename,
                created_at,
                sequence,
            });
        }
    }

    backups.sort_by(|a, b| {
        (b.created_at, b.sequence, &b.filename).cmp(&(a.created_at, a.sequence, &a.filename))
    });

    Ok(backups)
}

fn backup_filename(stamp: &str, sequence: u32) -> String {
    if sequence == 0 {
        format!("{}{}{}", BACKUP_PREFIX, stamp, BACKUP_SUFFIX)
    } else {
        format!("{}{}_{}{}", BACKUP_PREFIX, stamp, sequence, BACKUP_SUFFIX)
    }
}

/// Parse `shares_YYYY-MM-DD_HH-MM-SS[_N].json` into its timestamp and sequence
fn parse_backup_filename(filename: &str) -> Option<(NaiveDateTime, u32)> {
    let body = filename
        .strip_prefix(BACKUP_PREFIX)?
        .strip_suffix(BACKUP_SUFFIX)?;

    let stamp = body.get(..TIMESTAMP_LEN)?;
    let created_at = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;

    let sequence = match &body[TIMESTAMP_LEN..] {
        "" => 0,
        rest => {
            let digits = rest.strip_prefix('_')?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse::<u32>().ok().filter(|n| *n > 0)?
        }
    };

    Some((created_at, sequence))
}

/// A single file name in the backup directory, never a path
fn is_safe_backup_name(filename: &str) -> bool {
    !filename.contains(['/', '\\', '\0'])
        && !filename.contains("..")
        && parse_backup_filename(filename).is_some()
}

/// Count top-level entries in a backup, treating unreadable backups as empty
fn count_entries(path: &Path) -> usize {
    let value = fs::read(path)
        .ok()
        .and_then(|bytes| serde_json::from_slice::<serde_json::Value>(&bytes).ok());

    match value {
        Some(serde_json::Value::Array(items)) => items.len(),
        Some(serde_json::Value::Object(map)) => map.len(),
        _ => {
            warn!(path = %path.display(), "backup is not a JSON share list");
            0
        }
    }
}
