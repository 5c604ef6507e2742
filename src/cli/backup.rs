//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;

use crate::backup::{prune_backups, BackupManager};
use crate::config::paths::SharesPaths;
use crate::config::settings::Settings;
use crate::display::{format_backup_list, format_share_list, format_size};
use crate::error::{SharesError, SharesResult};

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup of shares.json
    Create,

    /// List all available backups, newest first
    List {
        /// Print backup metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the shares stored in a backup
    View {
        /// Backup filename (use 'latest' for most recent)
        backup: String,
    },

    /// Restore shares.json from a backup
    Restore {
        /// Backup filename (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete a backup
    Delete {
        /// Backup filename
        backup: String,
    },

    /// Delete old backups beyond the retention count
    Prune {
        /// Number of backups to keep (defaults to the configured retention)
        #[arg(long)]
        keep: Option<usize>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &SharesPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> SharesResult<()> {
    let manager = BackupManager::new(paths.clone(), settings.backup_retention.clone());

    match cmd {
        BackupCommands::Create => {
            let backup_path = manager.create_backup()?;
            println!("Backup created: {}", display_name(&backup_path));
            println!("Location: {}", backup_path.display());
        }

        BackupCommands::List { json } => {
            let backups = manager.list_backups()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&backups)?);
                return Ok(());
            }

            println!("{}", format_backup_list(&backups));
            if !backups.is_empty() {
                println!();
                println!(
                    "Total: {} backup(s), keeping {}",
                    backups.len(),
                    settings.backup_retention.keep_count
                );
            }
        }

        BackupCommands::View { backup } => {
            let filename = resolve_backup_name(&manager, &backup)?;
            let shares = manager
                .view_backup(&filename)?
                .ok_or_else(|| SharesError::backup_not_found(&filename))?;

            println!("Backup: {}", filename);
            println!("{}", format_share_list(&shares));
        }

        BackupCommands::Restore { backup, force } => {
            let filename = resolve_backup_name(&manager, &backup)?;
            let shares = manager
                .view_backup(&filename)?
                .ok_or_else(|| SharesError::backup_not_found(&filename))?;

            if !force {
                println!("Backup {} contains {} share(s).", filename, shares.len());
                println!("WARNING: This will overwrite the current share definitions!");
                println!("To proceed, run again with --force flag:");
                println!("  smb-shares backup restore {} --force", backup);
                return Ok(());
            }

            // Prune only after the restore; the target may be the oldest backup
            if paths.shares_file().exists() {
                let safety = manager.snapshot()?;
                println!("Pre-restore backup saved: {}", display_name(&safety));
            }

            if !manager.restore_backup(&filename)? {
                return Err(SharesError::backup_not_found(&filename));
            }
            manager.enforce_retention()?;

            println!("Restored {} share(s) from {}", shares.len(), filename);
        }

        BackupCommands::Delete { backup } => {
            if !manager.delete_backup(&backup)? {
                return Err(SharesError::backup_not_found(&backup));
            }
            println!("Deleted backup {}", backup);
        }

        BackupCommands::Prune { keep, force } => {
            let keep = keep.unwrap_or(settings.backup_retention.keep_count);
            let backups = manager.list_backups()?;
            let to_delete = backups.len().saturating_sub(keep);

            if to_delete == 0 {
                println!("No backups to prune ({} present, keeping {}).", backups.len(), keep);
                return Ok(());
            }

            if !force {
                let bytes: u64 = backups.iter().skip(keep).map(|b| b.size_bytes).sum();
                println!(
                    "Would delete {} of {} backup(s) ({}), keeping the {} newest.",
                    to_delete,
                    backups.len(),
                    format_size(bytes),
                    keep
                );
                println!("To delete old backups, run again with --force flag:");
                println!("  smb-shares backup prune --force");
                return Ok(());
            }

            let deleted = prune_backups(manager.backup_dir(), keep)?;
            println!("Deleted {} backup(s).", deleted.len());
        }
    }

    Ok(())
}

/// Map 'latest' to the newest backup's filename
fn resolve_backup_name(manager: &BackupManager, backup: &str) -> SharesResult<String> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .latest_backup()?
            .map(|b| b.filename)
            .ok_or_else(|| SharesError::backup_not_found("latest"));
    }
    Ok(backup.to_string())
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
