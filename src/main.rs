use anyhow::Result;
use clap::{Parser, Subcommand};

use smb_shares::cli::{handle_backup_command, handle_share_command, BackupCommands, ShareCommands};
use smb_shares::config::{paths::SharesPaths, settings::Settings};
use smb_shares::logging::{init_logging, Verbosity};
use smb_shares::storage::{file_io::json_file_valid, ShareStore};

#[derive(Parser)]
#[command(
    name = "smb-shares",
    version,
    about = "Manage custom SMB share definitions and their backups",
    long_about = "smb-shares edits, validates and backs up the custom SMB share \
                  definitions stored in shares.json. Every share path must resolve \
                  inside the allowed root; every change is snapshotted first."
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Share management commands
    #[command(subcommand)]
    Share(ShareCommands),

    /// Backup management commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Create the configuration directory, settings and an empty share list
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flag(cli.verbose));

    let paths = SharesPaths::new();
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Share(cmd)) => handle_share_command(&paths, &settings, cmd)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&paths, &settings, cmd)?,
        Some(Commands::Init) => {
            println!("Initializing smb-shares at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            if !paths.settings_file().exists() {
                settings.save(&paths)?;
            }
            let store = ShareStore::new(paths.shares_file());
            if !store.exists() {
                store.save(&[])?;
            }
            println!("Initialization complete!");
        }
        Some(Commands::Config) => {
            let shares_file = paths.shares_file();
            let status = if !shares_file.exists() {
                "missing"
            } else if json_file_valid(&shares_file) {
                "ok"
            } else {
                "INVALID JSON"
            };

            println!("smb-shares Configuration");
            println!("========================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Shares file:      {} ({})", shares_file.display(), status);
            println!("Backup directory: {}", paths.backup_dir().display());
            println!();
            println!("Settings:");
            println!("  Allowed root:     {}", settings.allowed_root.display());
            println!("  Backups kept:     {}", settings.backup_retention.keep_count);
            println!("  Auto backup:      {}", settings.auto_backup);
        }
        None => {
            println!("smb-shares - custom SMB share definitions");
            println!();
            println!("Run 'smb-shares --help' for usage information.");
        }
    }

    Ok(())
}
