//! Share CLI commands
//!
//! This is the caller of the core: it enforces unique names, validates
//! every change and persists the validated (canonicalized) record.

use clap::{Args, Subcommand};

use crate::backup::BackupManager;
use crate::config::paths::SharesPaths;
use crate::config::settings::Settings;
use crate::display::{format_share_details, format_share_list};
use crate::error::{SharesError, SharesResult};
use crate::models::ShareRecord;
use crate::storage::{find_share_index, ShareStore};
use crate::validation::ShareValidator;

/// Share subcommands
#[derive(Subcommand)]
pub enum ShareCommands {
    /// List all shares
    List {
        /// Print the raw share list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the settings of one share
    Show {
        /// Share name
        name: String,
    },

    /// Add a new share
    Add {
        /// Share name
        name: String,
        /// Directory to share (must be inside the allowed root)
        path: String,
        #[command(flatten)]
        options: ShareOptions,
    },

    /// Change an existing share
    Edit {
        /// Share name
        name: String,
        /// New share name
        #[arg(long)]
        rename: Option<String>,
        /// New directory to share
        #[arg(long)]
        path: Option<String>,
        #[command(flatten)]
        options: ShareOptions,
    },

    /// Remove a share
    Remove {
        /// Share name
        name: String,
    },

    /// Enable a share
    Enable {
        /// Share name
        name: String,
    },

    /// Disable a share without removing it
    Disable {
        /// Share name
        name: String,
    },

    /// Validate every stored share
    Validate,
}

/// Optional share settings shared by `add` and `edit`
#[derive(Args, Debug, Default)]
pub struct ShareOptions {
    /// Description shown to clients
    #[arg(long)]
    pub comment: Option<String>,
    /// Export mode: -, e, eh, et or eth
    #[arg(long)]
    pub export: Option<String>,
    /// Security mode: public, secure or private
    #[arg(long)]
    pub security: Option<String>,
    /// Permission mask for new files (octal, e.g. 0664)
    #[arg(long)]
    pub create_mask: Option<String>,
    /// Permission mask for new directories (octal, e.g. 0775)
    #[arg(long)]
    pub directory_mask: Option<String>,
    /// Hosts allowed to connect
    #[arg(long)]
    pub hosts_allow: Option<String>,
    /// Hosts denied access
    #[arg(long)]
    pub hosts_deny: Option<String>,
    /// Users allowed to connect (private shares)
    #[arg(long)]
    pub valid_users: Option<String>,
    /// Users allowed to write (secure shares)
    #[arg(long)]
    pub write_list: Option<String>,
    /// Enable macOS compatibility
    #[arg(long)]
    pub fruit: Option<bool>,
}

impl ShareOptions {
    /// Overwrite the fields that were given on the command line
    pub fn apply(self, share: &mut ShareRecord) {
        if let Some(comment) = self.comment {
            share.comment = Some(comment).filter(|c| !c.is_empty());
        }
        if let Some(export) = self.export {
            share.export = export;
        }
        if let Some(security) = self.security {
            share.security = security;
        }
        for (target, value) in [
            (&mut share.create_mask, self.create_mask),
            (&mut share.directory_mask, self.directory_mask),
            (&mut share.hosts_allow, self.hosts_allow),
            (&mut share.hosts_deny, self.hosts_deny),
            (&mut share.valid_users, self.valid_users),
            (&mut share.write_list, self.write_list),
        ] {
            // An empty value clears the setting
            if let Some(value) = value {
                *target = Some(value).filter(|v| !v.is_empty());
            }
        }
        if let Some(fruit) = self.fruit {
            share.fruit = fruit;
        }
    }
}

/// Handle a share command
pub fn handle_share_command(
    paths: &SharesPaths,
    settings: &Settings,
    cmd: ShareCommands,
) -> SharesResult<()> {
    let store = ShareStore::new(paths.shares_file());
    let validator = ShareValidator::new(&settings.allowed_root);

    match cmd {
        ShareCommands::List { json } => {
            let shares = store.load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&shares)?);
            } else {
                println!("{}", format_share_list(&shares));
            }
        }

        ShareCommands::Show { name } => {
            let shares = store.load()?;
            let index = require_index(&shares, &name)?;
            print!("{}", format_share_details(&shares[index]));
        }

        ShareCommands::Add {
            name,
            path,
            options,
        } => {
            let mut shares = store.load()?;
            if name_taken(&shares, &name, None) {
                return Err(SharesError::Duplicate {
                    entity_type: "Share",
                    identifier: name,
                });
            }

            let mut share = ShareRecord::new(name, path);
            options.apply(&mut share);
            validator.check(&mut share)?;

            let message = format!("Added share '{}' at {}", share.name, share.path);
            shares.push(share);
            save_with_backup(paths, settings, &store, &shares)?;
            println!("{}", message);
        }

        ShareCommands::Edit {
            name,
            rename,
            path,
            options,
        } => {
            let mut shares = store.load()?;
            let index = require_index(&shares, &name)?;
            let mut share = shares[index].clone();

            if let Some(new_name) = rename {
                if name_taken(&shares, &new_name, Some(index)) {
                    return Err(SharesError::Duplicate {
                        entity_type: "Share",
                        identifier: new_name,
                    });
                }
                share.name = new_name;
            }
            if let Some(path) = path {
                share.path = path;
            }
            options.apply(&mut share);
            validator.check(&mut share)?;

            let message = format!("Updated share '{}'", share.name);
            shares[index] = share;
            save_with_backup(paths, settings, &store, &shares)?;
            println!("{}", message);
        }

        ShareCommands::Remove { name } => {
            let mut shares = store.load()?;
            let index = require_index(&shares, &name)?;
            shares.remove(index);
            save_with_backup(paths, settings, &store, &shares)?;
            println!("Removed share '{}'", name);
        }

        ShareCommands::Enable { name } => {
            set_enabled(paths, settings, &store, &name, true)?;
            println!("Enabled share '{}'", name);
        }

        ShareCommands::Disable { name } => {
            set_enabled(paths, settings, &store, &name, false)?;
            println!("Disabled share '{}'", name);
        }

        ShareCommands::Validate => {
            let shares = store.load()?;
            let mut problems = Vec::new();

            for share in &shares {
                // Validation canonicalizes paths; this command only reports
                let mut candidate = share.clone();
                let errors = validator.validate(&mut candidate);
                if errors.is_empty() {
                    println!("  OK    {}", share.name);
                } else {
                    println!("  FAIL  {}", share.name);
                    for error in errors {
                        println!("        - {}", error);
                        problems.push(format!("{}: {}", share.name, error));
                    }
                }
            }

            if !problems.is_empty() {
                return Err(SharesError::Validation(problems));
            }
            println!("All {} share(s) are valid.", shares.len());
        }
    }

    Ok(())
}

fn require_index(shares: &[ShareRecord], name: &str) -> SharesResult<usize> {
    find_share_index(shares, name).ok_or_else(|| SharesError::share_not_found(name))
}

/// SMB clients treat share names case-insensitively
fn name_taken(shares: &[ShareRecord], name: &str, except: Option<usize>) -> bool {
    shares
        .iter()
        .enumerate()
        .any(|(i, s)| Some(i) != except && s.name.eq_ignore_ascii_case(name))
}

fn set_enabled(
    paths: &SharesPaths,
    settings: &Settings,
    store: &ShareStore,
    name: &str,
    enabled: bool,
) -> SharesResult<()> {
    let mut shares = store.load()?;
    let index = require_index(&shares, name)?;
    if enabled {
        shares[index].enable();
    } else {
        shares[index].disable();
    }
    save_with_backup(paths, settings, store, &shares)
}

/// Snapshot the current document (if enabled and present), then save
fn save_with_backup(
    paths: &SharesPaths,
    settings: &Settings,
    store: &ShareStore,
    shares: &[ShareRecord],
) -> SharesResult<()> {
    if settings.auto_backup && store.exists() {
        let manager = BackupManager::new(paths.clone(), settings.backup_retention.clone());
        manager.create_backup()?;
    }
    store.save(shares)
}
