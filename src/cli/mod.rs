//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the storage, validation and
//! backup layers.

pub mod backup;
pub mod share;

pub use backup::{handle_backup_command, BackupCommands};
pub use share::{handle_share_command, ShareCommands, ShareOptions};
