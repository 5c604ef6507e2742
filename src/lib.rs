//! smb-shares - validated storage and backups for custom SMB share definitions
//!
//! This library holds the share definitions an administrator edits, persisted
//! as a single JSON document, together with a timestamped backup and restore
//! mechanism for that document.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration directory and settings
//! - `error`: Custom error types
//! - `models`: The share record
//! - `validation`: Path resolution and share validation
//! - `storage`: Atomic JSON storage of the share list
//! - `backup`: Backup creation, restore and retention
//! - `cli`: Command handlers for the `smb-shares` binary
//! - `display`: Table formatting for terminal output
//! - `logging`: `tracing` subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use smb_shares::config::{SharesPaths, Settings};
//! use smb_shares::storage::{find_share_index, ShareStore};
//! use smb_shares::validation::ShareValidator;
//! use smb_shares::models::ShareRecord;
//!
//! let paths = SharesPaths::new();
//! let settings = Settings::load_or_create(&paths)?;
//! let store = ShareStore::new(paths.shares_file());
//!
//! let mut shares = store.load()?;
//! let mut share = ShareRecord::new("Media", "/mnt/user/media");
//! ShareValidator::new(&settings.allowed_root).check(&mut share)?;
//! if find_share_index(&shares, &share.name).is_none() {
//!     shares.push(share);
//!     store.save(&shares)?;
//! }
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod storage;
pub mod validation;

pub use error::{SharesError, SharesResult};
