//! Configuration module for smb-shares
//!
//! This module provides configuration management including:
//! - Configuration directory resolution
//! - Settings persistence (allowed root, backup retention)

pub mod paths;
pub mod settings;

pub use paths::SharesPaths;
pub use settings::{BackupRetention, Settings};
