//! Share repository for JSON storage
//!
//! Manages loading and saving the ordered share list in shares.json. The
//! document is a plain JSON array; order is display and precedence order
//! and survives every load/save cycle.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::SharesError;
use crate::models::ShareRecord;

use super::file_io::{read_json, write_json_atomic};

/// Repository for share persistence
#[derive(Debug, Clone)]
pub struct ShareStore {
    path: PathBuf,
}

impl ShareStore {
    /// Create a store backed by the given document path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the document exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load all shares in document order
    ///
    /// A missing document is the "no shares yet" state and yields an empty
    /// list. A present but unparseable document is an error.
    pub fn load(&self) -> Result<Vec<ShareRecord>, SharesError> {
        let shares: Vec<ShareRecord> = read_json(&self.path)?;
        debug!(count = shares.len(), path = %self.path.display(), "loaded shares");
        Ok(shares)
    }

    /// Atomically replace the document with `shares`
    pub fn save(&self, shares: &[ShareRecord]) -> Result<(), SharesError> {
        write_json_atomic(&self.path, shares)?;
        info!(count = shares.len(), path = %self.path.display(), "saved shares");
        Ok(())
    }
}

/// Position of the first share named `name`, if any
///
/// The store does not enforce unique names; callers check with this before
/// adding a share.
pub fn find_share_index(shares: &[ShareRecord], name: &str) -> Option<usize> {
    shares.iter().position(|s| s.name == name)
}
