//! Share validation
//!
//! Every check runs independently and all failures are reported together,
//! so an operator can fix a share definition in one pass.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::path::resolve_path;
use crate::error::{SharesError, SharesResult};
use crate::models::{ExportMode, SecurityMode, ShareRecord};

/// Maximum length of a share name
pub const MAX_NAME_LEN: usize = 64;

/// Section names smb.conf gives a special meaning, compared case-insensitively
const RESERVED_NAMES: [&str; 3] = ["global", "homes", "printers"];

/// Validation errors for shares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareValidationError {
    MissingName,
    InvalidName(String),
    ReservedName(String),
    NameTooLong(usize),
    MissingPath,
    PathNotFound(String),
    PathOutsideRoot { path: PathBuf, root: PathBuf },
    NotADirectory(String),
    PathUnresolvable(String),
    InvalidMask { field: &'static str, value: String },
    InvalidExport(String),
    InvalidSecurity(String),
    ControlCharacters { field: &'static str },
}

impl fmt::Display for ShareValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "Share name is required"),
            Self::InvalidName(name) => write!(
                f,
                "Invalid share name '{}': use only letters, digits, '.', '_' and '-', \
                 and do not start with '.'",
                name
            ),
            Self::ReservedName(name) => {
                write!(f, "Share name '{}' is reserved by Samba", name)
            }
            Self::NameTooLong(len) => write!(
                f,
                "Share name too long ({} chars, max {})",
                len, MAX_NAME_LEN
            ),
            Self::MissingPath => write!(f, "Share path is required"),
            Self::PathNotFound(path) => write!(f, "Path does not exist: {}", path),
            Self::PathOutsideRoot { path, root } => write!(
                f,
                "Path must be inside {}: resolves to {}",
                root.display(),
                path.display()
            ),
            Self::NotADirectory(path) => write!(f, "Path is not a directory: {}", path),
            Self::PathUnresolvable(reason) => write!(f, "Path cannot be resolved: {}", reason),
            Self::InvalidMask { field, value } => write!(
                f,
                "Invalid {} '{}': must be 3 or 4 octal digits (0-7)",
                field, value
            ),
            Self::InvalidExport(value) => write!(
                f,
                "Invalid export mode '{}': expected one of -, e, eh, et, eth",
                value
            ),
            Self::InvalidSecurity(value) => write!(
                f,
                "Invalid security mode '{}': expected public, secure or private",
                value
            ),
            Self::ControlCharacters { field } => write!(
                f,
                "{} must not contain line breaks or control characters",
                field
            ),
        }
    }
}

impl std::error::Error for ShareValidationError {}

/// Validates share definitions against an allowed root
#[derive(Debug, Clone)]
pub struct ShareValidator {
    allowed_root: PathBuf,
}

impl ShareValidator {
    /// Create a validator that only accepts paths beneath `allowed_root`
    pub fn new(allowed_root: impl Into<PathBuf>) -> Self {
        Self {
            allowed_root: allowed_root.into(),
        }
    }

    /// Validate a share, returning every problem found
    ///
    /// On a successful path check `share.path` is replaced with the canonical
    /// path. Callers must persist the mutated record, never the original input.
    pub fn validate(&self, share: &mut ShareRecord) -> Vec<ShareValidationError> {
        let mut errors = Vec::new();

        if let Some(err) = check_name(&share.name) {
            errors.push(err);
        }

        match self.check_path(&share.path) {
            Ok(canonical) => share.path = canonical,
            Err(err) => errors.push(err),
        }

        for (field, mask) in [
            ("create mask", &share.create_mask),
            ("directory mask", &share.directory_mask),
        ] {
            if let Some(value) = mask {
                if !is_octal_mask(value) {
                    errors.push(ShareValidationError::InvalidMask {
                        field,
                        value: value.clone(),
                    });
                }
            }
        }

        if ExportMode::parse(&share.export).is_none() {
            errors.push(ShareValidationError::InvalidExport(share.export.clone()));
        }

        if SecurityMode::parse(&share.security).is_none() {
            errors.push(ShareValidationError::InvalidSecurity(share.security.clone()));
        }

        for (field, value) in [
            ("Comment", &share.comment),
            ("Hosts allow", &share.hosts_allow),
            ("Hosts deny", &share.hosts_deny),
            ("Valid users", &share.valid_users),
            ("Write list", &share.write_list),
        ] {
            if value.as_deref().is_some_and(has_control_chars) {
                errors.push(ShareValidationError::ControlCharacters { field });
            }
        }

        debug!(share = %share.name, errors = errors.len(), "validated share");
        errors
    }

    /// Validate a share, folding any problems into a single error
    pub fn check(&self, share: &mut ShareRecord) -> SharesResult<()> {
        let errors = self.validate(share);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SharesError::Validation(
                errors.iter().map(ToString::to_string).collect(),
            ))
        }
    }

    fn check_path(&self, raw: &str) -> Result<String, ShareValidationError> {
        if raw.trim().is_empty() {
            return Err(ShareValidationError::MissingPath);
        }

        let canonical = resolve_path(raw, &self.allowed_root).map_err(|e| match e {
            SharesError::PathNotFound(path) => ShareValidationError::PathNotFound(path),
            SharesError::PathEscape { path, root } => {
                ShareValidationError::PathOutsideRoot { path, root }
            }
            other => ShareValidationError::PathUnresolvable(other.to_string()),
        })?;

        if !canonical.is_dir() {
            return Err(ShareValidationError::NotADirectory(
                canonical.display().to_string(),
            ));
        }

        let canonical = canonical
            .into_os_string()
            .into_string()
            .map_err(|p| ShareValidationError::PathUnresolvable(format!("{:?} is not UTF-8", p)))?;

        // A directory name can smuggle a new section into smb.conf
        if has_control_chars(&canonical) {
            return Err(ShareValidationError::ControlCharacters { field: "Path" });
        }

        Ok(canonical)
    }
}

/// Validate a share and return user-facing messages (empty = valid)
pub fn validate_share(share: &mut ShareRecord, allowed_root: &Path) -> Vec<String> {
    ShareValidator::new(allowed_root)
        .validate(share)
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn check_name(name: &str) -> Option<ShareValidationError> {
    if name.is_empty() {
        return Some(ShareValidationError::MissingName);
    }

    let allowed = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if !allowed || name.starts_with('.') {
        return Some(ShareValidationError::InvalidName(name.to_string()));
    }

    if name.len() > MAX_NAME_LEN {
        return Some(ShareValidationError::NameTooLong(name.len()));
    }

    if RESERVED_NAMES.iter().any(|r| r.eq_ignore_ascii_case(name)) {
        return Some(ShareValidationError::ReservedName(name.to_string()));
    }

    None
}

/// 3 or 4 digits, each 0-7
fn is_octal_mask(value: &str) -> bool {
    (3..=4).contains(&value.len()) && value.bytes().all(|b| (b'0'..=b'7').contains(&b))
}

fn has_control_chars(value: &str) -> bool {
    value.chars().any(char::is_control)
}
