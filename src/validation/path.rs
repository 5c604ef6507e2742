//! Share path resolution
//!
//! Resolves a user-supplied path to its canonical form and confirms that it
//! lies beneath the allowed root. The containment check only ever looks at
//! the canonical path, so a symlink cannot redirect a share outside the
//! sanctioned mount tree.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{SharesError, SharesResult};

/// Resolve `raw` to a canonical path strictly beneath `allowed_root`
///
/// Fails with [`SharesError::PathNotFound`] if the path or any component is
/// missing and with [`SharesError::PathEscape`] if the resolved path is not
/// inside the root. The root itself is not an acceptable share path.
pub fn resolve_path(raw: &str, allowed_root: &Path) -> SharesResult<PathBuf> {
    let canonical = fs::canonicalize(raw).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SharesError::PathNotFound(raw.to_string()),
        _ => SharesError::Io(format!("Failed to resolve {}: {}", raw, e)),
    })?;

    // The root may itself sit behind a symlink
    let root = fs::canonicalize(allowed_root).unwrap_or_else(|_| allowed_root.to_path_buf());

    if canonical == root || !canonical.starts_with(&root) {
        warn!(
            raw,
            resolved = %canonical.display(),
            root = %root.display(),
            "share path escapes allowed root"
        );
        return Err(SharesError::PathEscape {
            path: canonical,
            root,
        });
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_root() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("mnt");
        fs::create_dir_all(root.join("user").join("media")).unwrap();
        (temp_dir, root)
    }

    #[test]
    fn test_resolves_existing_directory() {
        let (_temp, root) = create_root();
        let raw = root.join("user").join("media");

        let resolved = resolve_path(raw.to_str().unwrap(), &root).unwrap();
        assert_eq!(resolved, fs::canonicalize(&raw).unwrap());
    }

    #[test]
    fn test_resolves_relative_segments() {
        let (_temp, root) = create_root();
        let raw = format!("{}/user/../user/./media", root.display());

        let resolved = resolve_path(&raw, &root).unwrap();
        assert!(resolved.ends_with("user/media"));
        assert!(!resolved.to_string_lossy().contains(".."));
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let (_temp, root) = create_root();
        let raw = root.join("user").join("missing");

        let err = resolve_path(raw.to_str().unwrap(), &root).unwrap_err();
        assert!(matches!(err, SharesError::PathNotFound(_)));
    }

    #[test]
    fn test_dot_dot_escape_is_rejected() {
        let (_temp, root) = create_root();
        let raw = format!("{}/user/../..", root.display());

        let err = resolve_path(&raw, &root).unwrap_err();
        assert!(err.is_security());
    }

    #[test]
    fn test_root_itself_is_rejected() {
        let (_temp, root) = create_root();

        let err = resolve_path(root.to_str().unwrap(), &root).unwrap_err();
        assert!(err.is_security());
    }

    #[test]
    fn test_sibling_with_common_prefix_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("mnt");
        let sibling = temp_dir.path().join("mnt2").join("data");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&sibling).unwrap();

        let err = resolve_path(sibling.to_str().unwrap(), &root).unwrap_err();
        assert!(err.is_security());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_outside_root_is_rejected() {
        let (temp, root) = create_root();
        let outside = temp.path().join("outside");
        fs::create_dir_all(&outside).unwrap();
        let link = root.join("user").join("evil");
        std::os::unix::fs::symlink(&outside, &link).unwrap();

        let err = resolve_path(link.to_str().unwrap(), &root).unwrap_err();
        match err {
            SharesError::PathEscape { path, .. } => {
                assert_eq!(path, fs::canonicalize(&outside).unwrap())
            }
            other => panic!("expected PathEscape, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_root_behind_symlink() {
        let (temp, root) = create_root();
        let alias = temp.path().join("alias");
        std::os::unix::fs::symlink(&root, &alias).unwrap();

        let resolved = resolve_path(root.join("user").to_str().unwrap(), &alias).unwrap();
        assert_eq!(resolved, fs::canonicalize(root.join("user")).unwrap());
    }
}
