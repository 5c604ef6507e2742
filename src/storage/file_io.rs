//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure. Every
//! write goes to a uniquely named temp file in the target's directory and is
//! renamed over the target, so readers only ever see a complete document.

use std::fs::{self, File, Permissions};
use std::io::{self, BufReader, ErrorKind, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::error::SharesError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, SharesError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| SharesError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| SharesError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), SharesError>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let mut bytes = serde_json::to_vec_pretty(data)
        .map_err(|e| SharesError::Storage(format!("Failed to serialize data: {}", e)))?;
    bytes.push(b'\n');

    write_bytes_atomic(path, &bytes)
}

/// Write raw bytes to a file atomically (write to temp, then rename)
///
/// The temp file lives in the same directory as `path`, which keeps the
/// final rename on one filesystem.
pub fn write_bytes_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), SharesError> {
    let path = path.as_ref();

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| {
        SharesError::Storage(format!(
            "Failed to create directory {}: {}",
            parent.display(),
            e
        ))
    })?;

    let mut temp = NamedTempFile::new_in(parent)
        .map_err(|e| SharesError::Storage(format!("Failed to create temp file: {}", e)))?;

    temp.write_all(bytes)
        .map_err(|e| SharesError::Storage(format!("Failed to write data: {}", e)))?;

    temp.flush()
        .map_err(|e| SharesError::Storage(format!("Failed to flush data: {}", e)))?;

    copy_permissions(&temp, path)
        .map_err(|e| SharesError::Storage(format!("Failed to set permissions: {}", e)))?;

    // Sync to disk before rename
    temp.as_file()
        .sync_all()
        .map_err(|e| SharesError::Storage(format!("Failed to sync data: {}", e)))?;

    // The temp file is removed on drop if the rename fails
    temp.persist(path).map_err(|e| {
        SharesError::Storage(format!(
            "Failed to rename temp file onto {}: {}",
            path.display(),
            e.error
        ))
    })?;

    Ok(())
}

/// Give a temp file the permissions of `reference`
///
/// Temp files start out owner-only. When `reference` does not exist the temp
/// file gets the usual mode for a new, world-readable file instead.
pub(crate) fn copy_permissions(temp: &NamedTempFile, reference: &Path) -> io::Result<()> {
    let permissions = match fs::metadata(reference) {
        Ok(meta) => meta.permissions(),
        Err(e) if e.kind() == ErrorKind::NotFound => new_file_permissions(temp)?,
        Err(e) => return Err(e),
    };
    temp.as_file().set_permissions(permissions)
}

#[cfg(unix)]
fn new_file_permissions(_temp: &NamedTempFile) -> io::Result<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions(temp: &NamedTempFile) -> io::Result<Permissions> {
    Ok(temp.as_file().metadata()?.permissions())
}

/// Check if a JSON file exists and is valid
pub fn json_file_valid<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    if !path.exists() {
        return false;
    }

    if let Ok(file) = File::open(path) {
        let reader = BufReader::new(file);
        serde_json::from_reader::<_, serde_json::Value>(reader).is_ok()
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn leftover_files(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let data: TestData = read_json(&path).unwrap();
        assert_eq!(data, TestData::default());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        write_json_atomic(&path, &data).unwrap();
        let loaded: TestData = read_json(&path).unwrap();
        assert_eq!(data, loaded);
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        write_json_atomic(&path, &TestData::default()).unwrap();
        write_json_atomic(&path, &TestData::default()).unwrap();

        assert_eq!(leftover_files(temp_dir.path()), vec!["test.json".to_string()]);
    }

    #[test]
    fn test_write_bytes_replaces_content_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.json");
        fs::write(&path, "old contents that are longer than the new ones").unwrap();

        write_bytes_atomic(&path, b"[ ]").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"[ ]");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shares.json");
        fs::write(&path, "[]").unwrap();
        fs::set_permissions(&path, Permissions::from_mode(0o640)).unwrap();

        write_bytes_atomic(&path, b"[ ]").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shares.json");

        write_json_atomic(&path, &TestData::default()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("test.json");

        write_json_atomic(&path, &TestData::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_read_corrupt_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("corrupt.json");
        fs::write(&path, "not json at all").unwrap();

        let err = read_json::<TestData, _>(&path).unwrap_err();
        assert!(matches!(err, SharesError::Storage(_)));
    }

    #[test]
    fn test_json_file_valid() {
        let temp_dir = TempDir::new().unwrap();
        let valid_path = temp_dir.path().join("valid.json");
        let invalid_path = temp_dir.path().join("invalid.json");
        let nonexistent_path = temp_dir.path().join("nonexistent.json");

        fs::write(&valid_path, r#"[{"name": "test"}]"#).unwrap();
        assert!(json_file_valid(&valid_path));

        fs::write(&invalid_path, "not json at all").unwrap();
        assert!(!json_file_valid(&invalid_path));

        assert!(!json_file_valid(&nonexistent_path));
    }
}
