use std::fs;
use std::io;
use std::path::PathBuf;

use ax_core::ports::{SecureStorageError, SecureStoragePort};

/// File-based secure storage for development or headless environments.
///
/// 基于文件的安全存储（开发/无桌面环境回退）。
///
/// Values land as 0o600 files under a dedicated vault directory; writes go
/// through a temp file + rename so a crash never leaves a half-written
/// secret behind.
#[derive(Clone)]
pub struct FileSecureStorage {
    base_dir: PathBuf,
}

impl FileSecureStorage {
    /// Create file secure storage rooted at `<app_data_root>/vault`.
    ///
    /// 在 `<app_data_root>/vault` 下创建文件安全存储。
    pub fn new_in_app_data_root(app_data_root: PathBuf) -> Result<Self, io::Error> {
        let base_dir = app_data_root.join("vault");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Construct with a concrete base directory.
    ///
    /// 使用指定目录创建实例。
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.bin"))
    }

    fn map_io_error(context: &str, err: io::Error) -> SecureStorageError {
        SecureStorageError::Other(format!("{context}: {err}"))
    }
}

impl SecureStoragePort for FileSecureStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SecureStorageError> {
        let path = self.file_path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::map_io_error("failed to read vault file", err)),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), SecureStorageError> {
        let path = self.file_path(key);
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value)
            .map_err(|err| Self::map_io_error("failed to write vault temp file", err))?;
        fs::rename(&temp_path, &path)
            .map_err(|err| Self::map_io_error("failed to rename vault file", err))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)
                .map_err(|err| Self::map_io_error("failed to read vault metadata", err))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)
                .map_err(|err| Self::map_io_error("failed to set vault permissions", err))?;
        }

        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), SecureStorageError> {
        let path = self.file_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::map_io_error("failed to delete vault file", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_stores_and_loads() {
        let temp_dir = tempfile::TempDir::new().expect("temp dir");
        let storage = FileSecureStorage::with_base_dir(temp_dir.path().to_path_buf());
        storage.set("auth:access_token", b"bearer").expect("set");
        let loaded = storage.get("auth:access_token").expect("get");
        assert_eq!(loaded, Some(b"bearer".to_vec()));
    }

    #[test]
    fn missing_key_returns_none() {
        let temp_dir = tempfile::TempDir::new().expect("temp dir");
        let storage = FileSecureStorage::with_base_dir(temp_dir.path().to_path_buf());
        let loaded = storage.get("auth:refresh_token").expect("get");
        assert!(loaded.is_none());
    }

    #[test]
    fn delete_is_idempotent() {
        let temp_dir = tempfile::TempDir::new().expect("temp dir");
        let storage = FileSecureStorage::with_base_dir(temp_dir.path().to_path_buf());
        storage.set("auth:access_token", b"bearer").expect("set");
        storage.delete("auth:access_token").expect("first delete");
        storage.delete("auth:access_token").expect("second delete");
        assert!(storage.get("auth:access_token").expect("get").is_none());
    }

    #[test]
    fn values_survive_a_new_instance_on_the_same_dir() {
        let temp_dir = tempfile::TempDir::new().expect("temp dir");
        let storage = FileSecureStorage::with_base_dir(temp_dir.path().to_path_buf());
        storage.set("auth:biometric_enabled", b"true").expect("set");

        let reopened = FileSecureStorage::with_base_dir(temp_dir.path().to_path_buf());
        assert_eq!(
            reopened.get("auth:biometric_enabled").expect("get"),
            Some(b"true".to_vec())
        );
    }

    #[cfg(unix)]
    #[test]
    fn written_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::TempDir::new().expect("temp dir");
        let storage = FileSecureStorage::with_base_dir(temp_dir.path().to_path_buf());
        storage.set("auth:access_token", b"bearer").expect("set");

        let mode = std::fs::metadata(temp_dir.path().join("auth:access_token.bin"))
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
