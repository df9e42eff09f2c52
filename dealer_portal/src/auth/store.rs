//! Durable storage for the single session token.

use super::errors::{StoreError, StoreResult};
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

/// Default file name of the stored token.
pub const TOKEN_FILE_NAME: &str = "auth_token";

/// A single slot holding an opaque bearer token.
///
/// The token is trusted until the remote service rejects it; there is no
/// expiry logic here.
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any.
    fn get(&self) -> StoreResult<Option<String>>;

    /// Replace the stored token.
    fn set(&self, token: &str) -> StoreResult<()>;

    /// Remove the stored token. Clearing an empty store succeeds.
    fn clear(&self) -> StoreResult<()>;
}

/// Token store backed by one file on disk.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the token as [`TOKEN_FILE_NAME`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(TOKEN_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> StoreResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn set(&self, token: &str) -> StoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, token).map_err(|e| self.io_error(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_error(e))?;
        }

        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// In-process token store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> StoreResult<Option<String>> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn set(&self, token: &str) -> StoreResult<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::in_dir(dir.path());
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_file_store_set_get_clear() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::in_dir(dir.path().join("nested"));

        store.set("t1").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("t1"));

        store.set("t2").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("t2"));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::in_dir(dir.path());
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_blank_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::in_dir(dir.path());
        fs::write(store.path(), "  \n").unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_new_instance() {
        let dir = TempDir::new().unwrap();
        FileTokenStore::in_dir(dir.path()).set("persisted").unwrap();

        let reopened = FileTokenStore::in_dir(dir.path());
        assert_eq!(reopened.get().unwrap().as_deref(), Some("persisted"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::in_dir(dir.path());
        store.set("secret").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_file_store_unreadable_path_errors() {
        let dir = TempDir::new().unwrap();
        // A directory where the token file should be
        let store = FileTokenStore::new(dir.path());
        assert!(matches!(store.get(), Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get().unwrap(), None);

        store.set("t1").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("t1"));

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);

        let seeded = MemoryTokenStore::with_token("t9");
        assert_eq!(seeded.get().unwrap().as_deref(), Some("t9"));
    }
}
