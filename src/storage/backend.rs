//! Byte-blob persistence behind a fixed key.
//!
//! The reminder store only needs `get` and `set` on a single key. The
//! [`FileBackend`] keeps each key in its own JSON file; the
//! [`MemoryBackend`] keeps everything in a map and can be told to refuse
//! writes.
//!
//! Several processes may share one [`FileBackend`] root. A read-modify-write
//! cycle holds [`KeyValueStore::lock`] for its whole duration.

use std::{
    collections::HashMap,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use fs4::fs_std::FileExt;

/// A synchronous key-value store of byte strings.
pub trait KeyValueStore {
    /// Reads the blob stored under `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is present but cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError>;

    /// Replaces the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob could not be written.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), BackendError>;

    /// Blocks until no other handle holds the lock on `key`, then holds it
    /// until the returned [`KeyLock`] is dropped.
    ///
    /// Backends that are never shared keep the default, which does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock could not be taken.
    fn lock(&self, _key: &str) -> Result<KeyLock, BackendError> {
        Ok(KeyLock::unlocked())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), BackendError> {
        (**self).set(key, value)
    }

    fn lock(&self, key: &str) -> Result<KeyLock, BackendError> {
        (**self).lock(key)
    }
}

/// An exclusive lock on one key, released on drop.
#[derive(Debug)]
pub struct KeyLock {
    file: Option<File>,
}

impl KeyLock {
    /// A lock that excludes nothing.
    #[must_use]
    pub const fn unlocked() -> Self {
        Self { file: None }
    }

    /// Whether this lock is backed by an operating-system file lock.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.file.is_some()
    }
}

/// Failures of a [`KeyValueStore`].
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Reading the stored blob failed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// Writing the blob failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The lock file could not be opened or locked.
    #[error("failed to lock {}: {source}", path.display())]
    Lock {
        /// The lock file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Stores each key as `<root>/<key>.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at the given directory.
    ///
    /// The directory is created on first write.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The directory blobs are stored in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file a key is stored in.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// The file whose lock guards a key.
    ///
    /// The data file itself is replaced on every write, so it cannot carry
    /// the lock.
    #[must_use]
    pub fn lock_path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!(".{key}.lock"))
    }
}

impl KeyValueStore for FileBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(BackendError::Read { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), BackendError> {
        let path = self.path_for(key);
        let write_error = |source| BackendError::Write {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.root).map_err(write_error)?;

        // Write beside the target and rename over it so a crash mid-write
        // leaves the previous blob intact.
        let staging = self.root.join(format!(".{key}.json.tmp"));
        fs::write(&staging, value).map_err(write_error)?;
        fs::rename(&staging, &path).map_err(write_error)?;

        tracing::trace!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn lock(&self, key: &str) -> Result<KeyLock, BackendError> {
        let path = self.lock_path_for(key);
        let lock_error = |source| BackendError::Lock {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.root).map_err(lock_error)?;
        let file = File::options()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(lock_error)?;
        FileExt::lock_exclusive(&file).map_err(lock_error)?;

        tracing::trace!("Locked {}", path.display());
        Ok(KeyLock { file: Some(file) })
    }
}

/// Keeps blobs in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    blobs: HashMap<String, Vec<u8>>,
    read_only: bool,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the backend with a blob.
    #[must_use]
    pub fn with_blob(mut self, key: &str, value: impl Into<Vec<u8>>) -> Self {
        self.blobs.insert(key.to_string(), value.into());
        self
    }

    /// Makes every subsequent write fail, as a full or revoked storage quota
    /// would.
    pub const fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Returns the blob stored under `key`.
    #[must_use]
    pub fn blob(&self, key: &str) -> Option<&[u8]> {
        self.blobs.get(key).map(Vec::as_slice)
    }
}

impl KeyValueStore for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), BackendError> {
        if self.read_only {
            return Err(BackendError::Unavailable(format!("'{key}' is read-only")));
        }
        self.blobs.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_reads_as_absent() {
        let tmp = TempDir::new().unwrap();
        let backend = FileBackend::new(tmp.path().to_path_buf());

        assert!(backend.get("reminders").unwrap().is_none());
    }

    #[test]
    fn file_backend_round_trips_blob() {
        let tmp = TempDir::new().unwrap();
        let mut backend = FileBackend::new(tmp.path().join("nested"));

        backend.set("reminders", b"[]").unwrap();
        backend.set("reminders", b"[1]").unwrap();

        assert_eq!(
            backend.get("reminders").unwrap().as_deref(),
            Some(&b"[1]"[..])
        );
        assert!(backend.path_for("reminders").exists());
        assert!(!tmp.path().join("nested/.reminders.json.tmp").exists());
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let backend = FileBackend::new(tmp.path().to_path_buf());
        fs::create_dir(backend.path_for("reminders")).unwrap();

        assert!(matches!(
            backend.get("reminders"),
            Err(BackendError::Read { .. })
        ));
    }

    #[test]
    fn file_lock_lives_beside_the_blob() {
        let tmp = TempDir::new().unwrap();
        let backend = FileBackend::new(tmp.path().join("nested"));

        let lock = backend.lock("reminders").unwrap();
        assert!(lock.is_held());
        assert!(backend.lock_path_for("reminders").exists());
        drop(lock);

        // Released on drop, so it can be taken again.
        assert!(backend.lock("reminders").unwrap().is_held());
        assert!(backend.get("reminders").unwrap().is_none());
    }

    #[test]
    fn memory_backend_lock_is_a_no_op() {
        let backend = MemoryBackend::new();
        assert!(!backend.lock("reminders").unwrap().is_held());
    }

    #[test]
    fn read_only_memory_backend_refuses_writes() {
        let mut backend = MemoryBackend::new().with_blob("reminders", "[]");
        backend.set_read_only(true);

        assert!(matches!(
            backend.set("reminders", b"[1]"),
            Err(BackendError::Unavailable(_))
        ));
        assert_eq!(backend.blob("reminders"), Some(&b"[]"[..]));
    }
}
