use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Error type for key-value storage
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
}

/// Byte-oriented key-value storage: the local-storage primitive the
/// persistence layer sits on.
pub trait KeyValueStore {
    /// Read a key. `Ok(None)` means the key was never written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    /// Write a key, replacing any previous value.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// Directory-backed store
// ---------------------------------------------------------------------------

/// One file per key, `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(dir).map_err(|e| StorageError::WriteError {
            path: dir.to_path_buf(),
            source: e,
        })?;
        Ok(DirStore {
            dir: dir.to_path_buf(),
        })
    }

    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.key_path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadError { path, source: e }),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let path = self.key_path(key);
        atomic_write(&path, value).map_err(|e| StorageError::WriteError { path, source: e })
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Map-backed store for tests and throwaway sessions. Can be switched into a
/// failing mode to exercise the unavailable-storage path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Seed a raw value, bypassing any failure mode.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.as_bytes().to_vec());
        self
    }

    /// Make every subsequent get/set fail.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|v| std::str::from_utf8(v).ok())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable(format!("get {}", key)));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable(format!("set {}", key)));
        }
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
