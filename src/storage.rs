//! Durable slot holding the whole serialized entry map.

use crate::errors::StoreError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Namespace key of the single storage slot.
pub const NAMESPACE_KEY: &str = "chic_daily_logs_2026";

/// One key-value slot. `read` returns `None` when nothing was ever written.
pub trait StorageBackend {
    fn read(&self) -> Result<Option<Vec<u8>>, StoreError>;
    fn write(&mut self, bytes: &[u8]) -> Result<(), StoreError>;
}

/// The slot as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileStorage {
    fn read(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a sibling temp file, syncs it, then renames it over the slot.
    fn write(&mut self, bytes: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let written =
            write_synced(&tmp_path, bytes).and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[derive(Debug, Default)]
struct MemorySlot {
    data: Option<Vec<u8>>,
    writes: usize,
    fail_writes: bool,
}

/// In-memory slot. Clones share the same slot, so a test can keep a handle
/// after moving the backend into a store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<MemorySlot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        let storage = Self::default();
        storage.lock().data = Some(bytes.into());
        storage
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        self.lock().data.clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Makes every following write fail until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemorySlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.lock().data.clone())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), StoreError> {
        let mut slot = self.lock();
        if slot.fail_writes {
            return Err(StoreError::Unavailable("write rejected".to_string()));
        }
        slot.data = Some(bytes.to_vec());
        slot.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_reads_as_empty_slot() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("absent.json"));
        assert!(storage.read().unwrap().is_none());
    }

    #[test]
    fn file_write_creates_parents_and_replaces_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(format!("{NAMESPACE_KEY}.json"));
        let mut storage = FileStorage::new(&path);

        storage.write(b"{\"a\":1}").unwrap();
        storage.write(b"{\"b\":2}").unwrap();

        assert_eq!(storage.read().unwrap().unwrap(), b"{\"b\":2}");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn failed_rename_cleans_up_the_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(format!("{NAMESPACE_KEY}.json"));
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupied"), b"x").unwrap();
        let mut storage = FileStorage::new(&path);

        assert!(storage.write(b"{\"a\":1}").is_err());
        assert!(!path.with_extension("json.tmp").exists());
        assert!(path.join("occupied").exists());
    }

    #[test]
    fn memory_clones_share_one_slot() {
        let handle = MemoryStorage::new();
        let mut backend = handle.clone();
        backend.write(b"x").unwrap();
        assert_eq!(handle.contents().unwrap(), b"x");
        assert_eq!(handle.write_count(), 1);
    }

    #[test]
    fn memory_write_failure_keeps_previous_contents() {
        let mut storage = MemoryStorage::with_contents("old");
        storage.set_fail_writes(true);
        assert!(storage.write(b"new").is_err());
        assert_eq!(storage.contents().unwrap(), b"old");
        assert_eq!(storage.write_count(), 0);
    }
}
