//! Boot store implementations
//!
//! The target keeps one key in an NVS namespace; on a general-purpose OS the
//! same contract is a small JSON map in a file. The map shape is kept so the
//! file stays a namespaced key/value region rather than a bare string.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use camclock_core::{BuildId, CamClockError, CamClockResult};

use crate::BootStore;

/// Key under which the last-synced build id is recorded
const KEY_BUILD: &str = "build";

/// Volatile store for tests and simulation
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            entries: HashMap::new(),
        }
    }
}

impl BootStore for MemoryStore {
    fn last_synced_build(&self) -> CamClockResult<BuildId> {
        Ok(self
            .entries
            .get(KEY_BUILD)
            .map(BuildId::new)
            .unwrap_or_else(BuildId::sentinel))
    }

    fn record_build(&mut self, build: &BuildId) -> CamClockResult<()> {
        self.entries
            .insert(KEY_BUILD.to_string(), build.as_str().to_string());
        Ok(())
    }
}

/// Durable single-file store surviving power loss
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// power cut mid-write leaves the previous record intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> CamClockResult<HashMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| CamClockError::Store(format!("corrupt store file: {e}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(CamClockError::Store(e.to_string())),
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> CamClockResult<()> {
        let text = serde_json::to_string(entries)
            .map_err(|e| CamClockError::Store(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, text).map_err(|e| CamClockError::Store(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| CamClockError::Store(e.to_string()))
    }
}

impl BootStore for FileStore {
    fn last_synced_build(&self) -> CamClockResult<BuildId> {
        Ok(self
            .load()?
            .get(KEY_BUILD)
            .map(BuildId::new)
            .unwrap_or_else(BuildId::sentinel))
    }

    fn record_build(&mut self, build: &BuildId) -> CamClockResult<()> {
        let mut entries = self.load()?;
        entries.insert(KEY_BUILD.to_string(), build.as_str().to_string());
        self.save(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("camclock-store-{}-{tag}.json", std::process::id()))
    }

    #[test]
    fn test_memory_store_defaults_to_sentinel() {
        let store = MemoryStore::new();
        assert_eq!(store.last_synced_build().unwrap(), BuildId::sentinel());
    }

    #[test]
    fn test_memory_store_records_latest() {
        let mut store = MemoryStore::new();
        store.record_build(&BuildId::new("v1")).unwrap();
        store.record_build(&BuildId::new("v2")).unwrap();
        assert_eq!(store.last_synced_build().unwrap(), BuildId::new("v2"));
    }

    #[test]
    fn test_file_store_missing_file_is_sentinel() {
        let path = scratch_path("missing");
        let _ = fs::remove_file(&path);
        let store = FileStore::new(&path);
        assert_eq!(store.last_synced_build().unwrap(), BuildId::sentinel());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = scratch_path("reopen");
        let _ = fs::remove_file(&path);

        let mut store = FileStore::new(&path);
        store.record_build(&BuildId::new("v1")).unwrap();
        drop(store);

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.last_synced_build().unwrap(), BuildId::new("v1"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let path = scratch_path("corrupt");
        fs::write(&path, "not json").unwrap();
        let store = FileStore::new(&path);
        assert!(store.last_synced_build().is_err());
        let _ = fs::remove_file(&path);
    }
}
