//! Named save slots for the exploration record.
//!
//! A slot stores one [`ExplorationSave`] (both masks) under a name. The
//! manager only needs "save under slot" and "load from slot"; the layout
//! inside a slot belongs to the backend.
//!
//! - [`FileSaveSlots`] writes one JSON file per slot into a directory.
//!   Writes go to a temporary file first and are renamed into place, so a
//!   slot is never left half-written.
//! - [`MemorySaveSlots`] keeps slots in memory and counts writes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use compass_types::ExplorationSave;
use tracing::debug;

/// Errors that can occur while reading or writing a save slot.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Reading or writing the slot file failed.
    #[error("save slot I/O error at {path}: {source}")]
    Io {
        /// The slot file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The slot content could not be encoded or decoded.
    #[error("save slot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Nothing has been saved under this slot.
    #[error("save slot not found: {0}")]
    SlotNotFound(String),

    /// The in-memory backend's lock was poisoned.
    #[error("save slot backend unavailable: {0}")]
    Unavailable(String),
}

/// Storage for exploration records keyed by slot name.
pub trait SaveSlots: Send {
    /// Store `record` under `slot`, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the record could not be stored.
    fn save(&mut self, slot: &str, record: &ExplorationSave) -> Result<(), PersistenceError>;

    /// Load the record stored under `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::SlotNotFound`] when the slot is empty,
    /// or another [`PersistenceError`] if it could not be read.
    fn load(&self, slot: &str) -> Result<ExplorationSave, PersistenceError>;
}

// ---------------------------------------------------------------------------
// File backend
// ---------------------------------------------------------------------------

/// Save slots stored as `<directory>/<slot>.json`.
#[derive(Debug, Clone)]
pub struct FileSaveSlots {
    directory: PathBuf,
}

impl FileSaveSlots {
    /// Slots rooted at `directory`. The directory is created on first save.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The directory holding the slot files.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file backing `slot`.
    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.directory.join(format!("{slot}.json"))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl SaveSlots for FileSaveSlots {
    fn save(&mut self, slot: &str, record: &ExplorationSave) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.directory).map_err(|e| io_error(&self.directory, e))?;

        let path = self.slot_path(slot);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec(record)?;
        std::fs::write(&tmp, &bytes).map_err(|e| io_error(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))?;

        debug!(path = %path.display(), bytes = bytes.len(), "Save slot written");
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<ExplorationSave, PersistenceError> {
        let path = self.slot_path(slot);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PersistenceError::SlotNotFound(slot.to_owned()));
            }
            Err(e) => return Err(io_error(&path, e)),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryInner {
    slots: BTreeMap<String, ExplorationSave>,
    writes: u64,
}

/// Save slots held in memory.
///
/// Clones share storage, so a caller can hand one clone to the manager and
/// inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySaveSlots {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemorySaveSlots {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many saves have been performed across all slots.
    pub fn write_count(&self) -> u64 {
        self.inner.lock().map(|inner| inner.writes).unwrap_or(0)
    }

    /// Store a record directly, without counting it as a write.
    pub fn insert(&self, slot: &str, record: ExplorationSave) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.slots.insert(slot.to_owned(), record);
        }
    }
}

impl SaveSlots for MemorySaveSlots {
    fn save(&mut self, slot: &str, record: &ExplorationSave) -> Result<(), PersistenceError> {
        let mut inner = self.inner.lock().map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        inner.slots.insert(slot.to_owned(), record.clone());
        inner.writes = inner.writes.saturating_add(1);
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<ExplorationSave, PersistenceError> {
        let inner = self.inner.lock().map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        inner
            .slots
            .get(slot)
            .cloned()
            .ok_or_else(|| PersistenceError::SlotNotFound(slot.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ExplorationSave {
        ExplorationSave {
            reveal_mask: vec![255, 0, 0],
            land_mask: vec![1, 1, 0],
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("compass-slots-{}-{name}", std::process::id()))
    }

    #[test]
    fn memory_slots_round_trip_and_count_writes() {
        let slots = MemorySaveSlots::new();
        let mut handle = slots.clone();
        assert!(handle.save("a", &record()).is_ok());
        assert!(handle.save("a", &record()).is_ok());
        assert_eq!(slots.write_count(), 2);
        assert_eq!(slots.load("a").ok(), Some(record()));
    }

    #[test]
    fn missing_slot_is_not_found() {
        let slots = MemorySaveSlots::new();
        assert!(matches!(slots.load("nope"), Err(PersistenceError::SlotNotFound(_))));

        let files = FileSaveSlots::new(temp_dir("missing"));
        assert!(matches!(files.load("nope"), Err(PersistenceError::SlotNotFound(_))));
    }

    #[test]
    fn file_slots_round_trip() {
        let dir = temp_dir("round-trip");
        let mut slots = FileSaveSlots::new(&dir);
        assert!(slots.save("FC_Test", &record()).is_ok());
        assert!(slots.slot_path("FC_Test").exists());
        assert_eq!(slots.load("FC_Test").ok(), Some(record()));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_slot_is_serialization_error() {
        let dir = temp_dir("corrupt");
        let slots = FileSaveSlots::new(&dir);
        assert!(std::fs::create_dir_all(&dir).is_ok());
        assert!(std::fs::write(slots.slot_path("bad"), b"not json").is_ok());
        assert!(matches!(slots.load("bad"), Err(PersistenceError::Serialization(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
