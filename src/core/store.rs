//! Note store
//!
//! One JSON document mapping video id to `NoteRecord`, shared by every
//! surface. All operations are asynchronous; file writes run on the blocking
//! pool. Writers race under last-write-wins semantics: the model assumes a
//! single interactive user per profile, so no locking is attempted.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::core::error::{NotesError, NotesResult};
use crate::state::NoteRecord;

/// Shared handle to the note store. Cheap to clone.
#[derive(Clone)]
pub struct NoteStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    /// Backing file; `None` keeps the store purely in memory (tests)
    path: Option<PathBuf>,
    records: Mutex<HashMap<String, NoteRecord>>,
    /// Bumped after every committed write; drives surface auto-refresh
    version: watch::Sender<u64>,
}

impl PartialEq for NoteStore {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl NoteStore {
    /// Create a store with no backing file
    pub fn in_memory() -> Self {
        Self::with_state(None, HashMap::new())
    }

    /// Open (or create) a store backed by the JSON document at `path`
    pub async fn open(path: impl Into<PathBuf>) -> NotesResult<Self> {
        let path = path.into();
        let read_path = path.clone();
        let records = tokio::task::spawn_blocking(move || load_records(&read_path))
            .await
            .map_err(|err| NotesError::Storage(err.to_string()))??;
        debug!(records = records.len(), path = %path.display(), "note store opened");
        Ok(Self::with_state(Some(path), records))
    }

    fn with_state(path: Option<PathBuf>, records: HashMap<String, NoteRecord>) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            inner: Arc::new(StoreInner {
                path,
                records: Mutex::new(records),
                version,
            }),
        }
    }

    /// Look up the record for one video
    pub async fn get(&self, key: &str) -> NotesResult<Option<NoteRecord>> {
        let records = self.inner.records.lock().await;
        Ok(records.get(key).cloned())
    }

    /// Snapshot of every stored record
    pub async fn get_all(&self) -> NotesResult<HashMap<String, NoteRecord>> {
        let records = self.inner.records.lock().await;
        Ok(records.clone())
    }

    /// Insert or replace the record for one video (last write wins)
    pub async fn set(&self, key: &str, record: NoteRecord) -> NotesResult<()> {
        let snapshot = {
            let mut records = self.inner.records.lock().await;
            records.insert(key.to_string(), record);
            records.clone()
        };
        self.persist(snapshot).await?;
        self.bump();
        Ok(())
    }

    /// Remove a video's record entirely
    pub async fn remove(&self, key: &str) -> NotesResult<()> {
        let snapshot = {
            let mut records = self.inner.records.lock().await;
            records.remove(key);
            records.clone()
        };
        self.persist(snapshot).await?;
        self.bump();
        Ok(())
    }

    /// Subscribe to store changes. The received value is an opaque version
    /// counter; any change means "re-read what you need".
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.version.subscribe()
    }

    fn bump(&self) {
        self.inner.version.send_modify(|v| *v += 1);
    }

    async fn persist(&self, snapshot: HashMap<String, NoteRecord>) -> NotesResult<()> {
        let Some(path) = self.inner.path.clone() else {
            return Ok(());
        };
        tokio::task::spawn_blocking(move || write_records(&path, &snapshot))
            .await
            .map_err(|err| NotesError::Storage(err.to_string()))?
    }
}

fn load_records(path: &std::path::Path) -> NotesResult<HashMap<String, NoteRecord>> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(err) => return Err(err.into()),
    };
    match serde_json::from_str(&json) {
        Ok(records) => Ok(records),
        Err(err) => {
            // A corrupt store must not brick the app; start empty and leave
            // the broken file untouched until the first write.
            warn!(path = %path.display(), error = %err, "note store unreadable, starting empty");
            Ok(HashMap::new())
        }
    }
}

fn write_records(path: &std::path::Path, records: &HashMap<String, NoteRecord>) -> NotesResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Note;

    fn record(title: &str, times: &[f64]) -> NoteRecord {
        NoteRecord {
            title: title.to_string(),
            notes: times
                .iter()
                .map(|&time| Note {
                    time,
                    text: format!("note at {time}"),
                    timestamp_text: String::new(),
                    created_at: 0,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = NoteStore::in_memory();
        assert!(store.get("abc").await.unwrap().is_none());

        store.set("abc", record("T", &[42.0])).await.unwrap();
        let loaded = store.get("abc").await.unwrap().unwrap();
        assert_eq!(loaded.title, "T");
        assert_eq!(loaded.notes.len(), 1);

        store.remove("abc").await.unwrap();
        assert!(store.get("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_all_snapshots_every_record() {
        let store = NoteStore::in_memory();
        store.set("a", record("A", &[1.0])).await.unwrap();
        store.set("b", record("B", &[2.0, 3.0])).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all["b"].notes.len(), 2);
    }

    #[tokio::test]
    async fn test_subscribe_bumps_on_every_write() {
        let store = NoteStore::in_memory();
        let rx = store.subscribe();
        let before = *rx.borrow();

        store.set("a", record("A", &[1.0])).await.unwrap();
        store.remove("a").await.unwrap();

        assert_eq!(*rx.borrow(), before + 2);
    }

    #[tokio::test]
    async fn test_disk_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");

        let store = NoteStore::open(&path).await.unwrap();
        store.set("abc", record("T", &[42.0])).await.unwrap();
        drop(store);

        let reopened = NoteStore::open(&path).await.unwrap();
        let loaded = reopened.get("abc").await.unwrap().unwrap();
        assert_eq!(loaded.title, "T");
        assert_eq!(loaded.notes[0].time, 42.0);
    }

    #[tokio::test]
    async fn test_open_tolerates_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");
        fs::write(&path, "{not json").unwrap();

        let store = NoteStore::open(&path).await.unwrap();
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_tolerates_legacy_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");
        fs::write(&path, r#"{"abc": {"title": "Old"}}"#).unwrap();

        let store = NoteStore::open(&path).await.unwrap();
        let loaded = store.get("abc").await.unwrap().unwrap();
        assert_eq!(loaded.title, "Old");
        assert!(loaded.notes.is_empty());
    }
}
