use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::{fs, io};

use serde::de::DeserializeOwned;
use serde::Serialize;

use travelmate_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Stored document is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// String-keyed JSON blob store, the persistence collaborator every
/// planner component reads and writes through. Synchronous get/set with
/// last-writer-wins semantics; no transactions, no cross-writer
/// coordination.
pub trait KvStore: Send + Sync {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_raw(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
    fn keys(&self) -> StoreResult<Vec<String>>;
    fn clear(&self) -> StoreResult<()>;
}

/// Typed serde helpers over the raw string surface.
pub trait KvStoreExt: KvStore {
    fn get<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.get_raw(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        self.set_raw(key, &serde_json::to_string(value)?)
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}

/// In-memory store, the test double and default backing.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.lock().expect("store poisoned").get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .lock()
            .expect("store poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.lock().expect("store poisoned").remove(key);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .expect("store poisoned")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn clear(&self) -> StoreResult<()> {
        self.entries.lock().expect("store poisoned").clear();
        Ok(())
    }
}

/// Store persisted as a single JSON object document on disk, read once on
/// open and written through on every mutation.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => {
                let doc: BTreeMap<String, serde_json::Value> = serde_json::from_str(&raw)?;
                doc.into_iter()
                    .map(|(key, value)| Ok((key, serde_json::to_string(&value)?)))
                    .collect::<Result<_, serde_json::Error>>()?
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> StoreResult<()> {
        let doc: BTreeMap<&String, serde_json::Value> = entries
            .iter()
            .map(|(key, value)| Ok((key, serde_json::from_str(value)?)))
            .collect::<Result<_, serde_json::Error>>()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&doc)?)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.lock().expect("store poisoned").get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        // Round-trip through Value so an unparseable blob never lands in
        // the document.
        let _: serde_json::Value = serde_json::from_str(value)?;
        let mut entries = self.entries.lock().expect("store poisoned");
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().expect("store poisoned");
        entries.remove(key);
        self.persist(&entries)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .expect("store poisoned")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn clear(&self) -> StoreResult<()> {
        let mut entries = self.entries.lock().expect("store poisoned");
        entries.clear();
        self.persist(&entries)
    }
}
