//! Same-origin key-value storage.
//!
//! [`KeyValueStorage`] is the only persistence seam of the store. Two backends
//! are provided: [`MemoryStorage`], a tab handle onto an in-process
//! [`MemoryOrigin`] shared by several simulated tabs, and [`FileStorage`], a
//! directory with one file per key.

use std::collections::{BTreeMap, HashMap};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use tempfile::NamedTempFile;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::channel::Posted;
use crate::error::StorageError;

pub type StorageResult<T> = std::result::Result<T, StorageError>;

const EVENT_CAPACITY: usize = 256;

/// Identifies one browsing context (tab) of an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(pub u64);

/// A write made by some tab. `key` is `None` when storage was cleared or
/// events were dropped, so any cached value may be stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: Option<String>,
    pub source: TabId,
}

/// Key-value storage shared by every tab of an origin.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Writes made by other tabs, or `None` when the backend cannot observe them.
    fn storage_events(&self) -> Option<StorageEvents> {
        None
    }
}

/// Receiver of [`StorageEvent`]s that skips the listening tab's own writes.
pub struct StorageEvents {
    receiver: broadcast::Receiver<StorageEvent>,
    tab: TabId,
}

impl StorageEvents {
    /// Wait for the next foreign write. Returns `None` once the origin is gone.
    pub async fn next(&mut self) -> Option<StorageEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.source == self.tab => continue,
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(_)) => {
                    return Some(StorageEvent {
                        key: None,
                        source: self.tab,
                    });
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

/// In-process origin: one item map, one storage-event bus, and the named
/// change channels its tabs open.
#[derive(Clone)]
pub struct MemoryOrigin {
    inner: Arc<OriginInner>,
}

struct OriginInner {
    items: RwLock<BTreeMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
    channels: Mutex<HashMap<String, broadcast::Sender<Posted>>>,
    next_tab: AtomicU64,
    quota: Option<usize>,
}

impl Default for MemoryOrigin {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryOrigin {
    /// Create an origin without a storage quota.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create an origin whose keys and values may not exceed `bytes` in total.
    pub fn with_quota(bytes: usize) -> Self {
        Self::build(Some(bytes))
    }

    fn build(quota: Option<usize>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(OriginInner {
                items: RwLock::new(BTreeMap::new()),
                events,
                channels: Mutex::new(HashMap::new()),
                next_tab: AtomicU64::new(1),
                quota,
            }),
        }
    }

    /// Open a new tab onto this origin.
    pub fn open_tab(&self) -> MemoryStorage {
        let id = self.inner.next_tab.fetch_add(1, Ordering::Relaxed);
        MemoryStorage {
            origin: self.clone(),
            tab: TabId(id),
        }
    }

    /// Copy of every stored item.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.inner.items.read().clone()
    }

    /// Sender of the named change channel, created on first use.
    pub(crate) fn channel_sender(&self, name: &str) -> broadcast::Sender<Posted> {
        self.inner
            .channels
            .lock()
            .entry(name.to_string())
            .or_insert_with(|| broadcast::channel(EVENT_CAPACITY).0)
            .clone()
    }

    fn notify(&self, key: &str, source: TabId) {
        // No receivers simply means no other tab is listening.
        let _ = self.inner.events.send(StorageEvent {
            key: Some(key.to_string()),
            source,
        });
    }
}

/// One tab's handle onto a [`MemoryOrigin`].
#[derive(Clone)]
pub struct MemoryStorage {
    origin: MemoryOrigin,
    tab: TabId,
}

impl MemoryStorage {
    pub fn tab(&self) -> TabId {
        self.tab
    }

    pub fn origin(&self) -> &MemoryOrigin {
        &self.origin
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.origin.inner.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        {
            let mut items = self.origin.inner.items.write();
            if let Some(quota) = self.origin.inner.quota {
                let used: usize = items
                    .iter()
                    .filter(|(existing, _)| existing.as_str() != key)
                    .map(|(k, v)| k.len() + v.len())
                    .sum();
                let needed = used + key.len() + value.len();
                if needed > quota {
                    return Err(StorageError::QuotaExceeded {
                        key: key.to_string(),
                        needed,
                        quota,
                    });
                }
            }
            items.insert(key.to_string(), value.to_string());
        }
        self.origin.notify(key, self.tab);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let removed = self.origin.inner.items.write().remove(key).is_some();
        if removed {
            self.origin.notify(key, self.tab);
        }
        Ok(())
    }

    fn storage_events(&self) -> Option<StorageEvents> {
        Some(StorageEvents {
            receiver: self.origin.inner.events.subscribe(),
            tab: self.tab,
        })
    }
}

/// Directory-backed storage: each key is a file, writes are atomic renames.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) the storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(value.as_bytes())?;
        file.flush()?;
        file.persist(self.path_for(key))
            .map_err(|err| StorageError::Io(err.error))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
