//! JSON-file settings store (~/.config/stackboost/store.json by default)

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::{Clock, SystemClock};

use super::{KeyValueStore, TransientEntry};

const STORE_FILENAME: &str = "store.json";

/// On-disk layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    options: HashMap<String, Value>,
    #[serde(default)]
    transients: HashMap<String, TransientEntry>,
}

/// Settings store persisted as one pretty-printed JSON document.
///
/// Every mutation rewrites the whole file. Expired transients are dropped
/// on the next write.
pub struct FileStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) a store at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            clock,
            lock: Mutex::new(()),
        }
    }

    /// Returns `~/.config/stackboost/store.json`
    pub fn default_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("stackboost").join(STORE_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Document> {
        if !self.path.exists() {
            return Ok(Document::default());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Document::default());
        }
        let doc = serde_json::from_str(&contents)
            .with_context(|| format!("Corrupt settings store {}", self.path.display()))?;
        Ok(doc)
    }

    fn save(&self, doc: &mut Document) -> Result<()> {
        let now = self.clock.now();
        doc.transients.retain(|_, entry| !entry.is_expired(now));

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).context("Failed to create settings directory")?;
        }
        let json = serde_json::to_string_pretty(doc)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Load, apply `f`, save, all under the store lock
    fn modify(&self, f: impl FnOnce(&mut Document)) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| anyhow::anyhow!("lock poisoned: {e}"))?;
        let mut doc = self.load()?;
        f(&mut doc);
        self.save(&mut doc)
    }

    fn read<T>(&self, f: impl FnOnce(&Document) -> T) -> Result<T> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| anyhow::anyhow!("lock poisoned: {e}"))?;
        let doc = self.load()?;
        Ok(f(&doc))
    }
}

impl KeyValueStore for FileStore {
    fn get_transient(&self, name: &str) -> Result<Option<Value>> {
        let now = self.clock.now();
        self.read(|doc| {
            doc.transients
                .get(name)
                .filter(|entry| !entry.is_expired(now))
                .map(|entry| entry.value.clone())
        })
    }

    fn set_transient(&self, name: &str, value: Value, ttl: Duration) -> Result<()> {
        let entry = TransientEntry::new(value, self.clock.now(), ttl);
        self.modify(|doc| {
            doc.transients.insert(name.to_string(), entry);
        })
    }

    fn delete_transient(&self, name: &str) -> Result<()> {
        self.modify(|doc| {
            doc.transients.remove(name);
        })
    }

    fn get_option(&self, name: &str) -> Result<Option<Value>> {
        self.read(|doc| doc.options.get(name).cloned())
    }

    fn update_option(&self, name: &str, value: Value) -> Result<()> {
        self.modify(|doc| {
            doc.options.insert(name.to_string(), value);
        })
    }

    fn delete_option(&self, name: &str) -> Result<()> {
        self.modify(|doc| {
            doc.options.remove(name);
        })
    }
}
