//! In-memory settings store

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::Result;
use serde_json::Value;

use crate::clock::{Clock, SystemClock};

use super::{KeyValueStore, TransientEntry};

/// In-memory store backed by two `HashMap`s
pub struct MemoryStore {
    options: RwLock<HashMap<String, Value>>,
    transients: RwLock<HashMap<String, TransientEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Create a new empty MemoryStore on the wall clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a new empty MemoryStore whose transients expire against `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            options: RwLock::new(HashMap::new()),
            transients: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Names of all stored options, sorted
    pub fn option_names(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.options.read() {
            Ok(options) => options.keys().cloned().collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_transient(&self, name: &str) -> Result<Option<Value>> {
        let now = self.clock.now();
        let transients = self
            .transients
            .read()
            .map_err(|e| anyhow::anyhow!("lock poisoned: {e}"))?;
        Ok(transients
            .get(name)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone()))
    }

    fn set_transient(&self, name: &str, value: Value, ttl: Duration) -> Result<()> {
        let entry = TransientEntry::new(value, self.clock.now(), ttl);
        let mut transients = self
            .transients
            .write()
            .map_err(|e| anyhow::anyhow!("lock poisoned: {e}"))?;
        transients.insert(name.to_string(), entry);
        Ok(())
    }

    fn delete_transient(&self, name: &str) -> Result<()> {
        let mut transients = self
            .transients
            .write()
            .map_err(|e| anyhow::anyhow!("lock poisoned: {e}"))?;
        transients.remove(name);
        Ok(())
    }

    fn get_option(&self, name: &str) -> Result<Option<Value>> {
        let options = self
            .options
            .read()
            .map_err(|e| anyhow::anyhow!("lock poisoned: {e}"))?;
        Ok(options.get(name).cloned())
    }

    fn update_option(&self, name: &str, value: Value) -> Result<()> {
        let mut options = self
            .options
            .write()
            .map_err(|e| anyhow::anyhow!("lock poisoned: {e}"))?;
        options.insert(name.to_string(), value);
        Ok(())
    }

    fn delete_option(&self, name: &str) -> Result<()> {
        let mut options = self
            .options
            .write()
            .map_err(|e| anyhow::anyhow!("lock poisoned: {e}"))?;
        options.remove(name);
        Ok(())
    }
}
