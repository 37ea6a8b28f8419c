//! Persistent key/value storage abstraction
//!
//! Models the host platform's two kinds of persisted settings:
//! - options: plain named values with no expiry
//! - transients: named values that disappear once their TTL has elapsed
//!
//! Two implementations:
//! - `MemoryStore`: in-memory, for tests and embedding
//! - `FileStore`: a single JSON document on disk

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Abstract settings store
///
/// Returns owned values so callers don't hold locks. Deleting a missing
/// entry is not an error.
pub trait KeyValueStore: Send + Sync {
    // -- Transients --

    /// Get a transient, or `None` if missing or expired
    fn get_transient(&self, name: &str) -> Result<Option<Value>>;

    /// Store a transient that expires after `ttl`
    fn set_transient(&self, name: &str, value: Value, ttl: Duration) -> Result<()>;

    fn delete_transient(&self, name: &str) -> Result<()>;

    // -- Options --

    fn get_option(&self, name: &str) -> Result<Option<Value>>;

    fn update_option(&self, name: &str, value: Value) -> Result<()>;

    fn delete_option(&self, name: &str) -> Result<()>;
}

/// A transient value together with its absolute expiry (epoch seconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransientEntry {
    pub value: Value,
    pub expires_at: u64,
}

impl TransientEntry {
    pub fn new(value: Value, now: u64, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: now.saturating_add(ttl.as_secs()),
        }
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}
