//! Persisted license state: option names, the stored record, and the uninstall purge

use super::types::{tier_from_variant, Activation, Tier};
use crate::store::KeyValueStore;
use anyhow::Result;
use serde_json::Value;
use sha2::{Digest, Sha256};

pub const LICENSE_KEY_OPTION: &str = "stackboost_license_key";
pub const INSTANCE_ID_OPTION: &str = "stackboost_license_instance_id";
/// Display projection of the tier. Written from the variant, never read as truth.
pub const TIER_OPTION: &str = "stackboost_license_tier";
/// Last known-good variant; doubles as the grace-period backup.
pub const VARIANT_ID_OPTION: &str = "stackboost_license_variant_id";
pub const LAST_VERIFIED_OPTION: &str = "sb_last_verified_at";

const STATUS_TRANSIENT_PREFIX: &str = "sb_license_status_";

/// Name of the cached-status transient for a key.
///
/// The key itself is never used as a store name: the first 16 bytes of its
/// SHA-256, hex encoded, stand in for it.
pub fn status_transient(key: &str) -> String {
    let hash = Sha256::digest(key.as_bytes());
    format!("{}{}", STATUS_TRANSIENT_PREFIX, hex_encode(&hash[..16]))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// The activated license as stored on this installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseRecord {
    pub key: String,
    pub instance_id: String,
    pub variant_id: i64,
}

impl LicenseRecord {
    pub fn tier(&self) -> Tier {
        tier_from_variant(self.variant_id)
    }
}

/// Reads a string option, treating missing, non-string and blank values as absent.
pub fn string_option(store: &dyn KeyValueStore, name: &str) -> Result<Option<String>> {
    Ok(store
        .get_option(name)?
        .and_then(|v| v.as_str().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty()))
}

pub fn int_option(store: &dyn KeyValueStore, name: &str) -> Result<Option<i64>> {
    Ok(store.get_option(name)?.and_then(|v| v.as_i64()))
}

/// Reads the stored license key, trimmed.
pub fn load_key(store: &dyn KeyValueStore) -> Result<Option<String>> {
    string_option(store, LICENSE_KEY_OPTION)
}

/// Loads the full record. `None` unless both a key and an instance id are stored.
pub fn load(store: &dyn KeyValueStore) -> Result<Option<LicenseRecord>> {
    let Some(key) = load_key(store)? else {
        return Ok(None);
    };
    let Some(instance_id) = string_option(store, INSTANCE_ID_OPTION)? else {
        return Ok(None);
    };
    let variant_id = int_option(store, VARIANT_ID_OPTION)?.unwrap_or_default();
    Ok(Some(LicenseRecord {
        key,
        instance_id,
        variant_id,
    }))
}

/// Persists a successful activation together with its tier projection.
pub fn save(store: &dyn KeyValueStore, key: &str, activation: &Activation) -> Result<()> {
    store.update_option(LICENSE_KEY_OPTION, Value::from(key.trim()))?;
    store.update_option(INSTANCE_ID_OPTION, Value::from(activation.instance_id.as_str()))?;
    store.update_option(VARIANT_ID_OPTION, Value::from(activation.variant_id))?;
    write_tier_projection(store, activation.tier())
}

/// Removes the key, instance id and tier projection.
pub fn clear(store: &dyn KeyValueStore) -> Result<()> {
    store.delete_option(LICENSE_KEY_OPTION)?;
    store.delete_option(INSTANCE_ID_OPTION)?;
    store.delete_option(TIER_OPTION)?;
    Ok(())
}

pub fn tier_projection(store: &dyn KeyValueStore) -> Result<Option<Tier>> {
    Ok(string_option(store, TIER_OPTION)?.and_then(|s| Tier::from_slug(&s)))
}

pub fn write_tier_projection(store: &dyn KeyValueStore, tier: Tier) -> Result<()> {
    store.update_option(TIER_OPTION, Value::from(tier.as_str()))
}

/// Deletes every piece of license state, including the cached status for the stored key.
pub fn purge(store: &dyn KeyValueStore) -> Result<()> {
    if let Some(key) = load_key(store)? {
        store.delete_transient(&status_transient(&key))?;
    }
    for name in [
        LICENSE_KEY_OPTION,
        INSTANCE_ID_OPTION,
        TIER_OPTION,
        VARIANT_ID_OPTION,
        LAST_VERIFIED_OPTION,
    ] {
        store.delete_option(name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_transient_is_deterministic() {
        assert_eq!(status_transient("KEY"), status_transient("KEY"));
        assert_ne!(status_transient("KEY"), status_transient("KEY2"));
    }

    #[test]
    fn status_transient_hides_the_key() {
        let name = status_transient("super-secret-key");
        assert!(name.starts_with(STATUS_TRANSIENT_PREFIX));
        assert!(!name.contains("super-secret-key"));
        let suffix = &name[STATUS_TRANSIENT_PREFIX.len()..];
        assert_eq!(suffix.len(), 32, "Expected 32 hex chars, got: {suffix}");
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hex_encode_known_values() {
        assert_eq!(hex_encode(&[]), "");
        assert_eq!(hex_encode(&[0x00]), "00");
        assert_eq!(hex_encode(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
    }
}
