//! License/entitlement system for StackBoost
//!
//! Handles remote activation and validation, status caching, the grace
//! period, and tier derivation. Feature code only ever asks for a tier.

pub mod client;
pub mod gate;
pub mod record;
pub mod types;

pub use client::{HttpTransport, LicenseClient, Transport};
pub use types::{
    tier_from_variant, Activation, CachedStatus, LicenseError, LicensePolicy, Tier, CACHE_TTL,
    GRACE_PERIOD, REQUEST_TIMEOUT,
};

use crate::clock::{Clock, SystemClock};
use crate::store::KeyValueStore;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Decides whether this installation is licensed.
///
/// Built once by the application and shared by reference.
pub struct LicenseManager {
    store: Arc<dyn KeyValueStore>,
    client: LicenseClient,
    clock: Arc<dyn Clock>,
    policy: LicensePolicy,
}

impl LicenseManager {
    pub fn new(store: Arc<dyn KeyValueStore>, transport: Arc<dyn Transport>) -> Self {
        Self {
            store,
            client: LicenseClient::new(transport),
            clock: Arc::new(SystemClock),
            policy: LicensePolicy::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_policy(mut self, policy: LicensePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> LicensePolicy {
        self.policy
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Activates `key` for this installation and caches the result.
    ///
    /// On failure the API's error is returned as-is and nothing is written.
    pub fn activate(&self, key: &str, instance_name: &str) -> Result<Activation, LicenseError> {
        let activation = self.client.activate(key, instance_name)?;
        info!(
            variant_id = activation.variant_id,
            tier = %activation.tier(),
            "license activated"
        );
        self.cache_status(key, activation.variant_id);
        Ok(activation)
    }

    /// Deactivates an instance.
    ///
    /// Local state is dropped before the API is called, so a failed remote
    /// call still leaves this installation unlicensed.
    pub fn deactivate(&self, key: &str, instance_id: &str) -> Result<(), LicenseError> {
        self.forget_verification(key);
        let result = self.client.deactivate(key, instance_id);
        match &result {
            Ok(()) => info!("license deactivated"),
            Err(err) => warn!(error = %err, "remote deactivation failed; local state already cleared"),
        }
        result
    }

    /// Current status of `key`, or `None` when it should be treated as unlicensed.
    ///
    /// Flow:
    /// 1. Blank key: `None`, no API call
    /// 2. Cached status within TTL: returned as stored
    /// 3. Validate against the API: cache the result on success
    /// 4. Definitive rejection: `None`, grace backstop and matching record cleared
    /// 5. Any other failure: last known variant if verified within the grace period
    pub fn check_status(&self, key: &str) -> Option<CachedStatus> {
        if key.trim().is_empty() {
            return None;
        }

        if let Some(cached) = self.read_cache(key) {
            debug!("license status cache hit");
            return Some(cached);
        }

        debug!("license status cache miss; validating");
        match self.client.validate(key) {
            Ok(variant_id) => Some(self.cache_status(key, variant_id)),
            Err(err) if err.is_definitive() => {
                warn!(error = %err, "license key rejected");
                self.forget_verification(key);
                self.forget_record_for(key);
                None
            }
            Err(err) => {
                warn!(error = %err, "license validation failed; checking grace period");
                self.grace_status()
            }
        }
    }

    /// Activates and records the license (key, instance id, variant, tier projection).
    ///
    /// If the record cannot be written, the cached status and grace backstop
    /// written by the activation are dropped again.
    pub fn activate_and_record(
        &self,
        key: &str,
        instance_name: &str,
    ) -> Result<Activation, LicenseError> {
        let key = key.trim();
        let activation = self.activate(key, instance_name)?;
        if let Err(err) = record::save(self.store(), key, &activation) {
            warn!(error = %err, "could not record activation; dropping cached status");
            self.forget_verification(key);
            if let Err(clear_err) = record::clear(self.store()) {
                warn!(error = %clear_err, "could not clear partial license record");
            }
            return Err(LicenseError::store(err));
        }
        Ok(activation)
    }

    /// Deactivates the recorded instance and removes the record.
    ///
    /// The record is removed even when the remote call fails. A key stored
    /// without an instance id cannot be deactivated remotely; its local state
    /// is cleared and `MissingKey` returned.
    pub fn deactivate_recorded(&self) -> Result<(), LicenseError> {
        let Some(rec) = record::load(self.store()).map_err(LicenseError::store)? else {
            if let Some(key) = record::load_key(self.store()).map_err(LicenseError::store)? {
                warn!("stored license key has no instance id; clearing local state");
                self.forget_verification(&key);
                record::clear(self.store()).map_err(LicenseError::store)?;
            }
            return Err(LicenseError::MissingKey);
        };
        let result = self.deactivate(&rec.key, &rec.instance_id);
        record::clear(self.store()).map_err(LicenseError::store)?;
        result
    }

    /// Tier granted by the stored key, Lite when unlicensed.
    ///
    /// Keeps the tier projection option in step with the variant.
    pub fn current_tier(&self) -> Tier {
        let key = match record::load_key(self.store()) {
            Ok(key) => key,
            Err(err) => {
                warn!(error = %err, "could not read stored license key");
                None
            }
        };
        let status = key.as_deref().and_then(|k| self.check_status(k));
        self.resolve_tier(status.as_ref())
    }

    /// Tier for an already-checked status, syncing the tier projection.
    pub fn resolve_tier(&self, status: Option<&CachedStatus>) -> Tier {
        let tier = status
            .filter(|status| status.valid)
            .map(CachedStatus::tier)
            .unwrap_or_default();
        self.sync_tier_projection(tier);
        tier
    }

    /// Uninstall: removes every stored license setting.
    pub fn purge(&self) -> Result<(), LicenseError> {
        record::purge(self.store()).map_err(LicenseError::store)?;
        info!("license state purged");
        Ok(())
    }

    fn read_cache(&self, key: &str) -> Option<CachedStatus> {
        let raw = match self.store.get_transient(&record::status_transient(key)) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(error = %err, "could not read license status cache");
                return None;
            }
        };
        match serde_json::from_value(raw) {
            Ok(status) => Some(status),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable license status cache entry");
                None
            }
        }
    }

    /// Writes a fresh verified status, the verification time and the backup variant.
    fn cache_status(&self, key: &str, variant_id: i64) -> CachedStatus {
        let status = CachedStatus::verified(variant_id);
        let now = self.clock.now();

        let writes = serde_json::to_value(&status)
            .map_err(anyhow::Error::from)
            .and_then(|value| {
                self.store.set_transient(
                    &record::status_transient(key),
                    value,
                    self.policy.cache_ttl,
                )
            })
            .and_then(|_| {
                self.store
                    .update_option(record::LAST_VERIFIED_OPTION, Value::from(now))
            })
            .and_then(|_| {
                self.store
                    .update_option(record::VARIANT_ID_OPTION, Value::from(variant_id))
            });
        if let Err(err) = writes {
            warn!(error = %err, "could not cache license status");
        }

        status
    }

    /// Last known variant if the key was verified within the grace period.
    fn grace_status(&self) -> Option<CachedStatus> {
        let store = self.store();
        let last_verified = match store.get_option(record::LAST_VERIFIED_OPTION) {
            Ok(v) => v.and_then(|v| v.as_u64()).unwrap_or(0),
            Err(err) => {
                warn!(error = %err, "could not read last verification time");
                return None;
            }
        };
        if last_verified == 0 {
            return None;
        }

        let elapsed = self.clock.now().saturating_sub(last_verified);
        if elapsed >= self.policy.grace_period.as_secs() {
            info!(elapsed_secs = elapsed, "grace period has lapsed");
            return None;
        }

        match record::int_option(store, record::VARIANT_ID_OPTION) {
            Ok(Some(variant_id)) if variant_id != 0 => {
                info!(variant_id, elapsed_secs = elapsed, "using grace period license");
                Some(CachedStatus::grace(variant_id))
            }
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "could not read backup variant");
                None
            }
        }
    }

    /// Drops the cached status and the grace backstop for `key`.
    fn forget_verification(&self, key: &str) {
        let store = self.store();
        let cleared = store
            .delete_transient(&record::status_transient(key))
            .and_then(|_| store.delete_option(record::LAST_VERIFIED_OPTION))
            .and_then(|_| store.delete_option(record::VARIANT_ID_OPTION));
        if let Err(err) = cleared {
            warn!(error = %err, "could not clear license verification state");
        }
    }

    /// Removes the stored record when it belongs to `key`.
    fn forget_record_for(&self, key: &str) {
        let store = self.store();
        match record::load_key(store) {
            Ok(Some(stored)) if stored == key.trim() => {
                if let Err(err) = record::clear(store) {
                    warn!(error = %err, "could not clear rejected license record");
                } else {
                    info!("rejected license record removed");
                }
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "could not read stored license key"),
        }
    }

    fn sync_tier_projection(&self, tier: Tier) {
        match record::tier_projection(self.store()) {
            Ok(Some(stored)) if stored == tier => {}
            Ok(_) => {
                if let Err(err) = record::write_tier_projection(self.store(), tier) {
                    warn!(error = %err, "could not update tier projection");
                }
            }
            Err(err) => warn!(error = %err, "could not read tier projection"),
        }
    }
}
