//! StackBoost Core - License Status Cache
//!
//! This crate decides whether a StackBoost installation is licensed:
//! - Remote activation, deactivation and validation against the licensing API
//! - Status caching with a TTL, backed by a pluggable key/value store
//! - A bounded grace period when the licensing API is unreachable
//! - Tier derivation and feature gating

pub mod clock;
pub mod config;
pub mod license;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StackboostConfig;
pub use license::{
    tier_from_variant, Activation, CachedStatus, LicenseError, LicenseManager, LicensePolicy, Tier,
};
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// StackBoost version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
