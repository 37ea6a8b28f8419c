//! Core types for the license/entitlement system

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// How long a successful validation is trusted before asking the API again.
pub const CACHE_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// How long after the last successful verification a transient API failure
/// still grants the last known tier.
pub const GRACE_PERIOD: Duration = Duration::from_secs(72 * 60 * 60);

/// Timeout for a single licensing API request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Variant IDs for the Pro tier
pub const PRO_VARIANTS: &[i64] = &[
    1147440, // Pro 1 Site (Annual)
    1147463, // Pro 5 Sites (Annual)
    1147434, // Pro Unlimited (Annual)
    1147435, // Pro Lifetime
];

/// Variant IDs for the Business tier
pub const BUSINESS_VARIANTS: &[i64] = &[
    1147459, // Business 1 Site (Annual)
    1147441, // Business 5 Sites (Annual)
    1147442, // Business Unlimited (Annual)
    1147443, // Business Lifetime
];

/// Feature constants: Lite tier
pub const LITE_FEATURES: &[&str] = &["qol_enhancements", "after_hours_notice"];

/// Feature constants: Pro tier (includes Lite)
pub const PRO_FEATURES: &[&str] = &[
    "conditional_views",
    "queue_macro",
    "after_ticket_survey",
    "unified_ticket_macro",
];

/// Feature constants: Business tier (includes Pro + Lite)
pub const BUSINESS_FEATURES: &[&str] = &["onboarding_dashboard", "staff_directory"];

/// License tier. Ordered: `Lite < Pro < Business`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Lite,
    Pro,
    Business,
}

impl Tier {
    /// Lowercase slug, as persisted in the display projection
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Lite => "lite",
            Tier::Pro => "pro",
            Tier::Business => "business",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "lite" => Some(Tier::Lite),
            "pro" => Some(Tier::Pro),
            "business" => Some(Tier::Business),
            _ => None,
        }
    }

    /// Returns `true` if this tier grants everything `required` grants.
    pub fn at_least(self, required: Tier) -> bool {
        self >= required
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Lite => write!(f, "Lite"),
            Tier::Pro => write!(f, "Pro"),
            Tier::Business => write!(f, "Business"),
        }
    }
}

/// Maps a remote product variant to a tier. Total: unknown variants are Lite.
pub fn tier_from_variant(variant_id: i64) -> Tier {
    if BUSINESS_VARIANTS.contains(&variant_id) {
        return Tier::Business;
    }
    if PRO_VARIANTS.contains(&variant_id) {
        return Tier::Pro;
    }
    Tier::Lite
}

/// Returns the minimum tier that unlocks a feature, or `None` for unknown slugs.
pub fn required_tier(feature: &str) -> Option<Tier> {
    if LITE_FEATURES.contains(&feature) {
        return Some(Tier::Lite);
    }
    if PRO_FEATURES.contains(&feature) {
        return Some(Tier::Pro);
    }
    if BUSINESS_FEATURES.contains(&feature) {
        return Some(Tier::Business);
    }
    None
}

/// The cached answer to "is this key licensed, and for which variant?"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedStatus {
    pub valid: bool,
    pub variant_id: i64,
    /// Set only on results produced by the grace-period fallback
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub grace_period: bool,
}

impl CachedStatus {
    pub fn verified(variant_id: i64) -> Self {
        Self {
            valid: true,
            variant_id,
            grace_period: false,
        }
    }

    pub fn grace(variant_id: i64) -> Self {
        Self {
            valid: true,
            variant_id,
            grace_period: true,
        }
    }

    pub fn tier(&self) -> Tier {
        tier_from_variant(self.variant_id)
    }
}

/// Result of a successful remote activation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    pub variant_id: i64,
    pub instance_id: String,
}

impl Activation {
    pub fn tier(&self) -> Tier {
        tier_from_variant(self.variant_id)
    }
}

/// Cache and grace windows. Defaults to `CACHE_TTL` / `GRACE_PERIOD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LicensePolicy {
    pub cache_ttl: Duration,
    pub grace_period: Duration,
}

impl Default for LicensePolicy {
    fn default() -> Self {
        Self {
            cache_ttl: CACHE_TTL,
            grace_period: GRACE_PERIOD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LicenseError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Empty response from licensing server.")]
    EmptyResponse,
    #[error("Malformed response from licensing server: {0}")]
    MalformedResponse(String),
    /// Error string returned by the licensing API, shown verbatim
    #[error("{0}")]
    Api(String),
    #[error("License key was rejected by the licensing server")]
    Rejected,
    #[error("No license key is stored")]
    MissingKey,
    #[error("Store error: {0}")]
    Store(String),
    #[error("{feature} requires {required_tier}. Activate a license to upgrade.")]
    FeatureNotLicensed { feature: String, required_tier: Tier },
    #[error("You have reached the limit of {limit} rules for the {tier} version.")]
    RuleLimitExceeded { limit: usize, tier: Tier },
}

impl LicenseError {
    pub fn store(err: anyhow::Error) -> Self {
        LicenseError::Store(format!("{err:#}"))
    }

    /// Whether the licensing API has definitively refused the key.
    ///
    /// The API has no structured error codes, so API error strings are
    /// classified by wording: "not found" or "invalid" (any case) is
    /// definitive, anything else (rate limiting, server errors, a bare
    /// `valid: false` with no message) is not. Transport failures and
    /// unreadable responses are never definitive.
    pub fn is_definitive(&self) -> bool {
        match self {
            LicenseError::Api(message) => {
                let message = message.to_lowercase();
                message.contains("not found") || message.contains("invalid")
            }
            _ => false,
        }
    }
}
