//! Feature gating: checks tier entitlements

use super::types::{
    required_tier, LicenseError, Tier, BUSINESS_FEATURES, LITE_FEATURES, PRO_FEATURES,
};
use std::collections::HashSet;

/// Maximum number of saved rules on the Lite tier
pub const LITE_RULE_LIMIT: usize = 5;

pub const PRODUCT_NAME: &str = "StackBoost - For SupportCandy";

/// Returns `true` if `tier` unlocks the feature. Unknown features are never active.
pub fn is_feature_active(feature: &str, tier: Tier) -> bool {
    required_tier(feature).is_some_and(|required| tier.at_least(required))
}

/// Returns `Ok(())` if the tier includes the feature, otherwise `Err(FeatureNotLicensed)`.
pub fn require_feature(feature: &str, tier: Tier) -> Result<(), LicenseError> {
    if is_feature_active(feature, tier) {
        return Ok(());
    }
    Err(LicenseError::FeatureNotLicensed {
        feature: feature.to_string(),
        required_tier: required_tier(feature).unwrap_or(Tier::Business),
    })
}

/// Builds the feature set unlocked by a tier.
pub fn features_for(tier: Tier) -> HashSet<&'static str> {
    let mut features: HashSet<&'static str> = LITE_FEATURES.iter().copied().collect();
    if tier.at_least(Tier::Pro) {
        features.extend(PRO_FEATURES.iter().copied());
    }
    if tier == Tier::Business {
        features.extend(BUSINESS_FEATURES.iter().copied());
    }
    features
}

/// Lite installations may keep at most `LITE_RULE_LIMIT` rules; paid tiers are unlimited.
pub fn check_rule_limit(tier: Tier, rule_count: usize) -> Result<(), LicenseError> {
    if tier == Tier::Lite && rule_count > LITE_RULE_LIMIT {
        return Err(LicenseError::RuleLimitExceeded {
            limit: LITE_RULE_LIMIT,
            tier,
        });
    }
    Ok(())
}

/// Product name as shown in the plugin list, suffixed with the paid tier.
pub fn display_name(tier: Tier) -> String {
    match tier {
        Tier::Lite => PRODUCT_NAME.to_string(),
        paid => format!("{PRODUCT_NAME} - {paid}"),
    }
}
