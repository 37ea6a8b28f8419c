use stackboost_core::license::gate::{
    check_rule_limit, display_name, features_for, is_feature_active, require_feature,
    LITE_RULE_LIMIT,
};
use stackboost_core::license::types::{BUSINESS_FEATURES, LITE_FEATURES, PRO_FEATURES};
use stackboost_core::{LicenseError, Tier};

#[test]
fn lite_features_active_everywhere() {
    for tier in [Tier::Lite, Tier::Pro, Tier::Business] {
        for f in LITE_FEATURES {
            assert!(is_feature_active(f, tier), "{f} should be active on {tier}");
        }
    }
}

#[test]
fn pro_features_need_pro() {
    for f in PRO_FEATURES {
        assert!(!is_feature_active(f, Tier::Lite), "{f} active on Lite");
        assert!(is_feature_active(f, Tier::Pro), "{f} inactive on Pro");
        assert!(is_feature_active(f, Tier::Business), "{f} inactive on Business");
    }
}

#[test]
fn business_features_need_business() {
    for f in BUSINESS_FEATURES {
        assert!(!is_feature_active(f, Tier::Lite));
        assert!(!is_feature_active(f, Tier::Pro));
        assert!(is_feature_active(f, Tier::Business));
    }
}

#[test]
fn unknown_feature_is_never_active() {
    for tier in [Tier::Lite, Tier::Pro, Tier::Business] {
        assert!(!is_feature_active("contextual_views", tier));
    }
}

#[test]
fn require_feature_reports_required_tier() {
    assert!(require_feature("queue_macro", Tier::Pro).is_ok());
    assert_eq!(
        require_feature("staff_directory", Tier::Pro),
        Err(LicenseError::FeatureNotLicensed {
            feature: "staff_directory".to_string(),
            required_tier: Tier::Business,
        })
    );
}

#[test]
fn features_for_counts() {
    assert_eq!(features_for(Tier::Lite).len(), LITE_FEATURES.len());
    assert_eq!(
        features_for(Tier::Pro).len(),
        LITE_FEATURES.len() + PRO_FEATURES.len()
    );
    assert_eq!(
        features_for(Tier::Business).len(),
        LITE_FEATURES.len() + PRO_FEATURES.len() + BUSINESS_FEATURES.len()
    );
}

#[test]
fn features_for_agrees_with_is_feature_active() {
    for tier in [Tier::Lite, Tier::Pro, Tier::Business] {
        for f in features_for(tier) {
            assert!(is_feature_active(f, tier));
        }
    }
}

#[test]
fn lite_rule_limit() {
    assert!(check_rule_limit(Tier::Lite, 0).is_ok());
    assert!(check_rule_limit(Tier::Lite, LITE_RULE_LIMIT).is_ok());
    assert_eq!(
        check_rule_limit(Tier::Lite, LITE_RULE_LIMIT + 1),
        Err(LicenseError::RuleLimitExceeded {
            limit: 5,
            tier: Tier::Lite,
        })
    );
}

#[test]
fn paid_tiers_have_no_rule_limit() {
    assert!(check_rule_limit(Tier::Pro, 500).is_ok());
    assert!(check_rule_limit(Tier::Business, 500).is_ok());
}

#[test]
fn display_name_per_tier() {
    assert_eq!(display_name(Tier::Lite), "StackBoost - For SupportCandy");
    assert_eq!(display_name(Tier::Pro), "StackBoost - For SupportCandy - Pro");
    assert_eq!(
        display_name(Tier::Business),
        "StackBoost - For SupportCandy - Business"
    );
}
