//! Feature command: reports whether a feature is unlocked

use anyhow::Result;
use colored::Colorize;
use stackboost_core::license::gate;
use stackboost_core::license::types::required_tier;
use stackboost_core::LicenseManager;

/// Prints whether `slug` is active. Never fails on an unlicensed feature.
pub fn run(manager: &LicenseManager, slug: &str) -> Result<()> {
    let tier = manager.current_tier();

    match gate::require_feature(slug, tier) {
        Ok(()) => {
            eprintln!(
                "  {} {} is active on {}",
                "\u{2713}".green(),
                slug.bold(),
                tier.to_string().cyan()
            );
        }
        Err(e) if required_tier(slug).is_none() => {
            eprintln!("  {} Unknown feature {}", "\u{26a1}".yellow(), slug.bold());
            tracing::debug!(error = %e, "unknown feature slug");
        }
        Err(e) => {
            eprintln!("  {} {}", "\u{26a1}".yellow(), e);
        }
    }

    Ok(())
}
