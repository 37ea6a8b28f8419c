//! License commands: activate, deactivate and show the stored license

use anyhow::Result;
use colored::Colorize;
use stackboost_core::license::gate;
use stackboost_core::license::record;
use stackboost_core::{LicenseError, LicenseManager, StackboostConfig};

/// Runs `stackboost activate <KEY>`.
///
/// Errors from the licensing server are shown as-is and leave nothing stored.
pub fn run_activate(
    manager: &LicenseManager,
    config: &StackboostConfig,
    key: &str,
    instance: Option<&str>,
) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        eprintln!("  {} License key is empty.", "Error:".red().bold());
        return Ok(());
    }

    let instance_name = instance
        .map(str::to_string)
        .unwrap_or_else(|| config.license.instance_name());

    eprint!("  Activating {}... ", instance_name.bold());
    match manager.activate_and_record(key, &instance_name) {
        Ok(activation) => {
            eprintln!("{}", "done".green());
            eprintln!();
            eprintln!("  {}: {}", "Tier".bold(), activation.tier().to_string().cyan());
            eprintln!("  {}: {}", "Instance".bold(), activation.instance_id);
            eprintln!();
        }
        Err(e @ LicenseError::Store(_)) => {
            eprintln!("{}", "failed".red());
            return Err(e.into());
        }
        Err(e) => {
            eprintln!("{}", "failed".red());
            eprintln!("  {}", e);
        }
    }

    Ok(())
}

/// Runs `stackboost deactivate`.
pub fn run_deactivate(manager: &LicenseManager) -> Result<()> {
    eprint!("  Deactivating... ");
    match manager.deactivate_recorded() {
        Ok(()) => {
            eprintln!("{}", "done".green());
        }
        Err(LicenseError::MissingKey) => {
            eprintln!("{}", "skipped".yellow());
            eprintln!("  No activated license is stored.");
        }
        Err(e @ LicenseError::Store(_)) => {
            eprintln!("{}", "failed".red());
            return Err(e.into());
        }
        Err(e) => {
            eprintln!("{}", "failed".red());
            eprintln!("  {}", e);
            eprintln!(
                "  {}",
                "Local license state was removed anyway.".dimmed()
            );
        }
    }
    Ok(())
}

/// Runs `stackboost status`.
pub fn run_status(manager: &LicenseManager) -> Result<()> {
    let Some(key) = record::load_key(manager.store())? else {
        let tier = manager.resolve_tier(None);
        eprintln!("  {}: {}", "Tier".bold(), tier.to_string().cyan());
        eprintln!("  No license key stored. Run '{}'.", "stackboost activate <KEY>".bold());
        return Ok(());
    };

    let status = manager.check_status(&key);
    let tier = manager.resolve_tier(status.as_ref());

    match status {
        Some(status) => {
            eprintln!("  {}: {}", "Status".bold(), "valid".green());
            eprintln!("  {}: {}", "Variant".bold(), status.variant_id);
            if status.grace_period {
                eprintln!(
                    "  {} Licensing server unreachable; using last verified license.",
                    "\u{26a1}".yellow()
                );
            }
        }
        None => {
            eprintln!("  {}: {}", "Status".bold(), "not licensed".red());
        }
    }
    eprintln!("  {}: {}", "Tier".bold(), tier.to_string().cyan());
    eprintln!("  {}: {}", "Product".bold(), gate::display_name(tier));

    let mut features: Vec<&str> = gate::features_for(tier).into_iter().collect();
    features.sort();
    eprintln!("  {}: {}", "Features".bold(), features.join(", ").dimmed());
    eprintln!();

    Ok(())
}
