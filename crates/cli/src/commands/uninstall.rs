//! Uninstall command: removes all stored license state

use anyhow::Result;
use colored::Colorize;
use stackboost_core::LicenseManager;

pub fn run(manager: &LicenseManager) -> Result<()> {
    manager.purge()?;
    eprintln!("  {} License state removed.", "\u{2713}".green());
    Ok(())
}
