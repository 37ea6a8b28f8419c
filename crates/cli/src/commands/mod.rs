//! CLI commands

pub mod feature;
pub mod init;
pub mod license;
pub mod uninstall;

use anyhow::{Context, Result};
use stackboost_core::license::HttpTransport;
use stackboost_core::{FileStore, LicenseManager, StackboostConfig};
use std::sync::Arc;

/// Builds the one `LicenseManager` a command works with.
pub fn build_manager(config: &StackboostConfig) -> Result<LicenseManager> {
    let store_path = config
        .store
        .resolve_path()
        .context("Could not determine config directory")?;
    tracing::debug!(path = %store_path.display(), "opening settings store");
    let store = Arc::new(FileStore::open(store_path));

    let transport = HttpTransport::new(&config.license.api_url, config.license.timeout())?;

    Ok(LicenseManager::new(store, Arc::new(transport)).with_policy(config.license.policy()))
}
