//! Initialize .stackboost.toml configuration

use anyhow::Result;
use colored::Colorize;
use stackboost_core::config::CONFIG_FILENAME;
use stackboost_core::StackboostConfig;
use std::path::Path;

pub fn run(path: Option<&Path>) -> Result<()> {
    let target_path = path.unwrap_or_else(|| Path::new("."));
    let config_path = target_path.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "  {} {} already exists at {}",
            "\u{26a1}".yellow(),
            CONFIG_FILENAME,
            config_path.display()
        );
        return Ok(());
    }

    let config = StackboostConfig::default();
    config.save(&config_path)?;

    eprintln!(
        "  {} Created {} at {}",
        "\u{2713}".green(),
        CONFIG_FILENAME,
        config_path.display()
    );
    eprintln!();
    eprintln!("  You can now customize the configuration and run:");
    eprintln!("    {}", "stackboost activate <YOUR_KEY>".bold());

    Ok(())
}
