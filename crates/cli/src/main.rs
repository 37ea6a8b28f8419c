//! StackBoost CLI - license activation and feature gating

use anyhow::Result;
use clap::Parser;
use stackboost_cli::{commands, Cli, Commands};
use stackboost_core::StackboostConfig;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => StackboostConfig::from_file(path)?,
        None => StackboostConfig::find_and_load(&std::env::current_dir()?)?,
    };

    init_tracing(&config, cli.verbose);

    if let Commands::Init { ref path } = cli.command {
        return commands::init::run(path.as_deref());
    }

    let manager = commands::build_manager(&config)?;

    match cli.command {
        Commands::Init { .. } => {}
        Commands::Activate {
            ref key,
            ref instance,
        } => {
            commands::license::run_activate(&manager, &config, key, instance.as_deref())?;
        }
        Commands::Deactivate => {
            commands::license::run_deactivate(&manager)?;
        }
        Commands::Status => {
            commands::license::run_status(&manager)?;
        }
        Commands::Feature { ref slug } => {
            commands::feature::run(&manager, slug)?;
        }
        Commands::Uninstall => {
            commands::uninstall::run(&manager)?;
        }
    }

    Ok(())
}

fn init_tracing(config: &StackboostConfig, verbose: bool) {
    let default_level = if verbose { "debug" } else { config.log.level.as_str() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
