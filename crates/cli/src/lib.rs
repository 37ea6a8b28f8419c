//! StackBoost CLI library: exposed for integration tests

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stackboost")]
#[command(about = "License activation and feature gating for StackBoost", long_about = None)]
#[command(version = stackboost_core::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to .stackboost.toml (default: search from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize .stackboost.toml configuration
    Init {
        /// Path to initialize (default: current directory)
        path: Option<PathBuf>,
    },

    /// Activate a license key for this installation
    Activate {
        /// License key
        key: String,

        /// Instance label sent to the licensing server (default: host name)
        #[arg(long)]
        instance: Option<String>,
    },

    /// Deactivate the stored license
    Deactivate,

    /// Show current license status
    Status,

    /// Check whether a feature is active for the current tier
    Feature {
        /// Feature slug, e.g. conditional_views
        slug: String,
    },

    /// Remove all stored license state
    Uninstall,
}
