//! Command-line interface definitions.

pub mod check;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dipcatch - per-pair dip-buying state machine.
#[derive(Parser, Debug)]
#[command(name = "dipcatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a configuration file and print a summary
    Check(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}
