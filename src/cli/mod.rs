//! Command-line interface for batchproc
//!
//! Plans and runs demonstration workloads over the batch dispatcher.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;

pub use output::Output;

use crate::config::BatchprocConfig;
use crate::logging::init_logging;

/// batchproc - split index ranges into batches and process them concurrently
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable quiet output (minimal)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show how a collection would be split into batches
    Plan(commands::plan::PlanArgs),
    /// Fill and verify a buffer using concurrent batches
    Run(commands::run::RunArgs),
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Show version information
    Version,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the merged configuration
    Show,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = BatchprocConfig::load_with_custom_config(self.config.as_deref())?;
        init_logging(self.verbose, &config.logging.level);

        let output = Output::new(self.verbose, self.quiet);

        match self.command {
            Commands::Plan(args) => commands::plan::execute(&args, &config, &output),
            Commands::Run(args) => commands::run::execute(&args, &config, &output),
            Commands::Config(ConfigCommands::Show) => commands::config::show(&config, &output),
            Commands::Version => commands::version::execute(&output),
        }
    }
}
