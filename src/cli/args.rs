//! CLI argument definitions using clap
//!
//! Commands:
//! - contactdir init [--config <path>] [--data-dir <path>]
//! - contactdir [run] [--config <path>] [--data-dir <path>] [-v...]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// contactdir - an interactive contact directory
#[derive(Parser, Debug)]
#[command(name = "contactdir")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory, overriding the configuration file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Create the data directory and an empty contact log
    Init,

    /// Open the interactive menu (default)
    Run,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// The requested command, `run` when none is given
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Run)
    }
}
