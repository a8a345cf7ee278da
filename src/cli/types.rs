//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use crate::cli::commands::config::ConfigArgs;
use crate::cli::commands::serve::ServeArgs;

#[derive(Parser)]
#[command(name = "jira-relay")]
#[command(about = "jira-relay - Forwarding gateway for the Jira Cloud REST API", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the relay server
    Serve(ServeArgs),

    /// Print the effective configuration
    Config(ConfigArgs),
}
