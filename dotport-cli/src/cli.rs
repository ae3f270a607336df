//! Command-line argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::browse::BrowseArgs;
use crate::commands::config::ConfigCommands;
use crate::commands::records::{CreateArgs, DeleteArgs, EditArgs, ListArgs, ViewArgs};
use crate::output::OutputFormat;

/// Browse and manage DOT transportation datasets.
#[derive(Debug, Parser)]
#[command(name = "dotport", version, about, long_about = None)]
pub struct Cli {
    /// Configuration profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Data service URL (overrides the profile)
    #[arg(long, global = true, env = "DOTPORT_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for the data service (overrides the profile)
    #[arg(long, global = true, env = "DOTPORT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output format (falls back to the configured default)
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show record counts for every dataset category
    Dashboard,

    /// Page through a dataset interactively
    Browse(BrowseArgs),

    /// List records from a dataset
    List(ListArgs),

    /// Show one record in full
    View(ViewArgs),

    /// Create a record through the dataset's form
    Create(CreateArgs),

    /// Edit a record through the dataset's form
    Edit(EditArgs),

    /// Delete a record
    Delete(DeleteArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigCommands),
}
