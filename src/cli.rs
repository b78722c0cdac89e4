use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "vb365-cleaner")]
#[command(
    about = "Remove deleted SharePoint sites and Teams from VB365 backup jobs",
    long_about = None
)]
pub struct Cli {
    /// Dry run, don't change any job
    #[arg(short, long)]
    pub dry_run: bool,

    /// Save the collected data to JSON/CSV files
    #[arg(short, long)]
    pub save: bool,

    /// Configuration file (defaults to config.{json,toml,yaml} in the working directory)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print configuration values
    PrintConfig,
}
