use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "resync")]
#[command(version)]
#[command(about = "Synchronize declarative resource manifests with a control plane", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply resource manifests to the control plane
    Apply(ApplyArgs),

    /// Delete the resources named by manifests from the control plane
    Delete(DeleteArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Manifest file to load (can be repeated)
    #[arg(short = 'f', long = "manifest", required = true, value_name = "FILE")]
    pub manifests: Vec<PathBuf>,

    /// Recreate resources whose immutable fields changed (dangerous: every
    /// object derived from a recreated definition is deleted with it)
    #[arg(long)]
    pub allow_recreate: bool,

    /// Give up on the reconciliation after this long
    #[arg(long, default_value = "5m", value_parser = humantime::parse_duration)]
    pub timeout: Duration,
}

#[derive(Parser)]
pub struct DeleteArgs {
    /// Manifest file to load (can be repeated)
    #[arg(short = 'f', long = "manifest", required = true, value_name = "FILE")]
    pub manifests: Vec<PathBuf>,

    /// Give up on the reconciliation after this long
    #[arg(long, default_value = "5m", value_parser = humantime::parse_duration)]
    pub timeout: Duration,
}
