use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "driftwatch")]
#[command(about = "API schema drift watcher", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the periodic endpoint monitor until interrupted
    Watch,
    /// Run a single sweep over all monitored endpoints and print a report
    Check,
    /// Print the cached schema description for one endpoint
    Describe(DescribeArgs),
    /// Print a summary of all cached schemas
    Summary,
}

#[derive(clap::Args, Debug)]
pub struct DescribeArgs {
    /// Endpoint path, e.g. /v3/profiles
    pub endpoint: String,
}
