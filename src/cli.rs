// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "greenfleet")]
#[command(about = "Blue-green application deployment across Cloud Foundry foundations")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy an extracted application to every foundation of an environment
    Deploy {
        /// Environments configuration file
        #[arg(short, long, default_value = "greenfleet.yml")]
        config: PathBuf,

        /// Target environment (defined in config)
        #[arg(short, long)]
        environment: String,

        #[arg(long)]
        org: String,

        #[arg(long)]
        space: String,

        /// Application name
        #[arg(long)]
        app: String,

        /// Directory holding the extracted application bits
        #[arg(short, long)]
        path: PathBuf,

        /// Manifest file to record with the deployment
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Instance count (defaults to the environment's)
        #[arg(long)]
        instances: Option<u16>,

        /// Correlation id (generated when omitted)
        #[arg(long)]
        uuid: Option<String>,

        /// Maximum foundations worked on at once
        #[arg(long)]
        max_concurrency: Option<usize>,

        /// cf CLI binary
        #[arg(long, default_value = "cf")]
        cf: PathBuf,
    },
}
