use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Edgesite - TLS-terminated, CDN-backed static websites
#[derive(Parser, Debug)]
#[command(name = "edgesite")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI (NDJSON events on stdout)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ./edgesite.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Local cloud state file
    #[arg(long, global = true)]
    pub cloud: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the dependency-ordered resources of each site
    Plan {
        /// Only this site
        #[arg(long)]
        site: Option<String>,
    },

    /// Create or update every resource, then deploy content
    Apply {
        /// Only this site
        #[arg(long)]
        site: Option<String>,

        /// Show the plan without calling any provider
        #[arg(long)]
        dry_run: bool,
    },

    /// Tear down a site (the hosted zone is never touched)
    Destroy {
        /// Site to destroy
        #[arg(long)]
        site: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show recorded resources and the last deployment of each site
    Status,
}
