//! Edgesite CLI - provision CDN-backed static websites
//!
//! Usage: edgesite <COMMAND>
//!
//! Commands:
//!   plan     Show the dependency-ordered resources of each site
//!   apply    Create or update every resource, then deploy content
//!   destroy  Tear down a site
//!   status   Show recorded resources and deployments

mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use commands::GlobalArgs;
use edgesite::domain::value_objects::CancelToken;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // First Ctrl+C stops at the next stage boundary, a second one exits.
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        if handler_token.request_cancel() {
            eprintln!("\nInterrupted again, exiting now");
            std::process::exit(130);
        }
        eprintln!("\nStopping after the current stage (Ctrl+C again to exit now)");
    }) {
        eprintln!("Warning: Ctrl+C handler not installed: {}", e);
    }

    let args = GlobalArgs {
        json: cli.json,
        verbose: cli.verbose,
        config: cli.config.as_deref(),
        cloud: cli.cloud.as_deref(),
    };

    match &cli.command {
        Commands::Plan { site } => commands::plan::cmd_plan(&args, site.as_deref()),
        Commands::Apply { site, dry_run } => {
            commands::apply::cmd_apply(&args, site.as_deref(), *dry_run, cancel)
        }
        Commands::Destroy { site, yes } => commands::destroy::cmd_destroy(&args, site, *yes),
        Commands::Status => commands::status::cmd_status(&args),
    }
}
