//! vpip - variant-aware package installer CLI

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use vpip_cli::cmd;
use vpip_cli::logging;
use vpip_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    logging::init();

    let cli = Cli::parse();
    let quiet = cli.quiet;

    match cli.command {
        Commands::Install(args) => cmd::install::install(args, quiet).await,
    }
}
