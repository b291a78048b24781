//! pinedocs CLI - Pine Script v6 documentation to combined markdown
//!
//! This is the main entry point for the pinedocs command-line interface.
//! Command implementations live in separate modules under `commands`.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let config = cli.effective_config()?;

    match cli.command {
        Commands::Urls { target } => commands::urls(&config, target, cli.quiet).await?,
        Commands::Content { target } => commands::content(&config, target, cli.quiet).await?,
        Commands::Run => commands::run(&config, cli.quiet).await?,
    }

    Ok(())
}

fn initialize_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
