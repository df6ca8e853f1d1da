//! Rigup CLI - workstation bootstrap for multi-repository development

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("rigup=debug")
    } else {
        EnvFilter::new("rigup=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match &cli.command {
        Commands::Bootstrap(args) => commands::bootstrap::execute(args.clone(), &cli),
        Commands::Doctor(args) => commands::doctor::execute(args.clone(), &cli),
        Commands::Completions(args) => commands::completions::execute(args.clone()),
    }
}
