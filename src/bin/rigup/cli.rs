//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use rigup::util::shell::{ColorChoice, Shell};

/// Rigup - workstation bootstrap for multi-repository development
#[derive(Parser)]
#[command(name = "rigup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress everything except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Colored output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output format for step progress
    #[arg(long, global = true, value_enum, default_value_t)]
    pub message_format: MessageFormat,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Build the output shell from the global flags.
    pub fn shell(&self) -> Shell {
        Shell::from_flags(
            self.quiet,
            self.verbose,
            self.color,
            self.message_format == MessageFormat::Json,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MessageFormat {
    #[default]
    Human,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full bootstrap sequence
    Bootstrap(BootstrapArgs),

    /// Check which external tools are already in place
    Doctor(DoctorArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Clone)]
pub struct BootstrapArgs {
    /// Resolve the plan and print it without running any step
    #[arg(long)]
    pub dry_run: bool,

    /// Config file to use instead of ~/.rigup/config.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Clone)]
pub struct DoctorArgs {
    /// Config file to use instead of ~/.rigup/config.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
