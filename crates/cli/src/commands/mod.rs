//! CLI command definitions and execution
//!
//! This module contains all CLI commands and their implementations.

use clap::{Parser, Subcommand};

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

mod alias;
mod completions;
mod ls;

/// stls - list storage locations
///
/// Lists local directories and S3-compatible buckets with keys relative to
/// the queried location, in human or JSON lines format.
#[derive(Parser, Debug)]
#[command(name = "stls")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage storage service aliases
    #[command(subcommand)]
    Alias(alias::AliasCommands),

    /// List directories, buckets and objects
    Ls(ls::LsArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
        ..Default::default()
    };

    match cli.command {
        Commands::Alias(cmd) => alias::execute(cmd, output_config).await,
        Commands::Ls(args) => ls::execute(args, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}
