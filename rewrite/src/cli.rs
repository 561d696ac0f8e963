// rewrite/src/cli.rs
//! This file defines the command-line interface (CLI) for the rewrite
//! application, including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "rewrite",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Rewrite strings with ordered pattern/replacement rule chains",
    long_about = "Rewrite is a command-line front end for a rule-based, recursive string rewriting engine. Rules are grouped into named contexts in a YAML file; each input is run through the rules of one context, which can re-apply themselves, jump within the chain, or refuse the input.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging for the rewrite crates
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `rewrite` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrites each input with one context of a configuration.
    #[command(about = "Rewrites each input (or each stdin line) with one context of a configuration.")]
    Apply(ApplyCommand),

    /// Compiles a configuration and lists its contexts.
    #[command(about = "Compiles a configuration and lists its contexts with their rule counts.")]
    Check(CheckCommand),
}

/// Arguments for the `apply` command.
#[derive(Parser, Debug)]
pub struct ApplyCommand {
    /// Path to the rewrite configuration file (YAML).
    #[arg(long, short = 'c', value_name = "FILE", env = "REWRITE_CONFIG", help = "Path to the rewrite configuration file (YAML).")]
    pub config: PathBuf,

    /// Context (or alias) whose rules are applied.
    #[arg(long = "context", short = 'x', value_name = "NAME", default_value = "default", help = "Context or alias whose rules are applied.")]
    pub context: String,

    /// Print one JSON object per input instead of plain text.
    #[arg(long, help = "Print one JSON object per input instead of plain text.")]
    pub json: bool,

    /// Strings to rewrite (reads lines from stdin if none are given).
    #[arg(value_name = "INPUT", help = "Strings to rewrite; reads stdin line by line when omitted.")]
    pub inputs: Vec<String>,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// Path to the rewrite configuration file (YAML).
    #[arg(long, short = 'c', value_name = "FILE", env = "REWRITE_CONFIG", help = "Path to the rewrite configuration file (YAML).")]
    pub config: PathBuf,
}
