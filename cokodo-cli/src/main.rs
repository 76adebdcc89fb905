//! cokodo — agent protocol management CLI.
//!
//! # Usage
//!
//! ```text
//! cokodo context [PATH] [--stack S] [--task T] [--output content|paths]
//! cokodo diff [PATH] [--source DIR] [--offline] [--patch]
//! cokodo sync [PATH] [--source DIR] [--offline] [--dry-run] [--force]
//! cokodo lint [PATH] [--rule R] [--format text|json]
//! cokodo update-checksums [PATH]
//! cokodo detect [PATH] [--json]
//! cokodo parse [PATH] [--tool T] [--json]
//! cokodo adapters [PATH] [--tool T]... [--dry-run]
//! cokodo version
//! ```
//!
//! Exit codes: `0` success, `1` failure, `2` no `.agent` directory.

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;

use commands::{
    adapters::AdaptersArgs, checksums::UpdateChecksumsArgs, context::ContextArgs,
    detect::DetectArgs, diff::DiffArgs, lint::LintArgs, parse::ParseArgs, sync::SyncArgs,
    version::VersionArgs, ProtocolMissing,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "cokodo",
    version,
    about = "Resolve, sync, lint and adapt the .agent protocol of a project",
    long_about = None,
)]
struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the protocol files relevant to a stack and task.
    Context(ContextArgs),

    /// Compare the local protocol with the reference protocol.
    Diff(DiffArgs),

    /// Update locked protocol files from the reference protocol.
    Sync(SyncArgs),

    /// Check protocol structure, integrity and adapter references.
    Lint(LintArgs),

    /// Recompute the checksums recorded in the manifest.
    UpdateChecksums(UpdateChecksumsArgs),

    /// List AI tool instruction files present in a project.
    Detect(DetectArgs),

    /// Parse AI tool instruction files.
    Parse(ParseArgs),

    /// Generate tool-specific adapter files from the protocol.
    Adapters(AdaptersArgs),

    /// Show tool, protocol and format versions.
    Version(VersionArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Context(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::Sync(args) => args.run(),
        Commands::Lint(args) => args.run(),
        Commands::UpdateChecksums(args) => args.run(),
        Commands::Detect(args) => args.run(),
        Commands::Parse(args) => args.run(),
        Commands::Adapters(args) => args.run(),
        Commands::Version(args) => args.run(),
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            if err.downcast_ref::<ProtocolMissing>().is_some() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
