//! `cokodo sync` — bring locked protocol files up to the reference version.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use cokodo_sync::{
    default_sources,
    pipeline::{open_pair, sync_project},
    SyncOptions, SyncResult,
};

use super::{project_root, require_protocol, settings};

/// Arguments for `cokodo sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Project root (default: current directory).
    pub path: Option<PathBuf>,

    /// Reference protocol directory (overrides COKODO_PROTOCOL_SOURCE).
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Use the bundled protocol only.
    #[arg(long)]
    pub offline: bool,

    /// Report what would change without writing.
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite locked files even if edited locally.
    #[arg(long)]
    pub force: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let root = project_root(self.path.as_deref())?;
        require_protocol(&root)?;
        let settings = settings()?;
        let sources = default_sources(&settings, self.source.as_deref());
        let pair = open_pair(&root, &sources, self.offline || settings.offline)
            .context("failed to open protocol pair")?;

        let options = SyncOptions {
            dry_run: self.dry_run,
            force: self.force,
        };
        let result = sync_project(&pair, options).context("sync failed")?;

        if result.is_noop() {
            println!("{}", "Protocol is up to date".green());
            return Ok(());
        }
        print_result(&pair.resolved.version, &result, self.dry_run);

        if !result.errors.is_empty() {
            bail!("{} file(s) failed to sync", result.errors.len());
        }
        Ok(())
    }
}

fn print_result(version: &str, result: &SyncResult, dry_run: bool) {
    let verb = if dry_run { "Would update" } else { "Updated" };
    println!("{verb} {} file(s) to protocol {version}", result.updated.len());
    let marker = if dry_run { "~" } else { "✎" };
    for path in &result.updated {
        println!("  {marker}  {path}");
    }
    if !result.skipped.is_empty() {
        println!("Skipped {} file(s):", result.skipped.len());
        for path in &result.skipped {
            println!("  {}  {}", "·".bright_black(), path);
        }
    }
    for (path, reason) in &result.errors {
        eprintln!("  {}  {path}: {reason}", "✗".red());
    }
    if dry_run {
        println!("{}", "(dry run: nothing written)".bright_black());
    }
}
