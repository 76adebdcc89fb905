//! `cokodo adapters` — write tool-specific instruction files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use cokodo_renderer::{generate, AdapterKind, WriteResult};

use super::{project_root, require_protocol};

/// Arguments for `cokodo adapters`.
#[derive(Args, Debug)]
pub struct AdaptersArgs {
    /// Project root (default: current directory).
    pub path: Option<PathBuf>,

    /// Adapter to generate; repeatable. Default: all.
    #[arg(long = "tool")]
    pub tools: Vec<String>,

    /// Report what would be written without writing.
    #[arg(long)]
    pub dry_run: bool,
}

impl AdaptersArgs {
    pub fn run(self) -> Result<()> {
        let root = project_root(self.path.as_deref())?;
        require_protocol(&root)?;

        let kinds = if self.tools.is_empty() {
            AdapterKind::all().to_vec()
        } else {
            self.tools
                .iter()
                .map(|t| AdapterKind::from_name(t))
                .collect::<Result<Vec<_>, _>>()?
        };

        let results = generate(&root, &kinds, self.dry_run)
            .context("failed to generate adapters")?;
        print_results(&results, self.dry_run);
        Ok(())
    }
}

fn print_results(results: &[WriteResult], dry_run: bool) {
    let changed = results
        .iter()
        .filter(|r| !matches!(r, WriteResult::Unchanged { .. }))
        .count();
    let verb = if dry_run { "Would write" } else { "Wrote" };
    println!("{verb} {changed} adapter file(s)");
    for r in results {
        match r {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
            WriteResult::Unchanged { path } => {
                println!("  {}  {}", "·".bright_black(), path.display())
            }
        }
    }
}
