//! `cokodo diff` — compare the local protocol with the reference protocol.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use cokodo_sync::{
    default_sources,
    pipeline::{diff_project, open_pair},
    render_patch, DiffStatus,
};

use super::{project_root, require_protocol, settings};

/// Arguments for `cokodo diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Project root (default: current directory).
    pub path: Option<PathBuf>,

    /// Reference protocol directory (overrides COKODO_PROTOCOL_SOURCE).
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Use the bundled protocol only.
    #[arg(long)]
    pub offline: bool,

    /// Print a unified diff for every changed file.
    #[arg(long)]
    pub patch: bool,
}

#[derive(Tabled)]
struct DiffRow {
    #[tabled(rename = "file")]
    path: String,
    #[tabled(rename = "status")]
    status: String,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let root = project_root(self.path.as_deref())?;
        require_protocol(&root)?;
        let settings = settings()?;
        let sources = default_sources(&settings, self.source.as_deref());
        let pair = open_pair(&root, &sources, self.offline || settings.offline)
            .context("failed to open protocol pair")?;
        let report = diff_project(&pair).context("diff failed")?;

        println!(
            "Local version:  {}",
            report.local_version.as_deref().unwrap_or("unknown")
        );
        println!(
            "Remote version: {} ({})",
            report.remote_version.as_deref().unwrap_or("unknown"),
            pair.resolved.source
        );

        for (path, reason) in &report.errors {
            eprintln!("  {}  {path}: {reason}", "✗".red());
        }

        if report.is_up_to_date() {
            println!("{}", "Protocol is up to date".green());
            return Ok(());
        }

        let rows: Vec<DiffRow> = report
            .changes()
            .map(|e| DiffRow {
                path: e.path.clone(),
                status: status_label(e.status),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        println!(
            "{} added, {} modified, {} removed",
            report.count(DiffStatus::Added),
            report.count(DiffStatus::Modified),
            report.count(DiffStatus::Removed),
        );

        if self.patch {
            for entry in report.changes() {
                let Some(patch) = render_patch(&pair.local, &pair.remote, entry)
                    .with_context(|| format!("failed to diff {}", entry.path))?
                else {
                    continue;
                };
                print!("{patch}");
                if !patch.ends_with('\n') {
                    println!();
                }
            }
        }
        Ok(())
    }
}

fn status_label(status: DiffStatus) -> String {
    match status {
        DiffStatus::Added => status.to_string().green().to_string(),
        DiffStatus::Modified => status.to_string().yellow().to_string(),
        DiffStatus::Removed => status.to_string().red().to_string(),
        DiffStatus::Unchanged => status.to_string(),
    }
}
