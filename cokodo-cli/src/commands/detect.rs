//! `cokodo detect` — list instruction files per tool.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use cokodo_parser::HybridParser;

use super::project_root;

/// Arguments for `cokodo detect`.
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Project root (default: current directory).
    pub path: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct DetectRow {
    tool: String,
    path: String,
    format: String,
}

impl DetectArgs {
    pub fn run(self) -> Result<()> {
        let root = project_root(self.path.as_deref())?;
        let detected = HybridParser::new().detect_all(&root);

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&detected)
                    .context("failed to serialize detection result")?
            );
            return Ok(());
        }
        if detected.is_empty() {
            println!("No instruction files found");
            return Ok(());
        }

        let rows: Vec<DetectRow> = detected
            .into_values()
            .flatten()
            .map(|d| DetectRow {
                tool: d.tool_name,
                path: d.path,
                format: d.format_version.to_string(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
