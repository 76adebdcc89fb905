//! `cokodo parse` — parse instruction files into the common model.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use cokodo_parser::{HybridParser, ParsedInstruction};

use super::project_root;

/// Arguments for `cokodo parse`.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Project root (default: current directory).
    pub path: Option<PathBuf>,

    /// Only parse this tool's files (cursor, claude, copilot, gemini).
    #[arg(long)]
    pub tool: Option<String>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ParseArgs {
    pub fn run(self) -> Result<()> {
        let root = project_root(self.path.as_deref())?;
        let parser = HybridParser::new();
        let parsed = match self.tool.as_deref() {
            Some(tool) => parser
                .parse_tool(&root, tool)
                .with_context(|| format!("failed to parse {tool} files"))?,
            None => parser.parse_all(&root),
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&parsed).context("failed to serialize parse result")?
            );
            return Ok(());
        }
        if parsed.is_empty() {
            println!("No instruction files found");
            return Ok(());
        }
        for p in &parsed {
            print_instruction(p);
        }
        Ok(())
    }
}

fn print_instruction(p: &ParsedInstruction) {
    println!(
        "{} {} ({}, spec {})",
        p.tool_name.bold(),
        p.source_path,
        p.format_version,
        p.spec_version
    );
    if let Some(name) = &p.project_name {
        println!("  project:    {name}");
    }
    if !p.frontmatter.is_empty() {
        let pairs: Vec<String> = p
            .frontmatter
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        println!("  frontmatter: {}", pairs.join(", "));
    }
    println!("  sections:   {}", p.sections.len());
    if !p.referenced_files.is_empty() {
        println!("  references:");
        for r in &p.referenced_files {
            println!("    - {r}");
        }
    }
    if !p.rules.is_empty() {
        println!("  rules:");
        for r in &p.rules {
            println!("    - {r}");
        }
    }
}
