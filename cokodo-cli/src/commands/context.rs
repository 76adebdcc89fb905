//! `cokodo context` — print the files a stack/task combination needs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;

use cokodo_core::{resolver, ContextRequest, ProtocolTree};

use super::{project_root, require_protocol};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputMode {
    /// Each file's text under a `=== path ===` banner.
    #[default]
    Content,
    /// Absolute paths, one per line.
    Paths,
}

/// Arguments for `cokodo context`.
#[derive(Args, Debug)]
pub struct ContextArgs {
    /// Project root (default: current directory).
    pub path: Option<PathBuf>,

    /// Technology stack, e.g. `python`.
    #[arg(long)]
    pub stack: Option<String>,

    /// Workflow name or task-profile id, e.g. `bug_fix`.
    #[arg(long)]
    pub task: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputMode::Content)]
    pub output: OutputMode,
}

impl ContextArgs {
    pub fn run(self) -> Result<()> {
        let root = project_root(self.path.as_deref())?;
        let tree = ProtocolTree::open(require_protocol(&root)?)
            .context("failed to open protocol tree")?;

        warn_unknown(&tree, &self);
        let request = ContextRequest::new(self.stack.as_deref(), self.task.as_deref());
        let paths = resolver::resolve(&tree, &request);
        if paths.is_empty() {
            println!("No context files found");
            return Ok(());
        }

        match self.output {
            OutputMode::Paths => {
                for rel in &paths {
                    println!("{}", tree.path_of(rel).display());
                }
            }
            OutputMode::Content => {
                let contents = resolver::materialize(&tree, &paths);
                for rel in &paths {
                    let Some(text) = contents.get(rel) else {
                        continue;
                    };
                    println!("=== {rel} ===");
                    println!("{text}");
                }
            }
        }
        Ok(())
    }
}

// Unknown names resolve to the base set; say so on stderr.
fn warn_unknown(tree: &ProtocolTree, args: &ContextArgs) {
    if let Some(stack) = args.stack.as_deref() {
        let known = resolver::available_stacks(tree);
        if !known.iter().any(|s| s == stack) {
            eprintln!(
                "{} unknown stack '{stack}' (available: {})",
                "note:".yellow(),
                list_or_none(&known)
            );
        }
    }
    if let Some(task) = args.task.as_deref() {
        let known = resolver::available_tasks(tree);
        if !known.iter().any(|t| t == task) {
            eprintln!(
                "{} unknown task '{task}' (available: {})",
                "note:".yellow(),
                list_or_none(&known)
            );
        }
    }
}

fn list_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
