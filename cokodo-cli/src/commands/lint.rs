//! `cokodo lint` — structural and integrity checks.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;

use cokodo_sync::{LintFinding, LintRule, Linter};

use super::{project_root, require_protocol};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum LintFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for `cokodo lint`.
#[derive(Args, Debug)]
pub struct LintArgs {
    /// Project root (default: current directory).
    pub path: Option<PathBuf>,

    /// Run a single rule (directory-structure, required-files, integrity,
    /// adapter-references).
    #[arg(long)]
    pub rule: Option<String>,

    #[arg(long, value_enum, default_value_t = LintFormat::Text)]
    pub format: LintFormat,
}

impl LintArgs {
    pub fn run(self) -> Result<()> {
        let root = project_root(self.path.as_deref())?;
        require_protocol(&root)?;
        let linter = Linter::new(&root).context("failed to open protocol tree")?;

        let findings = match self.rule.as_deref() {
            Some(name) => {
                if LintRule::from_name(name).is_none() {
                    let known: Vec<&str> = LintRule::all().iter().map(|r| r.name()).collect();
                    bail!("unknown rule '{name}' (expected one of: {})", known.join(", "));
                }
                linter.lint_rule(name)
            }
            None => linter.lint_all(),
        };

        match self.format {
            LintFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&findings)
                    .context("failed to serialize lint findings")?
            ),
            LintFormat::Text => print_text(&findings),
        }

        let failed = findings.iter().filter(|f| !f.passed).count();
        if failed > 0 {
            bail!("{failed} of {} checks failed", findings.len());
        }
        Ok(())
    }
}

fn print_text(findings: &[LintFinding]) {
    for f in findings {
        let mark = if f.passed { "✓".green() } else { "✗".red() };
        match f.location() {
            Some(loc) => println!("  {mark} [{}] {} ({loc})", f.rule, f.message),
            None => println!("  {mark} [{}] {}", f.rule, f.message),
        }
    }
    let passed = findings.iter().filter(|f| f.passed).count();
    println!("{passed} passed, {} failed", findings.len() - passed);
}
