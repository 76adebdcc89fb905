//! One module per subcommand; shared path and settings helpers live here.

pub mod adapters;
pub mod checksums;
pub mod context;
pub mod detect;
pub mod diff;
pub mod lint;
pub mod parse;
pub mod sync;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use cokodo_core::{agent_dir, Settings};

/// `<project>/.agent` does not exist. Maps to exit code 2.
#[derive(Debug, Error)]
#[error("protocol directory {} not found", .path.display())]
pub struct ProtocolMissing {
    pub path: PathBuf,
}

/// Canonical project root (`PATH` argument, default `.`).
pub(crate) fn project_root(path: Option<&Path>) -> Result<PathBuf> {
    let path = path.unwrap_or_else(|| Path::new("."));
    std::fs::canonicalize(path)
        .with_context(|| format!("project path {} is not accessible", path.display()))
}

/// `.agent` under `root`, or [`ProtocolMissing`].
pub(crate) fn require_protocol(root: &Path) -> Result<PathBuf> {
    let dir = agent_dir(root);
    if !dir.is_dir() {
        return Err(ProtocolMissing { path: dir }.into());
    }
    Ok(dir)
}

pub(crate) fn settings() -> Result<Settings> {
    Settings::from_env().context("failed to resolve settings")
}
