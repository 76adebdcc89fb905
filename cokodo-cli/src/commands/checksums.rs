//! `cokodo update-checksums` — rewrite the manifest's checksum table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use cokodo_core::ProtocolTree;
use cokodo_sync::update_checksums;

use super::{project_root, require_protocol};

/// Arguments for `cokodo update-checksums`.
#[derive(Args, Debug)]
pub struct UpdateChecksumsArgs {
    /// Project root (default: current directory).
    pub path: Option<PathBuf>,
}

impl UpdateChecksumsArgs {
    pub fn run(self) -> Result<()> {
        let root = project_root(self.path.as_deref())?;
        let tree = ProtocolTree::open(require_protocol(&root)?)
            .context("failed to open protocol tree")?;
        let checksums = update_checksums(&tree).context("failed to update checksums")?;
        println!("Updated checksums for {} files", checksums.len());
        Ok(())
    }
}
