//! `cokodo version`.

use anyhow::Result;
use clap::Args;

use cokodo_core::config::{BUNDLED_PROTOCOL_VERSION, TOOL_SPEC_VERSIONS};

/// Arguments for `cokodo version`.
#[derive(Args, Debug)]
pub struct VersionArgs {}

impl VersionArgs {
    pub fn run(self) -> Result<()> {
        println!("cokodo {}", env!("CARGO_PKG_VERSION"));
        println!("bundled protocol {BUNDLED_PROTOCOL_VERSION}");
        for (tool, version) in TOOL_SPEC_VERSIONS {
            println!("  {tool:<8} {version}");
        }
        Ok(())
    }
}
