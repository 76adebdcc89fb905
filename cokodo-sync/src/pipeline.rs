//! Project-level entry points used by the CLI.
//!
//! Opens `<project>/.agent` as the local tree, resolves the reference tree
//! through a source chain, then diffs or syncs the pair.

use std::path::Path;

use cokodo_core::{agent_dir, ProtocolTree};

use crate::diff::{diff, DiffReport};
use crate::error::SyncError;
use crate::source::{resolve_protocol, ProtocolSource, ResolvedProtocol};
use crate::writer::{sync, SyncOptions, SyncResult};

/// A local tree paired with the reference tree it is compared against.
#[derive(Debug, Clone)]
pub struct ProtocolPair {
    pub local: ProtocolTree,
    pub remote: ProtocolTree,
    pub resolved: ResolvedProtocol,
}

/// Open the local tree and resolve the reference tree.
///
/// The local check comes first so that a missing `.agent` never triggers
/// materialisation of the bundled protocol.
pub fn open_pair(
    project_root: &Path,
    sources: &[Box<dyn ProtocolSource>],
    offline: bool,
) -> Result<ProtocolPair, SyncError> {
    let local_root = agent_dir(project_root);
    if !local_root.is_dir() {
        return Err(SyncError::LocalMissing { path: local_root });
    }
    let local = ProtocolTree::open(local_root)?;

    let resolved = resolve_protocol(sources, offline)?;
    if !resolved.root.is_dir() {
        return Err(SyncError::RemoteMissing {
            path: resolved.root.clone(),
        });
    }
    let remote = ProtocolTree::open(resolved.root.clone())?;
    Ok(ProtocolPair {
        local,
        remote,
        resolved,
    })
}

pub fn diff_project(pair: &ProtocolPair) -> Result<DiffReport, SyncError> {
    diff(&pair.local, &pair.remote)
}

pub fn sync_project(pair: &ProtocolPair, options: SyncOptions) -> Result<SyncResult, SyncError> {
    sync(&pair.local, &pair.remote, options)
}
