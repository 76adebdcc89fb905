//! Apply a [`DiffReport`] to the local tree.
//!
//! ## `sync` — per-entry decision
//!
//! 1. Project-owned path → skipped.
//! 2. `removed` → skipped (sync never deletes).
//! 3. `unchanged` → ignored.
//! 4. `modified` and the local file no longer matches its recorded
//!    checksum → skipped unless `force`.
//! 5. Otherwise copy the remote bytes over the local file
//!    (`<path>.tmp` + rename).
//!
//! After a real sync with at least one update, the local manifest's
//! `version` and the `checksums` of updated paths are refreshed.

use serde::Serialize;
use serde_json::{Map, Value};

use cokodo_core::{ProtocolTree, MANIFEST_FILE};

use crate::checksum::hash_bytes;
use crate::diff::{diff, DiffEntry, DiffStatus};
use crate::error::{io_err, SyncError};
use crate::manifest_store;

// ---------------------------------------------------------------------------
// Options / result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Classify only; write nothing.
    pub dry_run: bool,
    /// Overwrite files that were edited locally.
    pub force: bool,
}

/// Outcome of one sync run.
///
/// In dry-run mode `updated` lists what *would* be written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub updated: Vec<String>,
    pub skipped: Vec<String>,
    /// `(path, message)` for every per-path failure.
    pub errors: Vec<(String, String)>,
}

impl SyncResult {
    pub fn is_noop(&self) -> bool {
        self.updated.is_empty() && self.skipped.is_empty() && self.errors.is_empty()
    }
}

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

/// Bring `local` in line with `remote`.
pub fn sync(
    local: &ProtocolTree,
    remote: &ProtocolTree,
    options: SyncOptions,
) -> Result<SyncResult, SyncError> {
    if !remote.root().is_dir() {
        return Err(SyncError::RemoteMissing {
            path: remote.root().to_path_buf(),
        });
    }
    if !local.root().is_dir() {
        return Err(SyncError::LocalMissing {
            path: local.root().to_path_buf(),
        });
    }

    let report = diff(local, remote)?;
    let baseline = local.manifest().and_then(|m| m.checksums.as_ref());
    let mut result = SyncResult {
        errors: report.errors.clone(),
        ..SyncResult::default()
    };
    let mut written: Vec<(String, String)> = Vec::new();

    for entry in &report.entries {
        if entry.status == DiffStatus::Unchanged {
            continue;
        }
        if local.scope().is_project(&entry.path) {
            tracing::debug!("project-owned, skipped: {}", entry.path);
            result.skipped.push(entry.path.clone());
            continue;
        }
        if entry.status == DiffStatus::Removed {
            tracing::debug!("removed upstream, kept: {}", entry.path);
            result.skipped.push(entry.path.clone());
            continue;
        }
        if entry.status == DiffStatus::Modified && !options.force {
            let recorded = baseline.and_then(|b| b.get(&entry.path));
            if let (Some(recorded), Some(current)) = (recorded, entry.local_hash.as_ref()) {
                if !recorded.eq_ignore_ascii_case(current) {
                    tracing::info!("locally modified, skipped: {}", entry.path);
                    result.skipped.push(entry.path.clone());
                    continue;
                }
            }
        }

        if options.dry_run {
            tracing::info!("[dry-run] would update: {}", entry.path);
            result.updated.push(entry.path.clone());
            continue;
        }

        match copy_entry(local, remote, entry) {
            Ok(digest) => {
                tracing::info!("updated: {}", entry.path);
                result.updated.push(entry.path.clone());
                written.push((entry.path.clone(), digest));
            }
            Err(err) => {
                tracing::warn!("failed to update {}: {err}", entry.path);
                result.errors.push((entry.path.clone(), err.to_string()));
            }
        }
    }

    if !options.dry_run && !written.is_empty() && local.manifest_path().is_file() {
        if let Err(err) = record_sync(local, report.remote_version.as_deref(), &written) {
            tracing::warn!("failed to update local manifest: {err}");
            result
                .errors
                .push((MANIFEST_FILE.to_string(), err.to_string()));
        }
    }

    Ok(result)
}

/// Copy one remote file over its local counterpart; returns the new digest.
fn copy_entry(
    local: &ProtocolTree,
    remote: &ProtocolTree,
    entry: &DiffEntry,
) -> Result<String, SyncError> {
    let source = remote.path_of(&entry.path);
    let bytes = std::fs::read(&source).map_err(|e| io_err(&source, e))?;
    manifest_store::write_atomic(&local.path_of(&entry.path), &bytes)?;
    Ok(entry.remote_hash.clone().unwrap_or_else(|| hash_bytes(&bytes)))
}

fn record_sync(
    local: &ProtocolTree,
    remote_version: Option<&str>,
    written: &[(String, String)],
) -> Result<(), SyncError> {
    manifest_store::rewrite(local.root(), |obj| {
        if let Some(version) = remote_version {
            obj.insert("version".to_string(), Value::String(version.to_string()));
        }
        let checksums = obj
            .entry("checksums")
            .or_insert_with(|| Value::Object(Map::new()));
        if !checksums.is_object() {
            *checksums = Value::Object(Map::new());
        }
        if let Value::Object(map) = checksums {
            for (path, digest) in written {
                map.insert(path.clone(), Value::String(digest.clone()));
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::hash_file;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn missing_remote_is_checked_first() {
        let tmp = TempDir::new().unwrap();
        let local = ProtocolTree::open(tmp.path()).unwrap();
        let gone = TempDir::new().unwrap();
        let remote = ProtocolTree::open(gone.path()).unwrap();
        let remote_root = gone.path().to_path_buf();
        drop(gone);

        let err = sync(&local, &remote, SyncOptions::default()).unwrap_err();
        match err {
            SyncError::RemoteMissing { path } => assert_eq!(path, remote_root),
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn missing_local_is_reported() {
        let remote_dir = TempDir::new().unwrap();
        let remote = ProtocolTree::open(remote_dir.path()).unwrap();
        let gone = TempDir::new().unwrap();
        let local = ProtocolTree::open(gone.path()).unwrap();
        drop(gone);

        let err = sync(&local, &remote, SyncOptions::default()).unwrap_err();
        assert!(matches!(err, SyncError::LocalMissing { .. }), "got: {err}");
    }

    #[test]
    fn without_local_manifest_files_are_copied_and_no_manifest_appears() {
        let local = TempDir::new().unwrap();
        let remote = TempDir::new().unwrap();
        write(remote.path(), "manifest.json", r#"{"version": "2.0.0"}"#);
        write(remote.path(), "core/rules.md", "rules");

        let result = sync(
            &ProtocolTree::open(local.path()).unwrap(),
            &ProtocolTree::open(remote.path()).unwrap(),
            SyncOptions::default(),
        )
        .unwrap();
        assert_eq!(result.updated, vec!["core/rules.md"]);
        assert!(result.errors.is_empty());
        assert!(!local.path().join("manifest.json").exists());
        assert_eq!(
            hash_file(&local.path().join("core/rules.md")).unwrap(),
            hash_bytes(b"rules")
        );
    }
}
