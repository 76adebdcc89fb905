//! Compare a local protocol tree against a reference ("remote") tree.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::ErrorKind;

use serde::Serialize;
use similar::TextDiff;

use cokodo_core::ProtocolTree;

use crate::checksum::{hash_file, protocol_files};
use crate::error::{io_err, SyncError};

/// Per-path comparison outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    /// Present only in the remote tree.
    Added,
    /// Present only in the local tree.
    Removed,
    Modified,
    Unchanged,
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiffStatus::Added => "added",
            DiffStatus::Removed => "removed",
            DiffStatus::Modified => "modified",
            DiffStatus::Unchanged => "unchanged",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffEntry {
    pub path: String,
    pub status: DiffStatus,
    pub local_hash: Option<String>,
    pub remote_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    /// Sorted by path.
    pub entries: Vec<DiffEntry>,
    pub local_version: Option<String>,
    pub remote_version: Option<String>,
    /// `(path, message)` for files that could not be hashed; such paths
    /// have no entry.
    pub errors: Vec<(String, String)>,
}

impl DiffReport {
    /// Entries whose status is not [`DiffStatus::Unchanged`].
    pub fn changes(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries
            .iter()
            .filter(|e| e.status != DiffStatus::Unchanged)
    }

    /// No changes and no unreadable files.
    pub fn is_up_to_date(&self) -> bool {
        self.errors.is_empty() && self.changes().next().is_none()
    }

    pub fn count(&self, status: DiffStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }
}

/// Classify every protocol file of either tree.
///
/// A file that cannot be hashed on either side is reported in
/// [`DiffReport::errors`] and left out of the entries.
pub fn diff(local: &ProtocolTree, remote: &ProtocolTree) -> Result<DiffReport, SyncError> {
    let mut errors = Vec::new();
    let local_hashes = hash_all(local, &protocol_files(local.root(), local.scope()), &mut errors);
    let remote_hashes =
        hash_all(remote, &protocol_files(remote.root(), remote.scope()), &mut errors);
    let failed: BTreeSet<String> = errors.iter().map(|(path, _)| path.clone()).collect();

    let paths: BTreeSet<&String> = local_hashes
        .keys()
        .chain(remote_hashes.keys())
        .filter(|path| !failed.contains(*path))
        .collect();
    let entries = paths
        .into_iter()
        .map(|path| {
            let local_hash = local_hashes.get(path).cloned();
            let remote_hash = remote_hashes.get(path).cloned();
            let status = match (&local_hash, &remote_hash) {
                (None, Some(_)) => DiffStatus::Added,
                (Some(_), None) => DiffStatus::Removed,
                (Some(l), Some(r)) if l == r => DiffStatus::Unchanged,
                _ => DiffStatus::Modified,
            };
            DiffEntry {
                path: path.clone(),
                status,
                local_hash,
                remote_hash,
            }
        })
        .collect();

    Ok(DiffReport {
        entries,
        local_version: local.version().map(str::to_string),
        remote_version: remote.version().map(str::to_string),
        errors,
    })
}

/// Unified diff (`a/` = local, `b/` = remote) for one entry.
///
/// Returns `None` for unchanged entries. Non-UTF-8 content is rendered as a
/// one-line placeholder instead of a line diff.
pub fn render_patch(
    local: &ProtocolTree,
    remote: &ProtocolTree,
    entry: &DiffEntry,
) -> Result<Option<String>, SyncError> {
    if entry.status == DiffStatus::Unchanged {
        return Ok(None);
    }
    let old = read_or_empty(local, &entry.path)?;
    let new = read_or_empty(remote, &entry.path)?;
    let (Some(old), Some(new)) = (old, new) else {
        return Ok(Some(format!("Binary file {} differs\n", entry.path)));
    };

    let old_header = format!("a/{}", entry.path);
    let new_header = format!("b/{}", entry.path);
    let unified = TextDiff::from_lines(&old, &new)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();
    Ok(Some(unified))
}

fn hash_all(
    tree: &ProtocolTree,
    rels: &[String],
    errors: &mut Vec<(String, String)>,
) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for rel in rels {
        match hash_file(&tree.path_of(rel)) {
            Ok(digest) => {
                out.insert(rel.clone(), digest);
            }
            Err(err) => {
                tracing::warn!("cannot hash {rel}: {err}");
                errors.push((rel.clone(), err.to_string()));
            }
        }
    }
    out
}

// Ok(None) means "not valid UTF-8"; a missing file reads as empty.
fn read_or_empty(tree: &ProtocolTree, rel: &str) -> Result<Option<String>, SyncError> {
    let path = tree.path_of(rel);
    match std::fs::read(&path) {
        Ok(bytes) => Ok(String::from_utf8(bytes).ok()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Some(String::new())),
        Err(err) => Err(io_err(path, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn pair() -> (TempDir, TempDir) {
        let local = TempDir::new().unwrap();
        let remote = TempDir::new().unwrap();
        write(local.path(), "manifest.json", r#"{"version": "1.0.0"}"#);
        write(remote.path(), "manifest.json", r#"{"version": "1.1.0"}"#);
        (local, remote)
    }

    #[test]
    fn classifies_all_four_statuses() {
        let (local, remote) = pair();
        write(local.path(), "start-here.md", "# Start");
        write(remote.path(), "start-here.md", "# Start");
        write(local.path(), "core/rules.md", "v1");
        write(remote.path(), "core/rules.md", "v2");
        write(remote.path(), "core/new.md", "new");
        write(local.path(), "meta/old.md", "old");

        let l = ProtocolTree::open(local.path()).unwrap();
        let r = ProtocolTree::open(remote.path()).unwrap();
        let report = diff(&l, &r).unwrap();

        let got: Vec<(&str, DiffStatus)> = report
            .entries
            .iter()
            .map(|e| (e.path.as_str(), e.status))
            .collect();
        assert_eq!(
            got,
            vec![
                ("core/new.md", DiffStatus::Added),
                ("core/rules.md", DiffStatus::Modified),
                ("meta/old.md", DiffStatus::Removed),
                ("start-here.md", DiffStatus::Unchanged),
            ]
        );
        assert_eq!(report.local_version.as_deref(), Some("1.0.0"));
        assert_eq!(report.remote_version.as_deref(), Some("1.1.0"));
        assert!(!report.is_up_to_date());
        assert_eq!(report.changes().count(), 3);
    }

    #[test]
    fn missing_versions_are_none() {
        let local = TempDir::new().unwrap();
        let remote = TempDir::new().unwrap();
        write(remote.path(), "manifest.json", r#"{"version": 3}"#);
        let report = diff(
            &ProtocolTree::open(local.path()).unwrap(),
            &ProtocolTree::open(remote.path()).unwrap(),
        )
        .unwrap();
        assert!(report.local_version.is_none());
        assert!(report.remote_version.is_none());
        assert!(report.is_up_to_date());
    }

    #[test]
    fn patch_shows_local_then_remote() {
        let (local, remote) = pair();
        write(local.path(), "start-here.md", "# Start\n");
        write(remote.path(), "start-here.md", "# Start v2\n");
        let l = ProtocolTree::open(local.path()).unwrap();
        let r = ProtocolTree::open(remote.path()).unwrap();
        let report = diff(&l, &r).unwrap();

        let patch = render_patch(&l, &r, &report.entries[0]).unwrap().unwrap();
        assert!(patch.contains("--- a/start-here.md"));
        assert!(patch.contains("+++ b/start-here.md"));
        assert!(patch.contains("-# Start\n"));
        assert!(patch.contains("+# Start v2\n"));
    }

    #[test]
    fn unreadable_files_are_reported_not_fatal() {
        let (local, _remote) = pair();
        write(local.path(), "start-here.md", "# Start");
        let tree = ProtocolTree::open(local.path()).unwrap();
        let mut errors = Vec::new();
        let hashes = hash_all(
            &tree,
            &["start-here.md".to_string(), "core/gone.md".to_string()],
            &mut errors,
        );
        assert_eq!(hashes.keys().collect::<Vec<_>>(), vec!["start-here.md"]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "core/gone.md");
    }

    #[test]
    fn errors_keep_report_out_of_date() {
        let (local, remote) = pair();
        write(local.path(), "start-here.md", "# Start");
        write(remote.path(), "start-here.md", "# Start");
        let mut report = diff(
            &ProtocolTree::open(local.path()).unwrap(),
            &ProtocolTree::open(remote.path()).unwrap(),
        )
        .unwrap();
        assert!(report.errors.is_empty());
        assert!(report.is_up_to_date());

        report
            .errors
            .push(("core/bad.md".into(), "permission denied".into()));
        assert!(!report.is_up_to_date());
    }
}
